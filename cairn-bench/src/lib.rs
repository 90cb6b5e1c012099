//! Cairn benchmarks with optimized global allocator.
//!
//! This crate uses mimalloc as the global allocator for all benchmarks:
//! faster small allocations (digests, proof vectors) and better
//! multi-threaded scaling for the parallel proof paths.
//!
//! All benchmarks in this crate automatically use mimalloc; the allocator
//! is set globally at startup.

use mimalloc::MiMalloc;

/// Global allocator using mimalloc.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Re-export mimalloc for direct access if needed.
pub use mimalloc;
