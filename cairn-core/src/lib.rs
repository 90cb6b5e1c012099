//! Cairn Core - Digest and error primitives for the Cairn accumulator.
//!
//! This crate provides the types shared by every Cairn crate:
//!
//! - [`crypto`] - The fixed-width [`Digest`] commitment value, the
//!   injected [`Hasher`] primitive (BLAKE2b-256 by default, SHA3-256
//!   provided), and the `hash_with_integer` commitment helper.
//! - [`error`] - Structured errors with stable numeric codes.
//!
//! # Example
//!
//! ```rust
//! use cairn_core::{hash_with_integer, Blake2b256, Hasher};
//!
//! let hasher = Blake2b256;
//!
//! // Commit a leaf datum at position 1.
//! let leaf = hash_with_integer(&hasher, 1, &[b"event data"]);
//!
//! // The same preimage digested directly agrees.
//! assert_eq!(leaf, hasher.digest(b"1event data"));
//! ```

pub mod crypto;
pub mod error;

// Re-exports for convenience
pub use crypto::{hash_with_integer, Blake2b256, Digest, Hasher, Sha3_256, DIGEST_LEN};
pub use error::{Error, ErrorCode, Result};
