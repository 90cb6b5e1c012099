//! Merkle Mountain Range (MMR) accumulator.
//!
//! An MMR is an append-only data structure that provides:
//! - O(log n) amortized append (O(1) store writes per leaf plus carries)
//! - O(log n) inclusion proofs
//! - verification from the proof and root alone, with no store access
//!
//! The structure is a forest of perfect binary trees ("mountains") of
//! strictly decreasing height, with nodes numbered 1-based in post-order.
//! Appending a leaf merges equal-height trees the way a binary counter
//! carries.
//!
//! Commitments are domain-separated by position: a leaf is
//! `H(pos ‖ data)`, a parent is `H(pos ‖ left ‖ right)`, and the root bags
//! the peaks as `H(size ‖ peaks left-to-right)`, with integers rendered as
//! decimal ASCII. The digest function is injected via
//! [`cairn_core::Hasher`] and must match between prover and verifier.
//!
//! # Example
//!
//! ```rust
//! use cairn_core::Blake2b256;
//! use cairn_mmr::{MemStore, Mmr};
//!
//! let (mut mmr, auth) = Mmr::new(MemStore::new(), Blake2b256);
//!
//! // Append some leaves; appends require the authority token.
//! let positions = mmr
//!     .append_leaves(&auth, &[b"event1", b"event2", b"event3"])
//!     .unwrap();
//!
//! // Prove the first leaf and verify against the root, store-free.
//! let proof = mmr.generate_proof(positions[0]).unwrap();
//! assert!(proof.verify(&Blake2b256, b"event1").unwrap());
//! ```

pub mod bits;
pub mod position;

mod mmr;
mod proof;
mod store;

#[cfg(test)]
mod proptest;

pub use mmr::{AppendAuthority, Mmr, MmrUpdate, UpdateSink};
pub use proof::{verify_proof, verify_proof_batch, Proof};
pub use store::{MemStore, NodeStore};
