//! Self-describing inclusion proofs and the store-less verifier.
//!
//! A [`Proof`] carries everything a verifier needs: the leaf position, the
//! sibling digests up to the local peak, the peaks on either side, and the
//! committed root and size. Verification recomputes the exact position
//! layout from `(position, size)` alone and never consults MMR state.

use serde::{Deserialize, Serialize};

use cairn_core::{hash_with_integer, Digest, Error, Hasher, Result};

use crate::position::{height, is_right_sibling, parent_position, proof_positions, Position};

/// MMR inclusion proof.
///
/// Digests are copies; a proof never aliases into the node store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Position of the leaf being proven.
    pub position: Position,
    /// Sibling digests from the leaf up to its local peak, bottom-up.
    pub local_path: Vec<Digest>,
    /// Digests of the peaks strictly left of the local peak, left-to-right.
    pub left_peaks: Vec<Digest>,
    /// Digests of the peaks strictly right of the local peak, left-to-right.
    pub right_peaks: Vec<Digest>,
    /// Root the proof commits to.
    pub root: Digest,
    /// MMR size when the proof was generated.
    pub size: u64,
}

impl Proof {
    /// Verify this proof against a candidate leaf datum.
    ///
    /// The hasher must be the same implementation the prover used.
    pub fn verify<H: Hasher>(&self, hasher: &H, data: &[u8]) -> Result<bool> {
        verify_proof(hasher, self, data)
    }
}

/// Recompute a candidate root from `proof` and `data` and compare it to the
/// committed root.
///
/// Returns `Ok(false)` for a well-formed proof that does not reconstruct
/// the root, and `Err(MalformedProof)` when the proof's shape is
/// inconsistent with its own `(position, size)` — wrong list lengths, a
/// position outside `[1, size]`, or a non-leaf position.
pub fn verify_proof<H: Hasher>(hasher: &H, proof: &Proof, data: &[u8]) -> Result<bool> {
    let (position, size) = (proof.position, proof.size);
    if position == 0 || position > size {
        return Err(Error::malformed_proof(format!(
            "position {position} not in [1, {size}]"
        )));
    }
    if height(position) != 1 {
        return Err(Error::malformed_proof(format!(
            "position {position} is not a leaf"
        )));
    }

    let expected = proof_positions(position, size);
    if expected.local_tree_path.len() != proof.local_path.len() {
        return Err(Error::malformed_proof(format!(
            "local path has {} digests, position {position} at size {size} needs {}",
            proof.local_path.len(),
            expected.local_tree_path.len()
        )));
    }
    if expected.left_peaks.len() != proof.left_peaks.len()
        || expected.right_peaks.len() != proof.right_peaks.len()
    {
        return Err(Error::malformed_proof(format!(
            "peak lists have {}+{} digests, size {size} needs {}+{}",
            proof.left_peaks.len(),
            proof.right_peaks.len(),
            expected.left_peaks.len(),
            expected.right_peaks.len()
        )));
    }

    // Fold the local path: each entry is a sibling position, whose side
    // tells us the child order for the parent commitment. A right-sibling
    // entry means the climbing node is the left child, so `acc` hashes
    // first; a left-sibling entry puts the carried digest first.
    let mut acc = hash_with_integer(hasher, position, &[data]);
    for (&sibling_pos, sibling) in expected.local_tree_path.iter().zip(&proof.local_path) {
        let parent = parent_position(sibling_pos);
        acc = if is_right_sibling(sibling_pos) {
            hash_with_integer(hasher, parent, &[acc.as_ref(), sibling.as_ref()])
        } else {
            hash_with_integer(hasher, parent, &[sibling.as_ref(), acc.as_ref()])
        };
    }

    // `acc` is now the local peak; bag it with the side peaks in layout
    // order and compare against the committed root.
    let mut bag: Vec<&[u8]> =
        Vec::with_capacity(proof.left_peaks.len() + 1 + proof.right_peaks.len());
    bag.extend(proof.left_peaks.iter().map(AsRef::as_ref));
    bag.push(acc.as_ref());
    bag.extend(proof.right_peaks.iter().map(AsRef::as_ref));

    let candidate = hash_with_integer(hasher, size, &bag);
    Ok(candidate == proof.root)
}

/// Verify many `(proof, data)` pairs, in parallel for large batches.
///
/// Returns `Ok(true)` only if every proof verifies.
pub fn verify_proof_batch<H: Hasher>(hasher: &H, items: &[(&Proof, &[u8])]) -> Result<bool> {
    use rayon::prelude::*;

    if items.len() < 16 {
        for (proof, data) in items {
            if !verify_proof(hasher, proof, data)? {
                return Ok(false);
            }
        }
        return Ok(true);
    }

    let results: Result<Vec<bool>> = items
        .par_iter()
        .map(|(proof, data)| verify_proof(hasher, proof, data))
        .collect();
    results.map(|v| v.into_iter().all(|b| b))
}
