//! Property-based tests for MMR operations.
//!
//! Tests invariants of the Merkle Mountain Range under arbitrary append
//! sequences.

use proptest::prelude::*;

use cairn_core::Blake2b256;

use crate::position::{height, proof_positions};
use crate::{MemStore, Mmr, Proof};

// ============================================================================
// Strategies
// ============================================================================

/// Arbitrary leaf payloads (non-empty, bounded).
fn arb_leaves(max_count: usize) -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 1..64), 0..max_count)
}

fn build_mmr(leaves: &[Vec<u8>]) -> (Mmr<MemStore>, Vec<u64>) {
    let (mut mmr, auth) = Mmr::new(MemStore::new(), Blake2b256);
    let positions = mmr.append_leaves(&auth, leaves).expect("append should succeed");
    (mmr, positions)
}

// ============================================================================
// Property Tests: Size and Peaks
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Size follows the binary-counter formula: 2n - popcount(n).
    #[test]
    fn prop_size_formula(leaves in arb_leaves(100)) {
        let (mmr, _) = build_mmr(&leaves);
        let n = leaves.len() as u64;
        prop_assert_eq!(mmr.size(), 2 * n - n.count_ones() as u64);
        prop_assert_eq!(mmr.leaf_count(), n);
    }

    /// Peak count equals popcount of the leaf count.
    #[test]
    fn prop_peak_count(n in 1usize..500usize) {
        let leaves: Vec<Vec<u8>> = (0..n).map(|i| format!("leaf{i}").into_bytes()).collect();
        let (mmr, _) = build_mmr(&leaves);
        prop_assert_eq!(mmr.peaks().len(), (n as u64).count_ones() as usize);
        prop_assert_eq!(mmr.peak_positions().len(), (n as u64).count_ones() as usize);
    }

    /// Peak positions are strictly ascending and within the MMR.
    #[test]
    fn prop_peaks_ordered_and_bounded(leaves in arb_leaves(100)) {
        let (mmr, _) = build_mmr(&leaves);
        let peaks = mmr.peak_positions();
        for window in peaks.windows(2) {
            prop_assert!(window[0] < window[1]);
        }
        for pos in peaks {
            prop_assert!(pos >= 1 && pos <= mmr.size());
        }
    }

    /// Every appended leaf sits at a height-1 position.
    #[test]
    fn prop_leaf_positions_have_height_one(leaves in arb_leaves(100)) {
        let (_, positions) = build_mmr(&leaves);
        for pos in positions {
            prop_assert_eq!(height(pos), 1);
        }
    }

    /// Append positions are strictly increasing, starting at 1.
    #[test]
    fn prop_append_positions_increasing(leaves in arb_leaves(100)) {
        prop_assume!(!leaves.is_empty());
        let (_, positions) = build_mmr(&leaves);
        prop_assert_eq!(positions[0], 1);
        for window in positions.windows(2) {
            prop_assert!(window[0] < window[1]);
        }
    }
}

// ============================================================================
// Property Tests: Roots
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Root is deterministic for the same append sequence.
    #[test]
    fn prop_root_deterministic(leaves in arb_leaves(50)) {
        let (mmr1, _) = build_mmr(&leaves);
        let (mmr2, _) = build_mmr(&leaves);
        prop_assert_eq!(mmr1.root(), mmr2.root());
    }

    /// Different append sequences produce different roots.
    #[test]
    fn prop_different_sequences_different_roots(
        leaves1 in arb_leaves(10),
        leaves2 in arb_leaves(10)
    ) {
        prop_assume!(leaves1 != leaves2);
        let (mmr1, _) = build_mmr(&leaves1);
        let (mmr2, _) = build_mmr(&leaves2);
        prop_assert_ne!(mmr1.root(), mmr2.root());
    }

    /// Append order matters.
    #[test]
    fn prop_order_matters(leaves in arb_leaves(10)) {
        prop_assume!(leaves.len() >= 2);
        let reversed: Vec<Vec<u8>> = leaves.iter().rev().cloned().collect();
        prop_assume!(leaves != reversed);

        let (forward, _) = build_mmr(&leaves);
        let (backward, _) = build_mmr(&reversed);
        prop_assert_ne!(forward.root(), backward.root());
    }

    /// Root changes after every single append.
    #[test]
    fn prop_root_changes(leaves in arb_leaves(20)) {
        let (mut mmr, auth) = Mmr::new(MemStore::new(), Blake2b256);
        let mut prev_root = mmr.root();
        for leaf in &leaves {
            mmr.append_leaves(&auth, &[leaf]).expect("append should succeed");
            let new_root = mmr.root();
            prop_assert_ne!(prev_root, new_root);
            prev_root = new_root;
        }
    }
}

// ============================================================================
// Property Tests: Proofs
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    /// Every appended leaf has a verifying inclusion proof.
    #[test]
    fn prop_all_leaves_provable(leaves in arb_leaves(50)) {
        prop_assume!(!leaves.is_empty());
        let (mmr, positions) = build_mmr(&leaves);

        for (leaf, &pos) in leaves.iter().zip(&positions) {
            let proof = mmr.generate_proof(pos).expect("proof should succeed");
            prop_assert!(proof.verify(&Blake2b256, leaf).expect("verify should not error"));
        }
    }

    /// Proofs are deterministic.
    #[test]
    fn prop_proof_deterministic(leaves in arb_leaves(30)) {
        prop_assume!(!leaves.is_empty());
        let (mmr1, positions) = build_mmr(&leaves);
        let (mmr2, _) = build_mmr(&leaves);

        for &pos in &positions {
            let p1 = mmr1.generate_proof(pos).expect("proof should succeed");
            let p2 = mmr2.generate_proof(pos).expect("proof should succeed");
            prop_assert_eq!(p1, p2);
        }
    }

    /// Proof size stays logarithmic in the leaf count.
    #[test]
    fn prop_proof_size_logarithmic(n in 1usize..1000usize) {
        let leaves: Vec<Vec<u8>> = (0..n).map(|i| format!("leaf{i}").into_bytes()).collect();
        let (mmr, positions) = build_mmr(&leaves);

        let proof = mmr.generate_proof(positions[0]).expect("proof should succeed");
        let bound = (n as f64).log2().ceil() as usize + 1;
        prop_assert!(proof.local_path.len() <= bound);
        prop_assert!(
            proof.left_peaks.len() + proof.right_peaks.len()
                < (n as u64).count_ones() as usize + 1
        );
    }

    /// The three proof-position lists never overlap each other or the leaf.
    #[test]
    fn prop_proof_positions_disjoint(leaves in arb_leaves(60)) {
        prop_assume!(!leaves.is_empty());
        let (mmr, positions) = build_mmr(&leaves);

        for &pos in &positions {
            let pp = proof_positions(pos, mmr.size());
            let mut all: Vec<u64> = pp
                .local_tree_path
                .iter()
                .chain(pp.left_peaks.iter())
                .chain(pp.right_peaks.iter())
                .copied()
                .collect();
            all.push(pos);
            let count = all.len();
            all.sort_unstable();
            all.dedup();
            prop_assert_eq!(all.len(), count);
        }
    }
}

// ============================================================================
// Property Tests: Tamper Detection
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Flipping any single bit of the leaf datum fails verification.
    #[test]
    fn prop_tampered_datum_fails(
        leaves in arb_leaves(20),
        bit in 0usize..256usize
    ) {
        prop_assume!(!leaves.is_empty());
        let (mmr, positions) = build_mmr(&leaves);

        let idx = bit % leaves.len();
        let proof = mmr.generate_proof(positions[idx]).expect("proof should succeed");

        let mut tampered = leaves[idx].clone();
        let bit = bit % (tampered.len() * 8);
        tampered[bit / 8] ^= 1 << (bit % 8);

        prop_assert!(!proof.verify(&Blake2b256, &tampered).expect("verify should not error"));
    }

    /// Flipping any single bit of any proof digest fails verification.
    #[test]
    fn prop_tampered_proof_digest_fails(
        n in 2usize..40usize,
        bit in 0usize..256usize
    ) {
        let leaves: Vec<Vec<u8>> = (0..n).map(|i| format!("leaf{i}").into_bytes()).collect();
        let (mmr, positions) = build_mmr(&leaves);

        let idx = bit % n;
        let proof = mmr.generate_proof(positions[idx]).expect("proof should succeed");

        let flip = |digest: &mut cairn_core::Digest, bit: usize| {
            let mut bytes = digest.to_bytes();
            bytes[(bit / 8) % 32] ^= 1 << (bit % 8);
            *digest = cairn_core::Digest::from(bytes);
        };

        let lists = proof.local_path.len() + proof.left_peaks.len() + proof.right_peaks.len();
        prop_assume!(lists > 0);

        let mut tampered: Proof = proof.clone();
        let target = bit % lists;
        if target < tampered.local_path.len() {
            flip(&mut tampered.local_path[target], bit);
        } else if target < tampered.local_path.len() + tampered.left_peaks.len() {
            let i = target - tampered.local_path.len();
            flip(&mut tampered.left_peaks[i], bit);
        } else {
            let i = target - tampered.local_path.len() - tampered.left_peaks.len();
            flip(&mut tampered.right_peaks[i], bit);
        }

        let leaf = &leaves[idx];
        prop_assert!(!tampered.verify(&Blake2b256, leaf).expect("verify should not error"));
    }
}
