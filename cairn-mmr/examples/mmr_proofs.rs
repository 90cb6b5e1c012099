//! Merkle Mountain Range example: append data and generate proofs.
//!
//! Run with: cargo run --example mmr_proofs

use cairn_core::Blake2b256;
use cairn_mmr::{MemStore, Mmr};

fn main() -> anyhow::Result<()> {
    let (mut mmr, auth) = Mmr::new(MemStore::new(), Blake2b256);

    println!("=== Merkle Mountain Range Demo ===\n");

    // Append some leaves
    let data_items = ["event-1", "event-2", "event-3", "event-4", "event-5"];
    let positions = mmr.append_leaves(&auth, &data_items)?;

    for (item, pos) in data_items.iter().zip(&positions) {
        println!("Appended '{}' at position {}", item, pos);
    }

    println!("\nMMR Stats:");
    println!("  Leaf count: {}", mmr.leaf_count());
    println!("  Total nodes: {}", mmr.size());
    println!("  Peaks: {:?}", mmr.peak_positions());
    println!("  Root: {:?}", mmr.root());

    // Generate and verify inclusion proofs
    println!("\n=== Inclusion Proofs ===\n");

    let hasher = Blake2b256;
    for (item, &pos) in data_items.iter().zip(&positions) {
        let proof = mmr.generate_proof(pos)?;
        let is_valid = proof.verify(&hasher, item.as_bytes())?;

        println!(
            "Proof for '{}' (pos {}): {} path digests, {}+{} peaks, valid: {}",
            item,
            pos,
            proof.local_path.len(),
            proof.left_peaks.len(),
            proof.right_peaks.len(),
            is_valid
        );
    }

    // Batch append
    println!("\n=== Batch Append ===\n");

    let batch_data: Vec<String> = (6..=10).map(|i| format!("event-{}", i)).collect();
    let batch_positions = mmr.append_leaves(&auth, &batch_data)?;
    println!("Appended {} items in batch", batch_positions.len());
    println!("New leaf count: {}", mmr.leaf_count());
    println!("New root: {:?}", mmr.root());

    // Proof portability: anyone holding the root can verify, no store needed.
    println!("\n=== Proof Portability ===\n");

    let proof = mmr.generate_proof(positions[0])?;
    let serialized = serde_json::to_string(&proof)?;
    println!("Serialized proof size: {} bytes", serialized.len());
    println!("Root hash: {:?}", proof.root);
    println!("Proof can be verified against this root by any party");

    Ok(())
}
