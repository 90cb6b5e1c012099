//! Core MMR engine.
//!
//! A Merkle Mountain Range is an append-only authenticated data structure:
//! a forest of perfect binary trees of strictly decreasing height, numbered
//! 1-based in post-order. Appending a leaf may complete subtrees, in which
//! case the induced parent nodes are appended in the same step ("carry"
//! merges, mirroring binary counter arithmetic).
//!
//! The engine exclusively owns its node store and two caches (the current
//! peak digests and the bagged root); both caches are rewritten after every
//! append and are always consistent with the post-append size.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use cairn_core::{hash_with_integer, Blake2b256, Digest, Error, Hasher, Result};

use crate::position::{
    height, is_right_sibling, is_valid_size, leaf_count_for_size, peaks_positions,
    proof_positions, sibling_position, Position,
};
use crate::proof::Proof;
use crate::store::NodeStore;

/// Capability token gating appends.
///
/// Created once, together with its MMR; it is deliberately neither `Clone`
/// nor `Copy`, so append authority can be held, moved, or dropped, but not
/// duplicated. Read operations need no token.
#[derive(Debug)]
pub struct AppendAuthority {
    _private: (),
}

/// Payload of the post-append update notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MmrUpdate {
    /// Root after the batch.
    pub root: Digest,
    /// Peak digests left-to-right after the batch.
    pub peaks: Vec<Digest>,
    /// Total node count after the batch.
    pub size: u64,
}

/// Transport seam for update notifications.
///
/// The engine publishes exactly one update per non-empty batch; delivery is
/// the host's concern and nothing in the core depends on it.
pub trait UpdateSink: Send + Sync {
    /// Receive an update.
    fn publish(&self, update: &MmrUpdate);
}

/// Merkle Mountain Range.
pub struct Mmr<S: NodeStore, H: Hasher = Blake2b256> {
    store: S,
    hasher: H,
    peaks: Vec<Digest>,
    root: Digest,
    sink: Option<Arc<dyn UpdateSink>>,
}

impl<S: NodeStore, H: Hasher> Mmr<S, H> {
    /// Create a new empty MMR over `store`, together with its append
    /// authority.
    ///
    /// The empty root is the digest of the serialized size, `H("0")`.
    pub fn new(store: S, hasher: H) -> (Self, AppendAuthority) {
        debug_assert_eq!(store.size(), 0, "new() requires an empty store");
        let root = bag_peaks(&hasher, 0, &[]);
        (
            Self {
                store,
                hasher,
                peaks: Vec::new(),
                root,
                sink: None,
            },
            AppendAuthority { _private: () },
        )
    }

    /// Restore an MMR from a store already holding nodes `1..=size`.
    ///
    /// The peaks and root caches are recomputed from the size; the node
    /// sequence itself is trusted as written by a previous instance.
    pub fn from_store(store: S, hasher: H) -> Result<(Self, AppendAuthority)> {
        let size = store.size();
        if !is_valid_size(size) {
            return Err(Error::storage(format!(
                "store holds {size} nodes, which no append sequence produces"
            )));
        }
        let mut mmr = Self {
            store,
            hasher,
            peaks: Vec::new(),
            root: Digest::zeroed(),
            sink: None,
        };
        mmr.refresh_caches()?;
        Ok((mmr, AppendAuthority { _private: () }))
    }

    /// Register the update-notification sink.
    pub fn set_sink(&mut self, sink: Arc<dyn UpdateSink>) {
        self.sink = Some(sink);
    }

    /// Total node count.
    pub fn size(&self) -> u64 {
        self.store.size()
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> u64 {
        leaf_count_for_size(self.size())
    }

    /// Current root (bag of peaks).
    pub fn root(&self) -> Digest {
        self.root
    }

    /// Current peak digests, left-to-right.
    pub fn peaks(&self) -> &[Digest] {
        &self.peaks
    }

    /// Current peak positions, left-to-right.
    pub fn peak_positions(&self) -> Vec<Position> {
        peaks_positions(self.size())
    }

    /// Get a node digest by position.
    pub fn get(&self, pos: Position) -> Result<Option<Digest>> {
        self.store.get(pos)
    }

    /// All node digests in position order, for host snapshotting.
    ///
    /// Restore is by replay: load these into a store and call
    /// [`Mmr::from_store`].
    pub fn nodes(&self) -> Result<Vec<Digest>> {
        let size = self.size();
        let mut nodes = Vec::with_capacity(size as usize);
        for pos in 1..=size {
            let digest = self
                .store
                .get(pos)?
                .ok_or_else(|| Error::internal(format!("missing node at position {pos}")))?;
            nodes.push(digest);
        }
        Ok(nodes)
    }

    /// Append a batch of leaf data, returning the position of each new leaf.
    ///
    /// Equivalent to appending the leaves one at a time in list order,
    /// followed by exactly one update notification. An empty batch is a
    /// no-op and publishes nothing.
    pub fn append_leaves<D: AsRef<[u8]>>(
        &mut self,
        _auth: &AppendAuthority,
        data: &[D],
    ) -> Result<Vec<Position>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let mut positions = Vec::with_capacity(data.len());
        for datum in data {
            positions.push(self.append_leaf(datum.as_ref())?);
        }

        debug!(
            appended = data.len(),
            size = self.size(),
            "appended leaf batch"
        );

        if let Some(sink) = &self.sink {
            sink.publish(&MmrUpdate {
                root: self.root,
                peaks: self.peaks.clone(),
                size: self.size(),
            });
        }
        Ok(positions)
    }

    /// Append one leaf: commit the datum at the next position, then append
    /// every parent whose children are now both present.
    fn append_leaf(&mut self, data: &[u8]) -> Result<Position> {
        let leaf_pos = self.size() + 1;
        let leaf_hash = hash_with_integer(&self.hasher, leaf_pos, &[data]);

        // Compute the full node chain before touching the store, so a
        // failed append leaves no partial state behind.
        let mut new_nodes = vec![leaf_hash];
        let mut pos = leaf_pos;
        let mut node_hash = leaf_hash;
        while is_right_sibling(pos) {
            let left_pos = sibling_position(pos);
            let left = self.store.get(left_pos)?.ok_or_else(|| {
                Error::internal(format!("missing left sibling at position {left_pos}"))
            })?;
            pos += 1;
            node_hash =
                hash_with_integer(&self.hasher, pos, &[left.as_ref(), node_hash.as_ref()]);
            new_nodes.push(node_hash);
            trace!(parent = pos, "carry merge");
        }

        for node in new_nodes {
            self.store.push(node)?;
        }
        self.refresh_caches()?;
        Ok(leaf_pos)
    }

    /// Rebuild the peaks and root caches for the current size.
    fn refresh_caches(&mut self) -> Result<()> {
        let size = self.size();
        let positions = peaks_positions(size);
        let mut peaks = Vec::with_capacity(positions.len());
        for pos in positions {
            let digest = self
                .store
                .get(pos)?
                .ok_or_else(|| Error::internal(format!("missing peak at position {pos}")))?;
            peaks.push(digest);
        }
        self.root = bag_peaks(&self.hasher, size, &peaks);
        self.peaks = peaks;
        Ok(())
    }

    /// Generate an inclusion proof for the leaf at `pos`.
    pub fn generate_proof(&self, pos: Position) -> Result<Proof> {
        let size = self.size();
        if pos == 0 || pos > size {
            return Err(Error::position_out_of_range(format!(
                "position {pos} not in [1, {size}]"
            )));
        }
        let h = height(pos);
        if h != 1 {
            return Err(Error::non_leaf_proof_request(format!(
                "position {pos} has height {h}"
            )));
        }

        let pp = proof_positions(pos, size);
        let proof = Proof {
            position: pos,
            local_path: self.fetch(&pp.local_tree_path)?,
            left_peaks: self.fetch(&pp.left_peaks)?,
            right_peaks: self.fetch(&pp.right_peaks)?,
            root: self.root,
            size,
        };
        trace!(position = pos, path_len = proof.local_path.len(), "generated proof");
        Ok(proof)
    }

    /// Generate proofs for multiple leaf positions, in parallel for large
    /// batches.
    pub fn generate_proof_batch(&self, positions: &[Position]) -> Result<Vec<Proof>>
    where
        S: Sync,
    {
        use rayon::prelude::*;

        // Thread overhead dominates for small batches.
        if positions.len() < 16 {
            return positions.iter().map(|&pos| self.generate_proof(pos)).collect();
        }

        positions
            .par_iter()
            .map(|&pos| self.generate_proof(pos))
            .collect()
    }

    /// Copy the digests at `positions` out of the store.
    ///
    /// Proofs own their digests; nothing aliases into the store.
    fn fetch(&self, positions: &[Position]) -> Result<Vec<Digest>> {
        let mut digests = Vec::with_capacity(positions.len());
        for &pos in positions {
            let digest = self
                .store
                .get(pos)?
                .ok_or_else(|| Error::internal(format!("missing node at position {pos}")))?;
            digests.push(digest);
        }
        Ok(digests)
    }
}

/// Bag peaks into the root commitment: `H(size ‖ peaks left-to-right)`.
///
/// With no peaks this is the empty-root convention `H("0")`.
fn bag_peaks<H: Hasher>(hasher: &H, size: u64, peaks: &[Digest]) -> Digest {
    let parts: Vec<&[u8]> = peaks.iter().map(|p| p.as_ref()).collect();
    hash_with_integer(hasher, size, &parts)
}
