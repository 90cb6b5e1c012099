//! Storage traits and implementations for MMR nodes.

use cairn_core::{Digest, Result};

use crate::position::Position;

/// Trait for MMR node storage.
///
/// Nodes live at dense 1-based positions `1..=size`; the engine assigns
/// positions, the store only persists. Positions are never rewritten once
/// pushed.
pub trait NodeStore: Clone {
    /// Get a node by 1-based position.
    fn get(&self, pos: Position) -> Result<Option<Digest>>;

    /// Push a node at the next position (`size + 1`) and return it.
    fn push(&mut self, digest: Digest) -> Result<Position>;

    /// Current size (total node count).
    fn size(&self) -> u64;
}

/// In-memory node store (testing and small accumulators).
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    nodes: Vec<Digest>,
}

impl MemStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All node digests in position order.
    pub fn as_slice(&self) -> &[Digest] {
        &self.nodes
    }
}

impl NodeStore for MemStore {
    fn get(&self, pos: Position) -> Result<Option<Digest>> {
        if pos == 0 {
            return Ok(None);
        }
        Ok(self.nodes.get((pos - 1) as usize).copied())
    }

    fn push(&mut self, digest: Digest) -> Result<Position> {
        self.nodes.push(digest);
        Ok(self.nodes.len() as u64)
    }

    fn size(&self) -> u64 {
        self.nodes.len() as u64
    }
}
