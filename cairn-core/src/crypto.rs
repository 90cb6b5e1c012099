//! Digest primitives for Cairn.
//!
//! The accumulator treats hashing as an injected primitive: everything is
//! expressed over a [`Hasher`] so hosts can pick the digest function. Two
//! implementations ship here:
//! - [`Blake2b256`] (the default)
//! - [`Sha3_256`]
//!
//! Whichever is chosen, the same implementation must be used on both sides
//! of a proof — digests from different hash functions never agree.
//!
//! Integer serialization inside [`hash_with_integer`] is **decimal-ASCII**
//! (`0` → `"0"`, `23` → `"23"`). This is the one interoperability knob of
//! the commitment scheme and is used everywhere, including the empty-root
//! seed; proofs are not portable to deployments using a different
//! convention.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width in bytes of every digest the accumulator handles. Constant for
/// the lifetime of an instance.
pub const DIGEST_LEN: usize = 32;

/// A node commitment: the fixed-width output of the injected digest
/// function.
///
/// Digests are plain values. The engine copies them freely between the
/// node store, the peak cache and outgoing proofs; nothing ever hands out
/// a reference into the store.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// The all-zero digest. Only a placeholder while caches are being
    /// (re)built; no commitment ever equals it in practice.
    pub const fn zeroed() -> Self {
        Self([0; DIGEST_LEN])
    }

    /// Raw bytes, borrowed.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Raw bytes, by value.
    pub fn to_bytes(self) -> [u8; DIGEST_LEN] {
        self.0
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Four bytes identify a digest well enough in logs.
        write!(f, "Digest(")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..)")
    }
}

/// The injected digest primitive.
///
/// Implementations must be deterministic and produce a constant
/// [`DIGEST_LEN`]-byte width for the lifetime of an accumulator instance.
pub trait Hasher: Clone + Send + Sync {
    /// Digest a byte string.
    fn digest(&self, data: &[u8]) -> Digest;
}

/// BLAKE2b with 256-bit output. The default digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake2b256;

impl Hasher for Blake2b256 {
    fn digest(&self, data: &[u8]) -> Digest {
        use blake2::digest::{consts::U32, Digest as _};
        let mut hasher = blake2::Blake2b::<U32>::new();
        hasher.update(data);
        Digest(hasher.finalize().into())
    }
}

/// SHA3-256, for deployments standardized on the Keccak family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha3_256;

impl Hasher for Sha3_256 {
    fn digest(&self, data: &[u8]) -> Digest {
        use sha3::Digest as _;
        let mut hasher = sha3::Sha3_256::new();
        hasher.update(data);
        Digest(hasher.finalize().into())
    }
}

/// Digest an integer followed by a sequence of byte strings.
///
/// The integer is serialized as decimal ASCII, the parts are appended in
/// order, and the concatenation is digested once. This single helper
/// drives all three commitments in the accumulator:
/// - leaf: `n` = leaf position, parts = `[leaf data]`
/// - internal node: `n` = parent position, parts = `[left, right]`
/// - root bagging: `n` = size, parts = peak digests left-to-right
pub fn hash_with_integer<H: Hasher>(hasher: &H, n: u64, parts: &[&[u8]]) -> Digest {
    let mut buf = Vec::with_capacity(20 + parts.iter().map(|p| p.len()).sum::<usize>());
    buf.extend_from_slice(n.to_string().as_bytes());
    for part in parts {
        buf.extend_from_slice(part);
    }
    hasher.digest(&buf)
}
