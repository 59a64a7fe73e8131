//! Blake3 node hashing for trees over `[u8; 32]`.
//!
//! Leaves and combined nodes are hashed under different one-byte prefixes,
//! so a leaf can never be passed off as the parent of two other nodes.
//! Carried nodes are not hashed at all: the tree moves them up unchanged.

const LEAF_TAG: u8 = 0x00;
const INTERNAL_TAG: u8 = 0x01;

/// Turn application bytes into a leaf, prefixed with `0x00`.
pub fn leaf_hash(value: &[u8]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[LEAF_TAG]);
    hasher.update(value);
    *hasher.finalize().as_bytes()
}

/// Parent of a complete pair, prefixed with `0x01`.
///
/// Pass it straight to [`LeanIMT::new`](crate::LeanIMT::new). It is only
/// ever called on full pairs; a trailing odd node reaches the next level
/// without going through it, so `blake3_merge(x, x)` never appears in a
/// tree unless two equal nodes really sit side by side.
pub fn blake3_merge(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[INTERNAL_TAG]);
    hasher.update(left);
    hasher.update(right);
    *hasher.finalize().as_bytes()
}
