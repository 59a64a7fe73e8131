//! Lean Incremental Merkle Tree (LeanIMT): an append-and-update binary
//! accumulator.
//!
//! Leaves are kept in insertion order and every level above them is derived
//! by pairing adjacent nodes. A node without a right partner is *carried* to
//! the next level unchanged rather than hashed with itself or with a zero
//! value, so the shape of the tree is a pure function of the leaf count and
//! no padding nodes ever exist.
//!
//! The combining function is supplied by the caller as any
//! `Fn(&T, &T) -> T`; the tree never assumes a particular hash.
//!
//! # Core types
//!
//! - [`LeanIMT`]: the tree (insert, update, query, proof generation,
//!   export/import).
//! - [`Proof`]: a membership proof that records the leaf count it was
//!   produced against, plus one [`PathStep`] per level.
//! - [`verify_proof`]: stand-alone verification given only a proof and a
//!   hash function.
//!
//! # Features
//!
//! - `blake3` (default): a domain-separated Blake3 combiner over
//!   `[u8; 32]` nodes ([`blake3_merge`], [`leaf_hash`]).

#![warn(missing_docs)]

mod error;
#[cfg(feature = "blake3")]
mod hash;
/// Pure functions of the leaf count: depth, level lengths and per-leaf path
/// decisions.
pub mod helper;
mod proof;
mod serialization;
mod tree;
#[cfg(test)]
mod tests;

pub use error::LeanImtError;
#[cfg(feature = "blake3")]
pub use hash::{blake3_merge, leaf_hash};
pub use helper::{depth_for_size, hash_count_for_insert, level_lengths, path_steps};
pub use proof::{PathStep, Proof, verify_proof};
pub use tree::LeanIMT;

/// Alias for `core::result::Result<T, LeanImtError>`.
pub type Result<T> = core::result::Result<T, LeanImtError>;
