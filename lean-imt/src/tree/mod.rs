//! The LeanIMT level store: construction, accessors and leaf lookup.

use core::fmt;

use crate::helper::depth_for_size;

mod mutate;

/// A Lean Incremental Merkle Tree over node values of type `T`.
///
/// `levels[0]` holds the leaves in insertion order and `levels[d]` for
/// `d >= 1` is derived from `levels[d - 1]` by combining adjacent pairs with
/// `hash` and carrying a trailing odd node through unchanged. There are
/// always `depth + 1` levels; the last one holds the root (or nothing, for
/// an empty tree).
///
/// `H` is any `Fn(&T, &T) -> T`. It must be deterministic; the tree calls it
/// once per combined pair and never on a carried node.
///
/// The tree is a single-owner value: mutation takes `&mut self`, so
/// concurrent access needs external synchronisation.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone)]
pub struct LeanIMT<T, H> {
    levels: Vec<Vec<T>>,
    hash: H,
}

impl<T, H> LeanIMT<T, H> {
    /// Create an empty tree that combines nodes with `hash`.
    pub fn new(hash: H) -> Self {
        LeanIMT {
            levels: vec![Vec::new()],
            hash,
        }
    }

    /// Rebuild a tree from levels that already satisfy the level recurrence.
    ///
    /// No hashing happens here; callers are responsible for the shape check.
    pub(crate) fn from_levels(hash: H, levels: Vec<Vec<T>>) -> Self {
        debug_assert!(!levels.is_empty());
        debug_assert_eq!(levels.len(), depth_for_size(levels[0].len()) + 1);
        LeanIMT { levels, hash }
    }

    /// Number of leaves.
    pub fn size(&self) -> usize {
        self.levels[0].len()
    }

    /// Returns `true` if the tree holds no leaves.
    pub fn is_empty(&self) -> bool {
        self.levels[0].is_empty()
    }

    /// Number of levels above the leaf level.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// The root, or `None` for an empty tree.
    pub fn root(&self) -> Option<&T> {
        self.levels[self.depth()].first()
    }

    /// All leaves in insertion order.
    pub fn leaves(&self) -> &[T] {
        &self.levels[0]
    }

    /// The leaf at `index`, if any.
    pub fn leaf(&self, index: usize) -> Option<&T> {
        self.levels[0].get(index)
    }

    /// Every level, leaf level first and root level last.
    pub fn levels(&self) -> &[Vec<T>] {
        &self.levels
    }

    /// The combining function this tree was built with.
    pub fn hasher(&self) -> &H {
        &self.hash
    }
}

impl<T: PartialEq, H> LeanIMT<T, H> {
    /// Position of the first leaf equal to `leaf`, or `None`.
    ///
    /// Equality is `T`'s `PartialEq`, so structured leaf types decide for
    /// themselves what "the same leaf" means.
    pub fn index_of(&self, leaf: &T) -> Option<usize> {
        self.levels[0].iter().position(|l| l == leaf)
    }

    /// Returns `true` if some leaf equals `leaf`.
    pub fn has(&self, leaf: &T) -> bool {
        self.index_of(leaf).is_some()
    }
}

impl<T, H> LeanIMT<T, H>
where
    T: Clone,
    H: Fn(&T, &T) -> T,
{
    /// Create a tree pre-seeded with `leaves`.
    ///
    /// Equivalent to [`new`](Self::new) followed by inserting every leaf in
    /// order, but built level by level in one pass. An empty sequence
    /// yields an empty tree.
    pub fn with_leaves<I>(hash: H, leaves: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = Self::new(hash);
        let leaves: Vec<T> = leaves.into_iter().collect();
        if !leaves.is_empty() {
            tree.append_leaves(leaves);
        }
        tree
    }
}

/// Two trees are equal when their levels are equal; the hash function is
/// not compared.
impl<T: PartialEq, H> PartialEq for LeanIMT<T, H> {
    fn eq(&self, other: &Self) -> bool {
        self.levels == other.levels
    }
}

impl<T: fmt::Debug, H> fmt::Debug for LeanIMT<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeanIMT")
            .field("size", &self.size())
            .field("depth", &self.depth())
            .field("levels", &self.levels)
            .finish_non_exhaustive()
    }
}
