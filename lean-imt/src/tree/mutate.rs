//! Insert and update paths. Every parent written here comes out of
//! [`combine_or_carry`], which is the only place the level recurrence lives.

use std::collections::BTreeSet;

use log::{debug, trace};

use super::LeanIMT;
use crate::{LeanImtError, Result, helper::depth_for_size};

/// Compute the parent of the node at `index` on `level`.
///
/// The node is combined with its partner when the pair is complete
/// (`hash(left, right)`, in that order) and carried unchanged when it is the
/// trailing odd node. Returns the parent value and its index on the next
/// level.
pub(crate) fn combine_or_carry<T, H>(level: &[T], index: usize, hash: &H) -> (T, usize)
where
    T: Clone,
    H: Fn(&T, &T) -> T,
{
    debug_assert!(index < level.len());
    let left = index & !1;
    let parent = match level.get(left + 1) {
        Some(right) => hash(&level[left], right),
        None => level[left].clone(),
    };
    (parent, index >> 1)
}

/// Overwrite `level[index]`, or append when `index` is one past the end.
fn put_node<T>(level: &mut Vec<T>, index: usize, node: T) {
    if let Some(slot) = level.get_mut(index) {
        *slot = node;
    } else {
        debug_assert_eq!(index, level.len());
        level.push(node);
    }
}

impl<T, H> LeanIMT<T, H>
where
    T: Clone,
    H: Fn(&T, &T) -> T,
{
    /// Append a leaf and return its index.
    ///
    /// Only the path from the new leaf to the root is recomputed. When the
    /// leaf count crosses a power of two a new root level is opened.
    pub fn insert(&mut self, leaf: T) -> usize {
        let index = self.size();
        self.levels[0].push(leaf);
        self.grow_levels();
        self.rehash_path(index);
        trace!("inserted leaf {} (depth {})", index, self.depth());
        index
    }

    /// Append a non-empty batch of leaves and return the index of the first.
    ///
    /// Affected nodes are recomputed level by level in a single pass; the
    /// result is identical to inserting the leaves one at a time.
    ///
    /// Returns [`LeanImtError::NoLeaves`] for an empty batch.
    pub fn insert_many<I>(&mut self, leaves: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
    {
        let leaves: Vec<T> = leaves.into_iter().collect();
        if leaves.is_empty() {
            return Err(LeanImtError::NoLeaves);
        }
        Ok(self.append_leaves(leaves))
    }

    /// Replace the leaf at `index` and recompute its path to the root.
    ///
    /// Returns [`LeanImtError::LeafNotFound`] if `index >= size`.
    pub fn update(&mut self, index: usize, new_leaf: T) -> Result<()> {
        let size = self.size();
        if index >= size {
            return Err(LeanImtError::LeafNotFound { index, size });
        }
        self.levels[0][index] = new_leaf;
        self.rehash_path(index);
        trace!("updated leaf {}", index);
        Ok(())
    }

    /// Replace several leaves at once.
    ///
    /// `indices[i]` receives `leaves[i]`. Each affected parent is recomputed
    /// exactly once per level, however many updated leaves sit below it.
    /// All arguments are validated before anything is written.
    pub fn update_many(&mut self, indices: &[usize], leaves: Vec<T>) -> Result<()> {
        if indices.len() != leaves.len() {
            return Err(LeanImtError::LengthMismatch {
                indices: indices.len(),
                leaves: leaves.len(),
            });
        }
        if indices.is_empty() {
            return Err(LeanImtError::NoLeaves);
        }
        let size = self.size();
        let mut touched = BTreeSet::new();
        for &index in indices {
            if index >= size {
                return Err(LeanImtError::LeafNotFound { index, size });
            }
            if !touched.insert(index) {
                return Err(LeanImtError::DuplicateIndex(index));
            }
        }

        for (&index, leaf) in indices.iter().zip(leaves) {
            self.levels[0][index] = leaf;
        }
        for level in 0..self.depth() {
            let parents: BTreeSet<usize> = touched.iter().map(|index| index >> 1).collect();
            for &parent in &parents {
                let (node, _) = combine_or_carry(&self.levels[level], parent << 1, &self.hash);
                self.levels[level + 1][parent] = node;
            }
            touched = parents;
        }
        debug!("updated {} leaves", indices.len());
        Ok(())
    }

    /// Append `leaves` (non-empty) and rebuild everything to their right.
    pub(super) fn append_leaves(&mut self, leaves: Vec<T>) -> usize {
        debug_assert!(!leaves.is_empty());
        let start = self.size();
        let count = leaves.len();
        self.levels[0].extend(leaves);
        self.grow_levels();

        // `first` is the leftmost node on `level` that changed.
        let mut first = start;
        for level in 0..self.depth() {
            let first_parent = first >> 1;
            let end = self.levels[level].len().div_ceil(2);
            for parent in first_parent..end {
                let (node, _) = combine_or_carry(&self.levels[level], parent << 1, &self.hash);
                put_node(&mut self.levels[level + 1], parent, node);
            }
            first = first_parent;
        }
        debug!(
            "appended {} leaves at {} (size {}, depth {})",
            count,
            start,
            self.size(),
            self.depth()
        );
        start
    }

    // Open new root levels until there are `depth_for_size(size) + 1`.
    fn grow_levels(&mut self) {
        let depth = depth_for_size(self.size());
        while self.levels.len() <= depth {
            self.levels.push(Vec::with_capacity(1));
        }
    }

    // Recompute the nodes on the path from leaf `index` to the root.
    fn rehash_path(&mut self, mut index: usize) {
        for level in 0..self.depth() {
            let (node, parent) = combine_or_carry(&self.levels[level], index, &self.hash);
            put_node(&mut self.levels[level + 1], parent, node);
            index = parent;
        }
    }
}
