use crate::PathStep;

/// Number of pairing rounds needed to collapse `size` leaves into one node.
///
/// `0` for an empty or single-leaf tree, otherwise `ceil(log2(size))`.
pub fn depth_for_size(size: usize) -> usize {
    if size <= 1 {
        return 0;
    }
    (usize::BITS - (size - 1).leading_zeros()) as usize
}

/// Length of every level of a tree holding `size` leaves, leaf level first.
///
/// Each level is `ceil(prev / 2)` long. An empty tree has a single, empty
/// leaf level.
///
/// ```text
/// size 5:  [5, 3, 2, 1]
/// size 4:  [4, 2, 1]
/// size 1:  [1]
/// size 0:  [0]
/// ```
pub fn level_lengths(size: usize) -> Vec<usize> {
    let mut lengths = Vec::with_capacity(depth_for_size(size) + 1);
    let mut len = size;
    lengths.push(len);
    while len > 1 {
        len = len.div_ceil(2);
        lengths.push(len);
    }
    lengths
}

/// Combine-or-carry decision for the node at `index` on a level of length
/// `len`.
pub(crate) fn step_at(index: usize, len: usize) -> PathStep {
    debug_assert!(index < len);
    if index & 1 == 1 {
        PathStep::Right
    } else if index + 1 < len {
        PathStep::Left
    } else {
        PathStep::Carry
    }
}

/// The decision taken at every level on the way from leaf `index` to the
/// root of a tree with `size` leaves, leaf level first.
///
/// Returns `None` when `index` does not address a leaf.
pub fn path_steps(mut index: usize, size: usize) -> Option<Vec<PathStep>> {
    if index >= size {
        return None;
    }
    let lengths = level_lengths(size);
    let mut steps = Vec::with_capacity(lengths.len() - 1);
    for &len in &lengths[..lengths.len() - 1] {
        steps.push(step_at(index, len));
        index >>= 1;
    }
    Some(steps)
}

/// Exact number of hash calls made by inserting one leaf into a tree that
/// currently holds `leaf_count` leaves.
///
/// The new leaf is always the last node of its level, so it is either a
/// right operand or carried; only the former costs a hash.
///
/// A full tree (`usize::MAX` leaves) cannot take another leaf and reports `0`.
pub fn hash_count_for_insert(leaf_count: usize) -> u32 {
    leaf_count
        .checked_add(1)
        .and_then(|size| path_steps(leaf_count, size))
        .unwrap_or_default()
        .iter()
        .filter(|step| step.is_combine())
        .count() as u32
}
