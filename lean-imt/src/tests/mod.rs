mod test_tree;

use crate::LeanIMT;

/// Readable, order-sensitive combiner: `H(left,right)`.
#[allow(clippy::ptr_arg)]
pub(crate) fn concat_hash(left: &String, right: &String) -> String {
    format!("H({},{})", left, right)
}

/// Cheap non-commutative combiner over integers.
pub(crate) fn mix(left: &u64, right: &u64) -> u64 {
    left.wrapping_mul(0x9E37_79B9_7F4A_7C15).rotate_left(17) ^ right
}

/// Leaves `"0"`, `"1"`, … `"count - 1"`.
pub(crate) fn string_leaves(count: usize) -> Vec<String> {
    (0..count).map(|i| i.to_string()).collect()
}

/// Assert that every level of `tree` follows the combine-or-carry rule.
pub(crate) fn assert_levels_consistent<T, H>(tree: &LeanIMT<T, H>)
where
    T: Clone + PartialEq + core::fmt::Debug,
    H: Fn(&T, &T) -> T,
{
    let levels = tree.levels();
    assert_eq!(levels.len(), crate::depth_for_size(tree.size()) + 1);
    for (depth, pair) in levels.windows(2).enumerate() {
        let (lower, upper) = (&pair[0], &pair[1]);
        assert_eq!(upper.len(), lower.len().div_ceil(2), "level {}", depth + 1);
        for (j, node) in upper.iter().enumerate() {
            let expected = match lower.get(2 * j + 1) {
                Some(right) => (tree.hasher())(&lower[2 * j], right),
                None => lower[2 * j].clone(),
            };
            assert_eq!(node, &expected, "level {} node {}", depth + 1, j);
        }
    }
    assert!(levels[levels.len() - 1].len() <= 1);
}
