use assert_matches::assert_matches;

use super::{assert_levels_consistent, concat_hash, mix, string_leaves};
use crate::{LeanIMT, LeanImtError};

const ROOT_AFTER_FIVE_INSERTS: &str = "H(H(H(0,1),H(2,3)),4)";
const ROOT_AFTER_FIVE_UPDATES: &str = "H(H(H(0,0),H(0,0)),0)";

#[test]
fn test_new_tree_is_empty() {
    let tree: LeanIMT<String, _> = LeanIMT::new(concat_hash);
    assert_eq!(tree.root(), None);
    assert_eq!(tree.depth(), 0);
    assert_eq!(tree.size(), 0);
    assert!(tree.is_empty());
    assert!(tree.leaves().is_empty());
    assert_eq!(tree.levels().len(), 1);
}

#[test]
fn test_new_tree_with_custom_type() {
    let tree: LeanIMT<u64, _> = LeanIMT::new(mix);
    assert_eq!(tree.root(), None);
    assert_eq!(tree.depth(), 0);
    assert_eq!(tree.size(), 0);
}

#[test]
fn test_with_empty_leaves_is_empty() {
    let tree = LeanIMT::with_leaves(concat_hash, Vec::<String>::new());
    assert_eq!(tree, LeanIMT::new(concat_hash));
}

#[test]
fn test_with_leaves_matches_sequential_inserts() {
    for size in 100u64..116 {
        let bulk = LeanIMT::with_leaves(mix, 0..size);
        let mut sequential = LeanIMT::new(mix);
        for leaf in 0..size {
            sequential.insert(leaf);
        }
        assert_eq!(bulk.root(), sequential.root(), "size {}", size);
        assert_eq!(bulk.depth(), (size as f64).log2().ceil() as usize);
        assert_eq!(bulk.size(), size as usize);
        assert_eq!(bulk, sequential);
    }
}

#[test]
fn test_insert_single_leaf_is_root() {
    let mut tree = LeanIMT::new(concat_hash);
    assert_eq!(tree.insert("1".to_string()), 0);
    assert_eq!(tree.root().map(String::as_str), Some("1"));
    assert_eq!(tree.depth(), 0);
}

#[test]
fn test_insert_five_leaves() {
    let mut tree = LeanIMT::new(concat_hash);
    for (i, leaf) in string_leaves(5).into_iter().enumerate() {
        assert_eq!(tree.insert(leaf), i);
        assert_eq!(tree.size(), i + 1);
        assert_levels_consistent(&tree);
    }
    assert_eq!(tree.root().map(String::as_str), Some(ROOT_AFTER_FIVE_INSERTS));
    assert_eq!(tree.depth(), 3);
}

#[test]
fn test_trailing_leaf_is_carried_not_hashed() {
    let tree = LeanIMT::with_leaves(concat_hash, string_leaves(5));
    let levels = tree.levels();
    assert_eq!(levels[1], vec!["H(0,1)", "H(2,3)", "4"]);
    assert_eq!(levels[2], vec!["H(H(0,1),H(2,3))", "4"]);
    assert_eq!(levels[3], vec![ROOT_AFTER_FIVE_INSERTS]);
}

#[test]
fn test_depth_grows_at_powers_of_two() {
    let mut tree = LeanIMT::new(mix);
    let mut expected_depth = 0;
    for leaf in 0u64..130 {
        tree.insert(leaf);
        let size = tree.size();
        if size > 1 && (size - 1).is_power_of_two() {
            expected_depth += 1;
        }
        assert_eq!(tree.depth(), expected_depth, "size {}", size);
    }
}

#[test]
fn test_insert_many_five_leaves() {
    let mut tree = LeanIMT::new(concat_hash);
    assert_eq!(tree.insert_many(string_leaves(5)), Ok(0));
    assert_eq!(tree.root().map(String::as_str), Some(ROOT_AFTER_FIVE_INSERTS));
}

#[test]
fn test_insert_many_onto_existing_tree() {
    for existing in 0u64..20 {
        for added in 1u64..20 {
            let mut batched = LeanIMT::with_leaves(mix, 0..existing);
            assert_eq!(batched.insert_many(existing..existing + added), Ok(existing as usize));

            let mut sequential = LeanIMT::new(mix);
            for leaf in 0..existing + added {
                sequential.insert(leaf);
            }
            assert_eq!(batched, sequential, "existing {} added {}", existing, added);
            assert_levels_consistent(&batched);
        }
    }
}

#[test]
fn test_insert_many_empty_fails() {
    let mut tree = LeanIMT::with_leaves(concat_hash, string_leaves(3));
    let before = tree.clone();
    assert_eq!(tree.insert_many(Vec::new()), Err(LeanImtError::NoLeaves));
    assert_eq!(tree, before);
}

#[test]
fn test_update_first_of_two_leaves() {
    let mut tree = LeanIMT::with_leaves(concat_hash, string_leaves(2));
    tree.update(0, "2".to_string()).expect("update");
    assert_eq!(tree.root().map(String::as_str), Some("H(2,1)"));
}

#[test]
fn test_update_five_leaves() {
    let mut tree = LeanIMT::with_leaves(concat_hash, string_leaves(5));
    for i in 0..5 {
        tree.update(i, "0".to_string()).expect("update");
        assert_eq!(tree.leaf(i).map(String::as_str), Some("0"));
    }
    assert_eq!(tree.root().map(String::as_str), Some(ROOT_AFTER_FIVE_UPDATES));
}

#[test]
fn test_update_carried_leaf_changes_carried_nodes() {
    let mut tree = LeanIMT::with_leaves(concat_hash, string_leaves(5));
    tree.update(4, "x".to_string()).expect("update");
    assert_eq!(tree.levels()[1][2], "x");
    assert_eq!(tree.levels()[2][1], "x");
    assert_eq!(
        tree.root().map(String::as_str),
        Some("H(H(H(0,1),H(2,3)),x)")
    );
}

#[test]
fn test_update_single_leaf_tree() {
    let mut tree = LeanIMT::with_leaves(mix, [7u64]);
    tree.update(0, 9).expect("update");
    assert_eq!(tree.root(), Some(&9));
}

#[test]
fn test_update_matches_rebuild() {
    for size in 1u64..40 {
        for index in 0..size as usize {
            let mut tree = LeanIMT::with_leaves(mix, 0..size);
            tree.update(index, 1000).expect("update");

            let mut leaves: Vec<u64> = (0..size).collect();
            leaves[index] = 1000;
            let rebuilt = LeanIMT::with_leaves(mix, leaves);

            assert_eq!(tree.root(), rebuilt.root(), "size {} index {}", size, index);
            assert_eq!(tree, rebuilt);
        }
    }
}

#[test]
fn test_update_out_of_range_fails() {
    let mut tree = LeanIMT::with_leaves(concat_hash, string_leaves(5));
    let before = tree.clone();
    assert_eq!(
        tree.update(5, "x".to_string()),
        Err(LeanImtError::LeafNotFound { index: 5, size: 5 })
    );
    assert_eq!(tree, before);

    let mut empty = LeanIMT::new(concat_hash);
    assert_matches!(
        empty.update(0, "x".to_string()),
        Err(LeanImtError::LeafNotFound { index: 0, size: 0 })
    );
}

#[test]
fn test_update_many_matches_single_updates() {
    let indices = [0, 3, 4, 9, 10];
    let mut batched = LeanIMT::with_leaves(mix, 0u64..11);
    batched
        .update_many(&indices, vec![100, 103, 104, 109, 110])
        .expect("update_many");

    let mut single = LeanIMT::with_leaves(mix, 0u64..11);
    for &index in indices.iter().rev() {
        single.update(index, 100 + index as u64).expect("update");
    }
    assert_eq!(batched, single);
    assert_levels_consistent(&batched);
}

#[test]
fn test_update_many_rejects_bad_arguments() {
    let mut tree = LeanIMT::with_leaves(mix, 0u64..5);
    let before = tree.clone();

    assert_eq!(
        tree.update_many(&[0, 1], vec![1]),
        Err(LeanImtError::LengthMismatch {
            indices: 2,
            leaves: 1
        })
    );
    assert_eq!(tree.update_many(&[], vec![]), Err(LeanImtError::NoLeaves));
    assert_eq!(
        tree.update_many(&[1, 7], vec![1, 2]),
        Err(LeanImtError::LeafNotFound { index: 7, size: 5 })
    );
    assert_eq!(
        tree.update_many(&[2, 3, 2], vec![1, 2, 3]),
        Err(LeanImtError::DuplicateIndex(2))
    );
    assert_eq!(tree, before);
}

#[test]
fn test_index_of_and_has() {
    let tree = LeanIMT::with_leaves(concat_hash, string_leaves(5));
    assert_eq!(tree.index_of(&"2".to_string()), Some(2));
    assert_eq!(tree.index_of(&"999".to_string()), None);
    assert!(tree.has(&"2".to_string()));
    assert!(!tree.has(&"999".to_string()));
}

#[test]
fn test_index_of_returns_first_match() {
    let tree = LeanIMT::with_leaves(mix, [5u64, 6, 5, 6]);
    assert_eq!(tree.index_of(&6), Some(1));
}

/// An account leaf compared by public key only.
#[derive(Clone, Debug)]
struct Account {
    pubkey: u64,
    balance: u64,
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.pubkey == other.pubkey
    }
}

fn account_hash(left: &Account, right: &Account) -> Account {
    Account {
        pubkey: mix(&left.pubkey, &right.pubkey),
        balance: left.balance + right.balance,
    }
}

#[test]
fn test_index_of_uses_leaf_equality() {
    let accounts = vec![
        Account {
            pubkey: 11,
            balance: 500,
        },
        Account {
            pubkey: 22,
            balance: 0,
        },
    ];
    let tree = LeanIMT::with_leaves(account_hash, accounts);
    let probe = Account {
        pubkey: 22,
        balance: 12345,
    };
    assert_eq!(tree.index_of(&probe), Some(1));
    assert_eq!(tree.root().map(|root| root.balance), Some(500));
}

#[test]
fn test_levels_consistent_for_all_small_sizes() {
    for size in 0usize..70 {
        let tree = LeanIMT::with_leaves(concat_hash, string_leaves(size));
        assert_levels_consistent(&tree);
        assert_eq!(tree.root().is_none(), size == 0);
        assert_eq!(tree.depth(), crate::depth_for_size(size));
    }
}

#[test]
fn test_single_leaf_root_never_hashes() {
    let a = LeanIMT::with_leaves(|l: &u64, r: &u64| l + r, [1u64]);
    let b = LeanIMT::with_leaves(|l: &u64, r: &u64| l * r, [1u64]);
    assert_eq!(a.levels(), b.levels());
    assert_eq!(a.root(), b.root());
}
