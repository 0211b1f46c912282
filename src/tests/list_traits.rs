use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::RrbList;
use crate::rrb_list;

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn default_is_empty() {
    let list: RrbList<i32> = RrbList::default();
    assert!(list.is_empty());
}

#[test]
fn debug_format() {
    let list: RrbList<i32> = vec![1, 2, 3].into();
    assert_eq!(format!("{list:?}"), "[1, 2, 3]");
}

#[test]
fn index_operator() {
    let list: RrbList<i32> = vec![10, 20].into();
    assert_eq!(list[0], 10);
    assert_eq!(list[1], 20);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn index_out_of_bounds_panics() {
    let list: RrbList<i32> = vec![1].into();
    let _ = list[1];
}

#[test]
fn from_iterator_and_extend() {
    let list: RrbList<i32> = (0..5).collect();
    assert_eq!(list.to_vec(), vec![0, 1, 2, 3, 4]);

    let mut extended = list.clone();
    extended.extend(5..8);
    assert_eq!(extended.to_vec(), (0..8).collect::<Vec<_>>());
    assert_eq!(list.len(), 5, "extend must not touch the source value");
}

#[test]
fn from_slice() {
    let list: RrbList<i32> = (&[7, 8, 9][..]).into();
    assert_eq!(list.to_vec(), vec![7, 8, 9]);
}

#[test]
fn list_macro() {
    let empty: RrbList<i32> = rrb_list![];
    assert!(empty.is_empty());
    let list = rrb_list![1, 2, 3];
    assert_eq!(list.to_vec(), vec![1, 2, 3]);
}

/// Lists built through different operation sequences compare equal, and
/// equal lists hash equal.
#[test]
fn equality_and_hash_congruence() {
    let pushed: RrbList<usize> = (0..200).collect();
    let mut inserted = RrbList::new();
    for i in (0..200).rev() {
        inserted = inserted.insert(0, i).unwrap();
    }
    let concatenated = pushed.sublist(0, 100).unwrap().concat(&pushed.sublist(100, 200).unwrap());

    assert_eq!(pushed, inserted);
    assert_eq!(pushed, concatenated);
    assert_eq!(hash_of(&pushed), hash_of(&inserted));
    assert_eq!(hash_of(&pushed), hash_of(&concatenated));
}

#[test]
fn inequality() {
    let a: RrbList<i32> = vec![1, 2, 3].into();
    let b: RrbList<i32> = vec![1, 2, 4].into();
    let c: RrbList<i32> = vec![1, 2].into();
    assert_ne!(a, b);
    assert_ne!(a, c);
}

#[test]
fn clone_is_cheap_sharing() {
    let list: RrbList<usize> = (0..1000).collect();
    let copy = list.clone();
    assert_eq!(copy, list);
    match (&copy.root, &list.root) {
        (Some(a), Some(b)) => assert!(std::sync::Arc::ptr_eq(a, b)),
        _ => panic!("roots missing"),
    }
}

/// Frozen lists are freely shareable across threads.
#[test]
fn shared_across_threads() {
    let list: RrbList<usize> = (0..500).collect();
    let copy = list.clone();
    let handle = std::thread::spawn(move || copy.iter().sum::<usize>());
    let total = handle.join().expect("reader thread panicked");
    assert_eq!(total, (0..500).sum());
    assert_eq!(list.len(), 500);
}
