use std::collections::HashMap;

use crate::ChampMap;
use crate::tests::support::assert_map_invariants;

#[test]
fn update_hits_existing_key() {
    let map = ChampMap::new().insert("k", 10);
    let updated = map.update(&"k", |v| v + 5);
    assert_eq!(updated.get(&"k"), Some(&15));
    assert_eq!(map.get(&"k"), Some(&10));
}

#[test]
fn update_misses_quietly() {
    let map = ChampMap::new().insert("k", 10);
    let same = map.update(&"missing", |v| v + 5);
    assert_eq!(same, map);
}

#[test]
fn update_or_insert_both_paths() {
    let map: ChampMap<&str, i32> = ChampMap::new().insert("hit", 1);
    let on_hit = map.update_or_insert("hit", |v| v * 100, || -1);
    assert_eq!(on_hit.get(&"hit"), Some(&100));
    let on_miss = map.update_or_insert("miss", |v| v * 100, || -1);
    assert_eq!(on_miss.get(&"miss"), Some(&-1));
    assert_eq!(on_miss.len(), 2);
}

#[test]
fn put_if_absent_only_fills_gaps() {
    let map = ChampMap::new().insert(1, "set");
    let kept = map.put_if_absent(1, || "ignored");
    assert_eq!(kept.get(&1), Some(&"set"));
    let added = map.put_if_absent(2, || "fresh");
    assert_eq!(added.get(&2), Some(&"fresh"));
}

#[test]
fn update_all_rewrites_every_value() {
    let map: ChampMap<u32, u32> = (0..64).map(|i| (i, i)).collect();
    let doubled = map.update_all(|_, v| v * 2);
    assert_eq!(doubled.len(), 64);
    for i in 0..64 {
        assert_eq!(doubled.get(&i), Some(&(i * 2)));
        assert_eq!(map.get(&i), Some(&i), "source map disturbed");
    }
    assert_map_invariants(&doubled);
}

#[test]
fn map_entries_can_rekey() {
    let map: ChampMap<u32, u32> = (0..10).map(|i| (i, i)).collect();
    let rekeyed: ChampMap<String, u32> = map.map_entries(|k, v| (format!("k{k}"), v + 1));
    assert_eq!(rekeyed.len(), 10);
    assert_eq!(rekeyed.get(&String::from("k3")), Some(&4));
    assert_map_invariants(&rekeyed);
}

#[test]
fn map_entries_collapsing_keys() {
    let map: ChampMap<u32, u32> = (0..10).map(|i| (i, i)).collect();
    let folded: ChampMap<u32, u32> = map.map_entries(|k, v| (k % 2, *v));
    assert_eq!(folded.len(), 2);
}

#[test]
fn remove_where_filters_entries() {
    let map: ChampMap<u32, u32> = (0..30).map(|i| (i, i)).collect();
    let evens = map.remove_where(|k, _| k % 2 == 1);
    assert_eq!(evens.len(), 15);
    assert!(evens.contains_key(&4));
    assert!(!evens.contains_key(&5));
    assert_map_invariants(&evens);

    // The rebuilt trie matches a direct build of the survivors.
    let direct: ChampMap<u32, u32> = (0..30).filter(|i| i % 2 == 0).map(|i| (i, i)).collect();
    assert_eq!(evens, direct);
}

#[test]
fn extend_with_bulk_insert() {
    let base: ChampMap<u32, u32> = (0..50).map(|i| (i, i)).collect();
    let extended = base.extend_with((50..100).map(|i| (i, i)));
    assert_eq!(extended.len(), 100);
    assert_eq!(base.len(), 50, "source map disturbed by bulk insert");
    let direct: ChampMap<u32, u32> = (0..100).map(|i| (i, i)).collect();
    assert_eq!(extended, direct);
    assert_eq!(extended.adhash(), direct.adhash());
    assert_map_invariants(&extended);
}

#[test]
fn to_hash_map_roundtrips() {
    let map: ChampMap<u32, u32> = (0..40).map(|i| (i, i * 2)).collect();
    let std_map: HashMap<u32, u32> = map.to_hash_map();
    assert_eq!(std_map.len(), 40);
    let back: ChampMap<u32, u32> = std_map.into();
    assert_eq!(back, map);
}
