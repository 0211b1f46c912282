//! Seeded random operation streams checked against std oracles.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

use crate::tests::support::{assert_list_invariants, assert_map_invariants};
use crate::{ChampMap, RrbList};

#[test]
fn list_random_ops_match_vec_oracle() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let mut list: RrbList<u32> = RrbList::new();
    let mut oracle: Vec<u32> = Vec::new();

    for step in 0..2000 {
        match rng.gen_range(0..10) {
            0..=3 => {
                let v = rng.r#gen();
                list = list.push_back(v);
                oracle.push(v);
            }
            4 | 5 => {
                let v = rng.r#gen();
                let at = rng.gen_range(0..=oracle.len());
                list = list.insert(at, v).unwrap();
                oracle.insert(at, v);
            }
            6 | 7 if !oracle.is_empty() => {
                let at = rng.gen_range(0..oracle.len());
                list = list.remove_at(at).unwrap();
                oracle.remove(at);
            }
            8 if !oracle.is_empty() => {
                let v = rng.r#gen();
                let at = rng.gen_range(0..oracle.len());
                list = list.set(at, v).unwrap();
                oracle[at] = v;
            }
            9 if oracle.len() > 64 => {
                let start = rng.gen_range(0..oracle.len() / 2);
                let end = rng.gen_range(start..oracle.len());
                list = list.sublist(start, end).unwrap();
                oracle = oracle[start..end].to_vec();
            }
            _ => {}
        }
        assert_eq!(list.len(), oracle.len(), "length diverged at step {step}");
        if step % 100 == 0 {
            assert_eq!(list.to_vec(), oracle, "content diverged at step {step}");
            assert_list_invariants(&list);
        }
    }
    assert_eq!(list.to_vec(), oracle);
    assert_list_invariants(&list);
}

#[test]
fn list_concat_heavy_random_ops() {
    let mut rng = StdRng::seed_from_u64(0xBEEF);
    let mut list: RrbList<u32> = (0..100).collect();
    let mut oracle: Vec<u32> = (0..100).collect();

    for _ in 0..60 {
        let other_len = rng.gen_range(0..400);
        let other: RrbList<u32> = (0..other_len).collect();
        if rng.gen_bool(0.5) {
            list = list.concat(&other);
            oracle.extend(0..other_len);
        } else {
            list = other.concat(&list);
            let mut fresh: Vec<u32> = (0..other_len).collect();
            fresh.extend_from_slice(&oracle);
            oracle = fresh;
        }
        if oracle.len() > 20_000 {
            list = list.sublist(0, 5_000).unwrap();
            oracle.truncate(5_000);
        }
        assert_eq!(list.len(), oracle.len());
        assert_list_invariants(&list);
    }
    assert_eq!(list.to_vec(), oracle);
}

#[test]
fn map_random_ops_match_hashmap_oracle() {
    let mut rng = StdRng::seed_from_u64(0xFACADE);
    let mut map: ChampMap<u16, u32> = ChampMap::new();
    let mut oracle: HashMap<u16, u32> = HashMap::new();

    for step in 0..3000 {
        let key = rng.gen_range(0..600);
        match rng.gen_range(0..10) {
            0..=5 => {
                let value = rng.r#gen();
                map = map.insert(key, value);
                oracle.insert(key, value);
            }
            6 | 7 => {
                map = map.remove(&key);
                oracle.remove(&key);
            }
            8 => {
                map = map.update(&key, |v| v.wrapping_add(1));
                if let Some(v) = oracle.get_mut(&key) {
                    *v = v.wrapping_add(1);
                }
            }
            _ => {
                map = map.put_if_absent(key, || 1);
                oracle.entry(key).or_insert(1);
            }
        }
        assert_eq!(map.len(), oracle.len(), "length diverged at step {step}");
        if step % 200 == 0 {
            assert_map_invariants(&map);
        }
    }

    for (k, v) in &oracle {
        assert_eq!(map.get(k), Some(v), "key {k} diverged");
    }
    assert_map_invariants(&map);

    // And the survivors form a canonical trie.
    let direct: ChampMap<u16, u32> = oracle.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(map, direct);
}

#[test]
fn map_drain_in_random_order() {
    let mut rng = StdRng::seed_from_u64(31337);
    let mut keys: Vec<u32> = (0..400).collect();
    let mut map: ChampMap<u32, u32> = keys.iter().map(|&k| (k, k)).collect();

    while !keys.is_empty() {
        let at = rng.gen_range(0..keys.len());
        let key = keys.swap_remove(at);
        map = map.remove(&key);
        assert_eq!(map.len(), keys.len());
        if keys.len() % 50 == 0 {
            assert_map_invariants(&map);
        }
    }
    assert!(map.is_empty());
    assert_eq!(map.adhash(), 0);
    assert_eq!(map, ChampMap::new());
}
