use std::collections::HashMap;

use super::*;
use itertools::Itertools;

qc!(new, _new);
fn _new(list: Vec<(TestPrefix, i32)>) -> bool {
    let mut trie = RouteTrie::new();
    let mut hmap = HashMap::new();

    for (p, t) in list {
        trie.entry(p).insert(t);
        hmap.insert(p, t);
    }

    trie.validate().is_ok()
        && trie.len() == hmap.len()
        && trie
            .iter()
            .map(|(p, t)| (*p, *t))
            .eq(hmap.into_iter().sorted())
}

qc!(new_mods, _new_mods);
fn _new_mods(list: Vec<Operation<TestPrefix, i32>>) -> bool {
    match replay(list) {
        Some((trie, reference)) => {
            trie.len() == reference.len()
                && trie.is_empty() == reference.is_empty()
                && trie.iter().eq(reference.iter())
        }
        None => false,
    }
}

qc!(new_mods_entry, _new_mods_entry);
fn _new_mods_entry(list: Vec<Operation<TestPrefix, i32>>) -> bool {
    let mut trie = RouteTrie::new();
    let mut hmap = HashMap::new();

    for op in list {
        match op {
            Operation::Add(p, t) => {
                if trie.entry(p).insert(t) != hmap.insert(p, t) {
                    return false;
                }
            }
            Operation::Remove(p) => {
                let removed = match trie.entry(p) {
                    Entry::Occupied(e) => Some(e.remove()),
                    Entry::Vacant(_) => None,
                };
                if removed != hmap.remove(&p) {
                    return false;
                }
            }
        }
        if trie.validate().is_err() {
            return false;
        }
    }

    trie.iter()
        .map(|(p, t)| (*p, *t))
        .eq(hmap.into_iter().sorted())
}

qc!(lookups, _lookups);
fn _lookups((list, queries): (Vec<Operation<TestPrefix, i32>>, Vec<TestPrefix>)) -> bool {
    let Some((trie, reference)) = replay(list) else {
        return false;
    };
    queries.into_iter().all(|p| {
        trie.exact(&p) == reference.get(&p)
            && trie.contains_key(&p) == reference.contains_key(&p)
            && trie.longest_match_prefix(&p) == brute_force_lpm(&reference, &p, false)
            && trie.longest_match(p.0) == brute_force_lpm(&reference, &TestPrefix(p.0, 32), false)
            && trie.less_specific(&p) == brute_force_lpm(&reference, &p, true)
    })
}

qc!(erase_after_insert, _erase_after_insert);
fn _erase_after_insert((mut trie, p, t): (RouteTrie<TestPrefix, i32>, TestPrefix, i32)) -> bool {
    if trie.contains_key(&p) {
        return true;
    }
    let before = trie.clone();
    trie.insert(p, t).is_ok()
        && trie.validate().is_ok()
        && trie.erase(&p) == Ok(t)
        && trie.validate().is_ok()
        && trie == before
}

qc!(failed_mods_keep_tree, _failed_mods_keep_tree);
fn _failed_mods_keep_tree((mut trie, p, t): (RouteTrie<TestPrefix, i32>, TestPrefix, i32)) -> bool {
    let before = format!("{:?}", trie);
    let result = if trie.contains_key(&p) {
        trie.insert(p, t) == Err(TrieError::DuplicateKey(p))
    } else {
        trie.erase(&p) == Err(TrieError::NotFound(p))
    };
    result && format!("{:?}", trie) == before
}

qc!(equality, _equality);
fn _equality(list: Vec<Operation<TestPrefix, i32>>) -> bool {
    let Some((trie, _)) = replay(list) else {
        return false;
    };

    let clone = trie
        .iter()
        .map(|(p, t)| (*p, *t))
        .collect::<RouteTrie<_, _>>();

    trie == clone && trie.len() == clone.len() && trie.is_empty() == clone.is_empty()
}

qc!(retain, _retain);
fn _retain((mut trie, root): (RouteTrie<TestPrefix, i32>, TestPrefix)) -> bool {
    let want = select(&trie, |p, _| !(root.contains(p) && p.1 >= root.1 + 2));
    trie.retain(|p, _| !(root.contains(p) && p.1 >= root.1 + 2));
    trie.validate().is_ok()
        && trie.len() == want.len()
        && trie.iter().map(|(p, t)| (*p, *t)).eq(want)
}

qc!(clear, _clear);
fn _clear((mut trie, list): (RouteTrie<TestPrefix, i32>, Vec<(TestPrefix, i32)>)) -> bool {
    trie.clear();
    if !trie.is_empty() || trie.iter().next().is_some() || trie.validate().is_err() {
        return false;
    }
    trie.extend(list.iter().copied());
    let want = list.into_iter().rev().unique_by(|(p, _)| *p).sorted();
    trie.validate().is_ok() && trie.iter().map(|(p, t)| (*p, *t)).eq(want)
}

fn select<F: Fn(&TestPrefix, &i32) -> bool>(
    trie: &RouteTrie<TestPrefix, i32>,
    f: F,
) -> Vec<(TestPrefix, i32)> {
    trie.iter()
        .filter(|(p, t)| f(*p, *t))
        .map(|(p, t)| (*p, *t))
        .collect()
}
