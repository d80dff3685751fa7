use super::*;

qc!(iter, _iter);
fn _iter(list: Vec<Operation<TestPrefix, i32>>) -> bool {
    let Some((trie, reference)) = replay(list) else {
        return false;
    };
    trie.iter().eq(reference.iter())
        && trie.keys().eq(reference.keys())
        && trie.values().eq(reference.values())
        && (&trie).into_iter().eq(trie.begin())
}

qc!(iter_order, _iter_order);
fn _iter_order(trie: RouteTrie<TestPrefix, i32>) -> bool {
    trie.keys()
        .zip(trie.keys().skip(1))
        .all(|(a, b)| a.order(b).is_lt())
}

qc!(subtree_scan, _subtree_scan);
fn _subtree_scan((list, start): (Vec<Operation<TestPrefix, i32>>, TestPrefix)) -> bool {
    let Some((trie, reference)) = replay(list) else {
        return false;
    };
    let want = reference.iter().filter(|(p, _)| start.contains(p));
    trie.subtree_scan(&start).eq(want)
}

qc!(subtree_scan_end, _subtree_scan_end);
fn _subtree_scan_end((trie, start): (RouteTrie<TestPrefix, i32>, TestPrefix)) -> bool {
    let mut cursor = trie.subtree_scan(&start);
    let n = trie.iter().filter(|(p, _)| start.contains(p)).count();
    for _ in 0..n {
        if cursor.is_end() || cursor == trie.end() {
            return false;
        }
        cursor.advance();
    }
    cursor.is_end() && cursor == trie.end() && cursor.next().is_none()
}

qc!(cursor_peek, _cursor_peek);
fn _cursor_peek(trie: RouteTrie<TestPrefix, i32>) -> bool {
    let mut cursor = trie.begin();
    let mut peeked = Vec::new();
    while let (Some(p), Some(t)) = (cursor.key(), cursor.value()) {
        peeked.push((p, t));
        cursor.advance();
    }
    cursor == trie.end() && peeked.into_iter().eq(trie.iter())
}

qc!(cursor_equality, _cursor_equality);
fn _cursor_equality((trie, start): (RouteTrie<TestPrefix, i32>, TestPrefix)) -> bool {
    // two fresh cursors with the same bound walk in lockstep.
    let mut a = trie.subtree_scan(&start);
    let mut b = trie.subtree_scan(&start);
    loop {
        if a != b {
            return false;
        }
        if a.is_end() {
            return true;
        }
        a.advance();
        b.advance();
    }
}
