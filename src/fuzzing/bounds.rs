use super::*;

fn lpm(trie: &RouteTrie<TestPrefix, i32>, addr: u32) -> Option<TestPrefix> {
    trie.longest_match(addr).map(|(p, _)| *p)
}

qc!(find_bounds, _find_bounds);
fn _find_bounds((trie, addr, samples): (RouteTrie<TestPrefix, i32>, u32, Vec<u32>)) -> bool {
    let (lo, hi) = trie.find_bounds(addr);
    let want = lpm(&trie, addr);
    if !(lo <= addr && addr <= hi) {
        return false;
    }
    // the whole range resolves to the same route
    let inside = [lo, hi]
        .into_iter()
        .chain(samples.into_iter().map(|x| lo + x % (hi - lo).saturating_add(1)))
        .all(|x| lpm(&trie, x) == want);
    // and it cannot be extended on either side
    let lo_tight = lo == 0 || lpm(&trie, lo - 1) != want;
    let hi_tight = hi == u32::MAX || lpm(&trie, hi + 1) != want;
    inside && lo_tight && hi_tight
}

qc!(covered_bounds, _covered_bounds);
fn _covered_bounds((list, queries): (Vec<Operation<TestPrefix, i32>>, Vec<u32>)) -> bool {
    let Some((trie, reference)) = replay(list) else {
        return false;
    };
    queries.into_iter().all(|a| {
        let lower = reference
            .keys()
            .filter(|p| p.top() >= a)
            .map(|p| p.mask().max(a))
            .min();
        let upper = reference
            .keys()
            .filter(|p| p.mask() <= a)
            .map(|p| p.top().min(a))
            .max();
        trie.lower_bound(a) == lower && trie.upper_bound(a) == upper
    })
}
