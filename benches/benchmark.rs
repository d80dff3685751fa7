use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ip_network_table_deps_treebitmap::IpLookupTable;
use ipnet::Ipv4Net;
use rand::prelude::*;
use route_trie::*;
use std::net::Ipv4Addr;

const ROUTES: usize = 100_000;
const QUERIES: usize = 100_000;

/// A route update as seen by a routing table: announce or withdraw.
enum Update {
    Announce(Ipv4Net, u32),
    Withdraw(Ipv4Net),
}

/// Prefix lengths roughly follow a full table: mostly /24, some /16 to /23, few shorter.
fn random_net(rng: &mut ThreadRng) -> Ipv4Net {
    let len = match rng.gen_range(0..10) {
        0 => rng.gen_range(8..16),
        1..=4 => rng.gen_range(16..24),
        _ => 24,
    };
    Ipv4Net::new(Ipv4Addr::from(rng.gen::<u32>()), len)
        .unwrap()
        .trunc()
}

/// Announce random routes, and withdraw a previously announced one every fifth update.
fn updates() -> Vec<Update> {
    let mut rng = thread_rng();
    let mut announced = Vec::new();
    (0..ROUTES)
        .map(|i| {
            if i % 5 == 4 && !announced.is_empty() {
                let idx = rng.gen_range(0..announced.len());
                Update::Withdraw(announced.swap_remove(idx))
            } else {
                let net = random_net(&mut rng);
                announced.push(net);
                Update::Announce(net, rng.gen())
            }
        })
        .collect()
}

fn queries() -> Vec<Ipv4Addr> {
    let mut rng = thread_rng();
    (0..QUERIES).map(|_| Ipv4Addr::from(rng.gen::<u32>())).collect()
}

fn apply_route_trie(trie: &mut RouteTrie<Ipv4Net, u32>, updates: &[Update]) {
    for update in updates {
        match update {
            Update::Announce(net, val) => black_box(trie.entry(*net).insert(*val)),
            Update::Withdraw(net) => black_box(trie.erase(net).ok()),
        };
    }
}

fn apply_treebitmap(map: &mut IpLookupTable<Ipv4Addr, u32>, updates: &[Update]) {
    for update in updates {
        match update {
            Update::Announce(net, val) => {
                black_box(map.insert(net.network(), net.prefix_len() as u32, *val))
            }
            Update::Withdraw(net) => {
                black_box(map.remove(net.network(), net.prefix_len() as u32))
            }
        };
    }
}

pub fn modifications(c: &mut Criterion) {
    let updates = updates();
    let mut group = c.benchmark_group("modification");

    group.bench_function("RouteTrie", |b| {
        b.iter(|| apply_route_trie(&mut RouteTrie::new(), &updates))
    });
    group.bench_function("TreeBitMap", |b| {
        b.iter(|| apply_treebitmap(&mut IpLookupTable::new(), &updates))
    });

    group.finish();
}

pub fn lookups(c: &mut Criterion) {
    let updates = updates();
    let queries = queries();
    let mut trie = RouteTrie::new();
    let mut treebitmap = IpLookupTable::new();
    apply_route_trie(&mut trie, &updates);
    apply_treebitmap(&mut treebitmap, &updates);

    let mut group = c.benchmark_group("longest match");

    group.bench_function("RouteTrie", |b| {
        b.iter(|| {
            for addr in &queries {
                black_box(trie.longest_match(*addr));
            }
        })
    });
    group.bench_function("TreeBitMap", |b| {
        b.iter(|| {
            for addr in &queries {
                black_box(treebitmap.longest_match(*addr));
            }
        })
    });

    group.finish();
}

pub fn traversals(c: &mut Criterion) {
    let updates = updates();
    let queries = queries();
    let mut trie = RouteTrie::new();
    apply_route_trie(&mut trie, &updates);

    let mut group = c.benchmark_group("route trie traversals");

    group.bench_function("find_bounds", |b| {
        b.iter(|| {
            for addr in &queries {
                black_box(trie.find_bounds(*addr));
            }
        })
    });
    group.bench_function("lower_bound", |b| {
        b.iter(|| {
            for addr in &queries {
                black_box(trie.lower_bound(*addr));
            }
        })
    });
    group.bench_function("less_specific /24", |b| {
        b.iter(|| {
            for addr in &queries {
                let net = Ipv4Net::new(*addr, 24).unwrap().trunc();
                black_box(trie.less_specific(&net));
            }
        })
    });
    group.bench_function("subtree_scan /16", |b| {
        b.iter(|| {
            for addr in queries.iter().take(QUERIES / 100) {
                let net = Ipv4Net::new(*addr, 16).unwrap().trunc();
                black_box(trie.subtree_scan(&net).count());
            }
        })
    });

    group.finish();
}

criterion_group!(benches, modifications, lookups, traversals);
criterion_main!(benches);
