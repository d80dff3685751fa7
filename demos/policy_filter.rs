//! A policy filtering stage of a routing pipeline. Every route passing through is mirrored into a
//! `RouteTrie`, keyed by its network, so that the filters can be re-run over all known routes when
//! the policy changes.

use std::net::Ipv4Addr;
use std::rc::Rc;

use ipnet::Ipv4Net;
use log::{debug, info};
use rand::prelude::*;
use route_trie::*;

/// The authoritative route as owned by the upstream routing table.
#[derive(Debug)]
struct RouteEntry {
    net: Ipv4Net,
    nexthop: Ipv4Addr,
    metric: u32,
}

/// A filter accepts or rejects a route.
type Filter = Box<dyn Fn(&RouteEntry) -> bool>;

struct PolicyStage {
    mirror: RouteTrie<Ipv4Net, Rc<RouteEntry>>,
    filters: Vec<Filter>,
    accepted: usize,
}

impl PolicyStage {
    fn new() -> Self {
        Self {
            mirror: RouteTrie::new(),
            filters: Vec::new(),
            accepted: 0,
        }
    }

    fn accept(&self, route: &RouteEntry) -> bool {
        self.filters.iter().all(|f| f(route))
    }

    /// A route arrived from upstream. Returns `true` if it passes downstream.
    fn add_route(&mut self, route: Rc<RouteEntry>) -> Result<bool, TrieError<Ipv4Net>> {
        self.mirror.insert(route.net, route.clone())?;
        let pass = self.accept(&route);
        if pass {
            self.accepted += 1;
        }
        Ok(pass)
    }

    /// A route was withdrawn upstream.
    fn delete_route(&mut self, net: &Ipv4Net) -> Result<Rc<RouteEntry>, TrieError<Ipv4Net>> {
        let route = self.mirror.erase(net)?;
        if self.accept(&route) {
            self.accepted -= 1;
        }
        Ok(route)
    }

    /// Install a new policy and re-evaluate every stored route.
    fn configure(&mut self, filters: Vec<Filter>) {
        let old = std::mem::replace(&mut self.filters, filters);
        let mut accepted = 0;
        let mut changed = 0;
        for (_, route) in self.mirror.iter() {
            let before = old.iter().all(|f| f(route));
            let now = self.accept(route);
            accepted += now as usize;
            changed += (before != now) as usize;
        }
        info!(
            "policy push: {} of {} routes accepted, {} changed their verdict",
            accepted,
            self.mirror.route_count(),
            changed
        );
        self.accepted = accepted;
    }
}

fn random_route(rng: &mut ThreadRng) -> Rc<RouteEntry> {
    let len = rng.gen_range(8..=24);
    let net = Ipv4Net::new(Ipv4Addr::from(rng.gen::<u32>()), len)
        .unwrap()
        .trunc();
    Rc::new(RouteEntry {
        net,
        nexthop: Ipv4Addr::new(192, 0, 2, rng.gen_range(1..=254)),
        metric: rng.gen_range(0..100),
    })
}

fn main() {
    env_logger::init();

    let mut stage = PolicyStage::new();
    let mut rng = thread_rng();
    let mut withdrawn = 0;

    for _ in 0..10_000 {
        let route = random_route(&mut rng);
        if rng.gen_bool(0.8) {
            match stage.add_route(route) {
                Ok(pass) => debug!("add: passed = {}", pass),
                Err(e) => debug!("{}", e),
            }
        } else if let Ok(route) = stage.delete_route(&route.net) {
            debug!("withdraw {} via {}", route.net, route.nexthop);
            withdrawn += 1;
        }
    }
    info!(
        "{} routes mirrored, {} withdrawn, {} accepted",
        stage.mirror.route_count(),
        withdrawn,
        stage.accepted
    );

    stage.configure(vec![Box::new(|r: &RouteEntry| r.metric < 50)]);
    stage.configure(vec![
        Box::new(|r: &RouteEntry| r.metric < 50),
        Box::new(|r: &RouteEntry| r.net.prefix_len() <= 16),
    ]);

    // the policy can also be scoped by covering aggregate
    let scope: Ipv4Net = "10.0.0.0/8".parse().unwrap();
    let in_scope = stage.mirror.subtree_scan(&scope).count();
    info!("{} routes within {}", in_scope, scope);

    let addr = Ipv4Addr::new(10, 1, 2, 3);
    match stage.mirror.longest_match(addr) {
        Some((net, route)) => {
            let (lo, hi) = stage.mirror.find_bounds(addr);
            info!(
                "{} resolves to {} via {} for all of {}..{}",
                addr, net, route.nexthop, lo, hi
            );
        }
        None => info!("no route for {}", addr),
    }
}
