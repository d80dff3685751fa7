//! Address ranges around a lookup that resolve to the same route, and the nearest covered
//! addresses on either side of an address.

use num_traits::{Bounded, One, Zero};

use super::RouteTrie;
use crate::Prefix;

impl<P: Prefix, T> RouteTrie<P, T> {
    /// Find the largest range `[lo, hi]` of addresses around `addr` that resolve to the same
    /// longest match as `addr` itself (or to no route at all, if `addr` has none).
    ///
    /// The search starts at the longest match of `addr`. Without a match, it starts at a virtual
    /// default route that covers the whole address space and holds the root as its only child.
    /// From there, the range is narrowed by the routes found in the children:
    ///
    /// - `addr` lies before a child: the range ends right before the first route of that child.
    /// - `addr` lies within a child (which must be an interior node): the range stops short of the
    ///   sibling of that child, and the search continues below the child.
    /// - `addr` lies between two children: the range spans the gap between them.
    /// - `addr` lies after the last child: the range starts right after its last route.
    ///
    /// ```
    /// # use route_trie::*;
    /// # use std::net::Ipv4Addr;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv4Net, _> = RouteTrie::new();
    /// rt.insert("1.2.0.0/16".parse()?, 1)?;
    /// rt.insert("1.2.128.0/24".parse()?, 2)?;
    /// rt.insert("1.2.192.0/24".parse()?, 3)?;
    /// assert_eq!(
    ///     rt.find_bounds("1.2.190.1".parse()?),
    ///     ("1.2.129.0".parse::<Ipv4Addr>()?, "1.2.191.255".parse::<Ipv4Addr>()?)
    /// );
    /// assert_eq!(
    ///     rt.find_bounds("1.2.120.1".parse()?),
    ///     ("1.2.0.0".parse::<Ipv4Addr>()?, "1.2.127.255".parse::<Ipv4Addr>()?)
    /// );
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    pub fn find_bounds(&self, addr: P::Addr) -> (P::Addr, P::Addr) {
        let a: P::R = addr.into();
        let mut cur = self.longest_match_idx(&P::host(addr));
        let (mut lo, mut hi) = match cur {
            Some(idx) => (self.table[idx].prefix.mask(), self.table[idx].prefix.top()),
            None => (<P::R as Zero>::zero(), <P::R as Bounded>::max_value()),
        };
        loop {
            let (first, second) = match cur {
                Some(idx) => (self.table[idx].left, self.table[idx].right),
                None => (self.root, None),
            };
            let Some(x) = first else {
                break;
            };
            let x_p = &self.table[x].prefix;
            if a < x_p.mask() {
                hi = self.lowest_addr(x) - <P::R as One>::one();
                break;
            } else if a <= x_p.top() {
                if let Some(y) = second {
                    hi = self.lowest_addr(y) - <P::R as One>::one();
                }
                cur = Some(x);
                continue;
            }
            let Some(y) = second else {
                lo = self.highest_addr(x) + <P::R as One>::one();
                break;
            };
            let y_p = &self.table[y].prefix;
            if a < y_p.mask() {
                lo = self.highest_addr(x) + <P::R as One>::one();
                hi = self.lowest_addr(y) - <P::R as One>::one();
                break;
            } else if a <= y_p.top() {
                lo = self.highest_addr(x) + <P::R as One>::one();
                cur = Some(y);
            } else {
                lo = self.highest_addr(y) + <P::R as One>::one();
                break;
            }
        }
        (lo.into(), hi.into())
    }

    /// The lowest address at or after `addr` that is covered by some route. This is `addr`
    /// itself if a route covers it, and otherwise the first address of the lowest route above
    /// `addr`. Returns `None` if no route reaches `addr` or beyond.
    ///
    /// ```
    /// # use route_trie::*;
    /// # use std::net::Ipv4Addr;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv4Net, _> = RouteTrie::new();
    /// rt.insert("10.0.0.0/8".parse()?, 1)?;
    /// rt.insert("20.0.0.0/8".parse()?, 2)?;
    /// assert_eq!(rt.lower_bound("5.0.0.0".parse()?), Some("10.0.0.0".parse::<Ipv4Addr>()?));
    /// assert_eq!(rt.lower_bound("10.1.2.3".parse()?), Some("10.1.2.3".parse::<Ipv4Addr>()?));
    /// assert_eq!(rt.lower_bound("15.0.0.0".parse()?), Some("20.0.0.0".parse::<Ipv4Addr>()?));
    /// assert_eq!(rt.lower_bound("30.0.0.0".parse()?), None);
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    pub fn lower_bound(&self, addr: P::Addr) -> Option<P::Addr> {
        let root = self.root?;
        self.covered_from(root, addr.into()).map(Into::into)
    }

    /// The highest address at or before `addr` that is covered by some route. This is `addr`
    /// itself if a route covers it, and otherwise the last address of the highest route below
    /// `addr`. Returns `None` if no route reaches `addr` or below.
    ///
    /// ```
    /// # use route_trie::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv6Net, _> = RouteTrie::new();
    /// rt.insert("fe80::2c0:4fff:fe68:8c58/96".parse()?, 1)?;
    /// assert_eq!(
    ///     rt.upper_bound("fe80::2c0:5000:0:1".parse()?),
    ///     Some("fe80::2c0:4fff:ffff:ffff".parse::<std::net::Ipv6Addr>()?)
    /// );
    /// assert_eq!(rt.upper_bound("fe80::1".parse()?), None);
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    pub fn upper_bound(&self, addr: P::Addr) -> Option<P::Addr> {
        let root = self.root?;
        self.covered_until(root, addr.into()).map(Into::into)
    }

    /// Lowest address `>= a` covered by a route in the subtree of `idx`. A route covers its whole
    /// subtree, so the search stops at the first route it meets. Interior nodes try their left
    /// child first and fall back to the right one.
    fn covered_from(&self, idx: usize, a: P::R) -> Option<P::R> {
        let node = &self.table[idx];
        if node.prefix.top() < a {
            return None;
        }
        if node.kind.is_route() {
            return Some(node.prefix.mask().max(a));
        }
        node.children().find_map(|c| self.covered_from(c, a))
    }

    /// Highest address `<= a` covered by a route in the subtree of `idx`, trying the right child
    /// first.
    fn covered_until(&self, idx: usize, a: P::R) -> Option<P::R> {
        let node = &self.table[idx];
        if node.prefix.mask() > a {
            return None;
        }
        if node.kind.is_route() {
            return Some(node.prefix.top().min(a));
        }
        node.right
            .into_iter()
            .chain(node.left)
            .find_map(|c| self.covered_until(c, a))
    }

    /// First address of the first route below `idx`, walking left first.
    fn lowest_addr(&self, mut idx: usize) -> P::R {
        while !self.table[idx].kind.is_route() {
            match self.table[idx].left.or(self.table[idx].right) {
                Some(child) => idx = child,
                None => break,
            }
        }
        self.table[idx].prefix.mask()
    }

    /// Last address of the last route below `idx`, walking right first.
    fn highest_addr(&self, mut idx: usize) -> P::R {
        while !self.table[idx].kind.is_route() {
            match self.table[idx].right.or(self.table[idx].left) {
                Some(child) => idx = child,
                None => break,
            }
        }
        self.table[idx].prefix.top()
    }
}
