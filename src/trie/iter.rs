//! Cursors and iterators over the routes of a [`RouteTrie`].

use super::RouteTrie;
use crate::Prefix;

/// A cursor walking the routes of a [`RouteTrie`] in address order, optionally restricted to the
/// routes contained in a bounding prefix.
///
/// The cursor always rests on a route (or on the end). [`Iterator::next`] returns the current
/// route and moves on; [`Iter::key`] and [`Iter::value`] peek at it without moving. The trie cannot
/// be modified while a cursor borrows it.
///
/// Two cursors are equal if they rest on the same node of the same trie with the same bound. All
/// cursors that reached the end are equal, whatever their bound.
#[derive(Clone)]
pub struct Iter<'a, P, T> {
    trie: &'a RouteTrie<P, T>,
    /// node where the walk started. The cursor never climbs above it.
    root: Option<usize>,
    cur: Option<usize>,
    left_visited: bool,
    right_visited: bool,
    bound: Option<P>,
}

impl<'a, P: Prefix, T> Iter<'a, P, T> {
    /// Start a walk of the subtree below `start` (inclusive). The cursor moves to the first route
    /// right away.
    pub(crate) fn new(trie: &'a RouteTrie<P, T>, start: Option<usize>, bound: Option<P>) -> Self {
        let mut iter = Self {
            trie,
            root: start,
            cur: start,
            left_visited: false,
            right_visited: false,
            bound,
        };
        if !iter.on_route() {
            iter.advance();
        }
        iter
    }

    /// Returns `true` if the cursor has passed the last route.
    pub fn is_end(&self) -> bool {
        self.cur.is_none()
    }

    /// Prefix of the route the cursor rests on, or `None` at the end.
    pub fn key(&self) -> Option<&'a P> {
        let trie = self.trie;
        self.cur.map(|idx| &trie.table[idx].prefix)
    }

    /// Payload of the route the cursor rests on, or `None` at the end.
    pub fn value(&self) -> Option<&'a T> {
        let trie = self.trie;
        self.cur.and_then(|idx| trie.table[idx].kind.value())
    }

    /// Move to the next route in address order. Does nothing at the end.
    pub fn advance(&mut self) {
        loop {
            self.step();
            if self.cur.is_none() || self.on_route() {
                return;
            }
        }
    }

    /// Whether the current node is a route within the bound.
    fn on_route(&self) -> bool {
        let Some(idx) = self.cur else {
            return false;
        };
        let node = &self.trie.table[idx];
        node.kind.is_route()
            && self
                .bound
                .as_ref()
                .map_or(true, |bound| bound.contains(&node.prefix))
    }

    /// Whether the subtree below `idx` can hold routes within the bound.
    fn overlaps_bound(&self, idx: usize) -> bool {
        let prefix = &self.trie.table[idx].prefix;
        self.bound
            .as_ref()
            .map_or(true, |bound| bound.contains(prefix) || prefix.contains(bound))
    }

    /// Move to the next node in pre-order, whatever its kind.
    fn step(&mut self) {
        let trie = self.trie;
        while let Some(idx) = self.cur {
            let node = &trie.table[idx];
            if !self.left_visited {
                self.left_visited = true;
                if let Some(left) = node.left.filter(|c| self.overlaps_bound(*c)) {
                    return self.descend(left);
                }
            }
            if !self.right_visited {
                self.right_visited = true;
                if let Some(right) = node.right.filter(|c| self.overlaps_bound(*c)) {
                    return self.descend(right);
                }
            }
            if self.cur == self.root {
                self.cur = None;
                return;
            }
            // climb, marking the branch we come from as done.
            self.cur = node.parent;
            if let Some(parent) = node.parent {
                self.left_visited = true;
                self.right_visited = trie.table[parent].right == Some(idx);
            }
        }
    }

    fn descend(&mut self, child: usize) {
        self.cur = Some(child);
        self.left_visited = false;
        self.right_visited = false;
    }
}

impl<'a, P: Prefix, T> Iterator for Iter<'a, P, T> {
    type Item = (&'a P, &'a T);

    fn next(&mut self) -> Option<(&'a P, &'a T)> {
        let trie = self.trie;
        let item = trie.table[self.cur?].prefix_value();
        self.advance();
        item
    }
}

impl<'a, P: Prefix, T> PartialEq for Iter<'a, P, T> {
    fn eq(&self, other: &Self) -> bool {
        match (self.cur, other.cur) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                a == b
                    && std::ptr::eq(self.trie, other.trie)
                    && match (&self.bound, &other.bound) {
                        (None, None) => true,
                        (Some(x), Some(y)) => x.eq(y),
                        _ => false,
                    }
            }
            _ => false,
        }
    }
}

/// An iterator over the prefixes of a [`RouteTrie`] in address order.
#[derive(Clone)]
pub struct Keys<'a, P, T> {
    pub(crate) inner: Iter<'a, P, T>,
}

impl<'a, P: Prefix, T> Iterator for Keys<'a, P, T> {
    type Item = &'a P;

    fn next(&mut self) -> Option<&'a P> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over the payloads of a [`RouteTrie`], in address order of their prefixes.
#[derive(Clone)]
pub struct Values<'a, P, T> {
    pub(crate) inner: Iter<'a, P, T>,
}

impl<'a, P: Prefix, T> Iterator for Values<'a, P, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(_, v)| v)
    }
}

impl<'a, P: Prefix, T> IntoIterator for &'a RouteTrie<P, T> {
    type Item = (&'a P, &'a T);

    type IntoIter = Iter<'a, P, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<P: Prefix, T> RouteTrie<P, T> {
    /// An iterator over all routes in address order. Less specific prefixes come before the more
    /// specific ones they contain.
    ///
    /// ```
    /// # use route_trie::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv4Net, _> = RouteTrie::new();
    /// rt.insert("192.168.1.0/24".parse()?, 3)?;
    /// rt.insert("192.168.0.0/24".parse()?, 2)?;
    /// rt.insert("192.168.0.0/22".parse()?, 1)?;
    /// assert_eq!(
    ///     rt.iter().collect::<Vec<_>>(),
    ///     vec![
    ///         (&"192.168.0.0/22".parse()?, &1),
    ///         (&"192.168.0.0/24".parse()?, &2),
    ///         (&"192.168.1.0/24".parse()?, &3),
    ///     ]
    /// );
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    pub fn iter(&self) -> Iter<'_, P, T> {
        Iter::new(self, self.root, None)
    }

    /// A cursor on the first route of the whole trie. Same as [`RouteTrie::iter`].
    pub fn begin(&self) -> Iter<'_, P, T> {
        self.iter()
    }

    /// A cursor past the last route. It equals every cursor that reached the end.
    ///
    /// ```
    /// # use route_trie::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv4Net, _> = RouteTrie::new();
    /// assert!(rt.begin() == rt.end());
    /// rt.insert("10.0.0.0/8".parse()?, 1)?;
    /// let mut cursor = rt.begin();
    /// assert!(cursor != rt.end());
    /// cursor.advance();
    /// assert!(cursor == rt.end());
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    pub fn end(&self) -> Iter<'_, P, T> {
        Iter::new(self, None, None)
    }

    /// An iterator over all prefixes in address order.
    pub fn keys(&self) -> Keys<'_, P, T> {
        Keys { inner: self.iter() }
    }

    /// An iterator over all payloads, in address order of their prefixes.
    pub fn values(&self) -> Values<'_, P, T> {
        Values { inner: self.iter() }
    }
}
