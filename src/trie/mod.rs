//! Implementation of the route trie.

use crate::{Prefix, TrieError, Violation};

mod bounds;
mod entry;
mod iter;
pub(crate) mod node;
mod restructure;

pub use entry::*;
pub use iter::*;

use node::{Kind, Table};
use restructure::Position;

/// Route trie keyed by CIDR prefixes.
///
/// Every stored route lives in a *route node*. Where two routes do not nest in one another, the
/// trie joins them below an *interior node* carrying their longest common prefix. Children always
/// lie strictly within their parent, and siblings are kept in address order, so that iteration
/// yields routes sorted by address (and by prefix length for equal addresses).
#[derive(Clone)]
pub struct RouteTrie<P, T> {
    pub(crate) table: Table<P, T>,
    pub(crate) root: Option<usize>,
    pub(crate) count: usize,
}

impl<P, T> Default for RouteTrie<P, T> {
    fn default() -> Self {
        Self {
            table: Table::default(),
            root: None,
            count: 0,
        }
    }
}

impl<P, T> RouteTrie<P, T>
where
    P: Prefix,
{
    /// Create an empty route trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of routes stored in the trie.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns the number of routes stored in the trie. Interior nodes are not counted.
    pub fn route_count(&self) -> usize {
        self.count
    }

    /// Returns `true` if the trie holds no routes.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Insert a new route. Fails with [`TrieError::DuplicateKey`] if a route with the same prefix
    /// is already present, in which case the trie is left untouched. Bits of `prefix` beyond its
    /// length are cleared before it is stored.
    ///
    /// ```
    /// # use route_trie::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv4Net, _> = RouteTrie::new();
    /// rt.insert("10.0.0.0/8".parse()?, 1)?;
    /// rt.insert("10.1.0.0/16".parse()?, 2)?;
    /// assert_eq!(
    ///     rt.insert("10.1.0.0/16".parse()?, 3),
    ///     Err(TrieError::DuplicateKey("10.1.0.0/16".parse()?))
    /// );
    /// assert_eq!(rt.exact(&"10.1.0.0/16".parse()?), Some(&2));
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    pub fn insert(&mut self, prefix: P, value: T) -> Result<(), TrieError<P>> {
        match self.entry(prefix) {
            Entry::Vacant(e) => {
                e.insert(value);
                Ok(())
            }
            Entry::Occupied(e) => Err(TrieError::DuplicateKey(e.key().clone())),
        }
    }

    /// Gets the entry of the given prefix for in-place manipulation. Through an occupied entry,
    /// the payload can be replaced or the route can be erased.
    ///
    /// ```
    /// # use route_trie::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv4Net, _> = RouteTrie::new();
    /// rt.insert("192.168.0.0/23".parse()?, vec![1])?;
    /// rt.entry("192.168.0.0/23".parse()?).or_default().push(2);
    /// rt.entry("192.168.0.0/24".parse()?).or_default().push(3);
    /// assert_eq!(rt.exact(&"192.168.0.0/23".parse()?), Some(&vec![1, 2]));
    /// assert_eq!(rt.exact(&"192.168.0.0/24".parse()?), Some(&vec![3]));
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    pub fn entry(&mut self, prefix: P) -> Entry<'_, P, T> {
        let prefix = P::from_repr_len(prefix.mask(), prefix.prefix_len());
        match self.locate(&prefix) {
            Position::Reached(idx) if self.table[idx].kind.is_route() => {
                Entry::Occupied(OccupiedEntry { trie: self, idx })
            }
            position => Entry::Vacant(VacantEntry {
                trie: self,
                prefix,
                position,
            }),
        }
    }

    /// Erase the route with exactly this prefix and return its payload. Fails with
    /// [`TrieError::NotFound`] if there is no such route.
    ///
    /// ```
    /// # use route_trie::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv4Net, _> = RouteTrie::new();
    /// let prefix = "192.168.1.0/24".parse()?;
    /// rt.insert(prefix, 1)?;
    /// assert_eq!(rt.erase(&prefix), Ok(1));
    /// assert_eq!(rt.erase(&prefix), Err(TrieError::NotFound(prefix)));
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    pub fn erase(&mut self, prefix: &P) -> Result<T, TrieError<P>> {
        if let Position::Reached(idx) = self.locate(prefix) {
            if let Some(value) = self.remove_route(idx) {
                return Ok(value);
            }
        }
        Err(TrieError::NotFound(prefix.clone()))
    }

    /// Get the payload of the route with exactly this prefix.
    ///
    /// ```
    /// # use route_trie::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv4Net, _> = RouteTrie::new();
    /// rt.insert("192.168.1.0/24".parse()?, 1)?;
    /// assert_eq!(rt.exact(&"192.168.1.0/24".parse()?), Some(&1));
    /// assert_eq!(rt.exact(&"192.168.2.0/24".parse()?), None);
    /// assert_eq!(rt.exact(&"192.168.0.0/23".parse()?), None);
    /// assert_eq!(rt.exact(&"192.168.1.128/25".parse()?), None);
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    pub fn exact(&self, prefix: &P) -> Option<&T> {
        match self.locate(prefix) {
            Position::Reached(idx) => self.table[idx].kind.value(),
            _ => None,
        }
    }

    /// Get a mutable reference to the payload of the route with exactly this prefix.
    pub fn exact_mut(&mut self, prefix: &P) -> Option<&mut T> {
        match self.locate(prefix) {
            Position::Reached(idx) => self.table[idx].kind.value_mut(),
            _ => None,
        }
    }

    /// Check if a route with exactly this prefix is present.
    pub fn contains_key(&self, prefix: &P) -> bool {
        self.exact(prefix).is_some()
    }

    /// Longest-prefix match of a single address: the most specific route covering `addr`.
    ///
    /// ```
    /// # use route_trie::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv4Net, _> = RouteTrie::new();
    /// rt.insert("10.0.0.0/8".parse()?, 8)?;
    /// rt.insert("10.1.0.0/16".parse()?, 16)?;
    /// assert_eq!(rt.longest_match("10.1.5.5".parse()?), Some((&"10.1.0.0/16".parse()?, &16)));
    /// assert_eq!(rt.longest_match("10.3.0.0".parse()?), Some((&"10.0.0.0/8".parse()?, &8)));
    /// assert_eq!(rt.longest_match("11.0.0.0".parse()?), None);
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    pub fn longest_match(&self, addr: P::Addr) -> Option<(&P, &T)> {
        self.longest_match_prefix(&P::host(addr))
    }

    /// The most specific route whose prefix contains `prefix` (or is equal to it).
    pub fn longest_match_prefix(&self, prefix: &P) -> Option<(&P, &T)> {
        self.longest_match_idx(prefix)
            .and_then(|idx| self.table[idx].prefix_value())
    }

    pub(crate) fn longest_match_idx(&self, prefix: &P) -> Option<usize> {
        let mut cur = self
            .root
            .filter(|root| self.table[*root].prefix.contains(prefix));
        let mut best = None;
        while let Some(idx) = cur {
            if self.table[idx].kind.is_route() {
                best = Some(idx);
            }
            cur = self.table.child_containing(idx, prefix);
        }
        best
    }

    /// The most specific route that strictly contains `prefix`, i.e., the route that would be the
    /// closest enclosing route of `prefix` if it were inserted now. Whether `prefix` itself is
    /// stored does not matter.
    ///
    /// ```
    /// # use route_trie::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv4Net, _> = RouteTrie::new();
    /// rt.insert("10.1.0.0/16".parse()?, 1)?;
    /// rt.insert("10.1.2.0/24".parse()?, 2)?;
    /// assert_eq!(rt.less_specific(&"10.1.2.0/24".parse()?), Some((&"10.1.0.0/16".parse()?, &1)));
    /// assert_eq!(rt.less_specific(&"10.1.0.0/16".parse()?), None);
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    pub fn less_specific(&self, prefix: &P) -> Option<(&P, &T)> {
        let mut cur = self
            .root
            .filter(|root| self.table[*root].prefix.strictly_contains(prefix));
        let mut best = None;
        while let Some(idx) = cur {
            best = self.table[idx].prefix_value().or(best);
            cur = self.table[idx]
                .children()
                .find(|c| self.table[*c].prefix.strictly_contains(prefix));
        }
        best
    }

    /// Iterate over all routes contained in `prefix` (including `prefix` itself), in address
    /// order.
    ///
    /// ```
    /// # use route_trie::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv4Net, _> = RouteTrie::new();
    /// rt.insert("10.2.0.0/16".parse()?, 2)?;
    /// rt.insert("10.1.0.0/16".parse()?, 1)?;
    /// rt.insert("11.0.0.0/8".parse()?, 3)?;
    /// assert_eq!(
    ///     rt.subtree_scan(&"10.0.0.0/8".parse()?).collect::<Vec<_>>(),
    ///     vec![(&"10.1.0.0/16".parse()?, &1), (&"10.2.0.0/16".parse()?, &2)]
    /// );
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    pub fn subtree_scan(&self, prefix: &P) -> Iter<'_, P, T> {
        let start = match self.root {
            Some(root) if prefix.contains(&self.table[root].prefix) => Some(root),
            Some(mut idx) if self.table[idx].prefix.contains(prefix) => {
                while let Some(child) = self.table.child_containing(idx, prefix) {
                    idx = child;
                }
                Some(idx)
            }
            _ => None,
        };
        Iter::new(self, start, Some(prefix.clone()))
    }

    /// Erase all routes.
    pub fn clear(&mut self) {
        self.table.clear();
        self.root = None;
        self.count = 0;
    }

    /// Keep only the routes for which `f` returns `true`.
    ///
    /// ```
    /// # use route_trie::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv4Net, _> = RouteTrie::new();
    /// rt.insert("192.168.0.0/24".parse()?, 1)?;
    /// rt.insert("192.168.1.0/24".parse()?, 2)?;
    /// rt.insert("192.168.2.0/24".parse()?, 3)?;
    /// rt.insert("192.168.2.0/25".parse()?, 4)?;
    /// rt.retain(|_, t| *t % 2 == 0);
    /// assert_eq!(rt.exact(&"192.168.0.0/24".parse()?), None);
    /// assert_eq!(rt.exact(&"192.168.1.0/24".parse()?), Some(&2));
    /// assert_eq!(rt.exact(&"192.168.2.0/24".parse()?), None);
    /// assert_eq!(rt.exact(&"192.168.2.0/25".parse()?), Some(&4));
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&P, &T) -> bool,
    {
        let doomed: Vec<P> = self
            .iter()
            .filter(|(p, t)| !f(p, t))
            .map(|(p, _)| p.clone())
            .collect();
        for prefix in doomed {
            if let Position::Reached(idx) = self.locate(&prefix) {
                self.remove_route(idx);
            }
        }
    }

    /// Walk the whole tree and check its structural invariants: parent links match child links,
    /// every child lies strictly within its parent, siblings are disjoint and ordered, interior
    /// nodes have two children, and the route count is accurate.
    ///
    /// This is a full traversal. It is meant for tests and debugging; enable the `validate`
    /// feature to run it after every mutation.
    pub fn validate(&self) -> Result<(), Violation<P>> {
        let mut routes = 0;
        let mut stack = Vec::new();
        if let Some(root) = self.root {
            if self.table[root].parent.is_some() {
                return Err(Violation::BadParent(self.table[root].prefix.clone()));
            }
            stack.push(root);
        }
        while let Some(idx) = stack.pop() {
            let node = &self.table[idx];
            match node.kind {
                Kind::Route(_) => routes += 1,
                Kind::Interior if node.num_children() < 2 => {
                    return Err(Violation::UselessInterior(node.prefix.clone()))
                }
                Kind::Interior => {}
            }
            for child in node.children() {
                let child_node = &self.table[child];
                if child_node.parent != Some(idx) {
                    return Err(Violation::BadParent(child_node.prefix.clone()));
                }
                if !node.prefix.strictly_contains(&child_node.prefix) {
                    return Err(Violation::NotContained {
                        parent: node.prefix.clone(),
                        child: child_node.prefix.clone(),
                    });
                }
                stack.push(child);
            }
            if let (Some(left), Some(right)) = (node.left, node.right) {
                let (left, right) = (&self.table[left].prefix, &self.table[right].prefix);
                if left.top() >= right.mask() {
                    return Err(Violation::Unordered {
                        left: left.clone(),
                        right: right.clone(),
                    });
                }
            }
        }
        if routes != self.count {
            return Err(Violation::CountMismatch {
                expected: self.count,
                found: routes,
            });
        }
        Ok(())
    }

    #[inline(always)]
    pub(crate) fn debug_validate(&self) {
        #[cfg(feature = "validate")]
        if let Err(e) = self.validate() {
            panic!("{}\n{:?}", e, self.root.map(|r| &self.table[r].prefix));
        }
    }
}

impl<P, T> PartialEq for RouteTrie<P, T>
where
    P: Prefix + PartialEq,
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<P, T> Eq for RouteTrie<P, T>
where
    P: Prefix + Eq,
    T: Eq,
{
}

impl<P: Prefix, T> FromIterator<(P, T)> for RouteTrie<P, T> {
    fn from_iter<I: IntoIterator<Item = (P, T)>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}

impl<P: Prefix, T> Extend<(P, T)> for RouteTrie<P, T> {
    /// Insert all routes of `iter`. A route whose prefix is already present replaces the stored
    /// payload.
    fn extend<I: IntoIterator<Item = (P, T)>>(&mut self, iter: I) {
        for (prefix, value) in iter {
            self.entry(prefix).insert(value);
        }
    }
}
