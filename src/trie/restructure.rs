//! Insertion and deletion. These keep the tree shape intact when prefixes of arbitrary, unsorted
//! specificity come and go: every child lies strictly within its parent, siblings are disjoint
//! and stored in address order, and an interior node always joins exactly two children.

use log::{debug, trace};

use super::node::Kind;
use super::RouteTrie;
use crate::Prefix;

/// Where a prefix sits relative to the current tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Position {
    /// A node with exactly this prefix exists (it may be an interior node).
    Reached(usize),
    /// The node strictly contains the prefix, and none of its children contains it. A new node
    /// for the prefix is attached here.
    Attach(usize),
    /// The trie is empty, or its root does not contain the prefix.
    Above,
}

impl<P: Prefix, T> RouteTrie<P, T> {
    /// Descend from the root as long as some child contains `prefix`.
    pub(crate) fn locate(&self, prefix: &P) -> Position {
        let mut idx = match self.root {
            Some(root) if self.table[root].prefix.contains(prefix) => root,
            _ => return Position::Above,
        };
        loop {
            if self.table[idx].prefix.eq(prefix) {
                return Position::Reached(idx);
            }
            match self.table.child_containing(idx, prefix) {
                Some(child) => idx = child,
                None => return Position::Attach(idx),
            }
        }
    }

    /// Insert a route at a position previously returned by [`Self::locate`]. The position must
    /// not point to an existing route. Returns the index of the route node.
    pub(crate) fn insert_at(&mut self, position: Position, prefix: P, value: T) -> usize {
        let idx = match position {
            Position::Reached(idx) => {
                // an interior node with the same prefix is taken over in place, keeping its
                // two children.
                debug!("insert {:?}: promote interior node", prefix);
                debug_assert!(!self.table[idx].kind.is_route());
                self.table[idx].kind = Kind::Route(value);
                idx
            }
            Position::Above => self.insert_above_root(prefix, value),
            Position::Attach(at) => {
                trace!(
                    "insert {:?}: attach below {:?}",
                    prefix,
                    self.table[at].prefix
                );
                let new = self.table.new_node(prefix, Kind::Route(value), Some(at));
                self.graft(at, new);
                new
            }
        };
        self.count += 1;
        self.debug_validate();
        idx
    }

    fn insert_above_root(&mut self, prefix: P, value: T) -> usize {
        let new = self.table.new_node(prefix, Kind::Route(value), None);
        let root = match self.root {
            None => {
                trace!("insert {:?}: new root", self.table[new].prefix);
                self.root = Some(new);
                return new;
            }
            Some(root) => root,
        };
        if self.table[new]
            .prefix
            .strictly_contains(&self.table[root].prefix)
        {
            trace!(
                "insert {:?}: new root above {:?}",
                self.table[new].prefix,
                self.table[root].prefix
            );
            self.table.set_children(new, Some(root), None);
            self.root = Some(new);
        } else {
            let branch_prefix = self.table[new]
                .prefix
                .common_ancestor(&self.table[root].prefix);
            debug!(
                "insert {:?}: new interior root {:?}",
                self.table[new].prefix, branch_prefix
            );
            let branch = self.table.new_node(branch_prefix, Kind::Interior, None);
            self.table.set_children(branch, Some(root), Some(new));
            self.root = Some(branch);
        }
        new
    }

    /// Hang the subtree rooted at `new` below `at`. The prefix of `at` must strictly contain the
    /// one of `new`, and no child of `at` may contain it.
    pub(crate) fn graft(&mut self, at: usize, new: usize) {
        let children = [self.table[at].left, self.table[at].right];
        let new_p = &self.table[new].prefix;
        let (inside, outside): (Vec<usize>, Vec<usize>) = children
            .into_iter()
            .flatten()
            .partition(|c| new_p.contains(&self.table[*c].prefix));

        if !inside.is_empty() {
            // the new node is an aggregate of existing children: they move below it.
            debug_assert_eq!(self.table[new].num_children(), 0);
            trace!(
                "graft {:?}: adopt {} children of {:?}",
                self.table[new].prefix,
                inside.len(),
                self.table[at].prefix
            );
            self.table
                .set_children(new, inside.first().copied(), inside.get(1).copied());
            self.table
                .set_children(at, Some(new), outside.first().copied());
            // an interior node left with a single child has no reason to exist.
            self.collapse(at);
            return;
        }

        let (a, b) = match outside[..] {
            [] => return self.table.set_children(at, Some(new), None),
            [only] => return self.table.set_children(at, Some(new), Some(only)),
            [a, b, ..] => (a, b),
        };

        // None of the three nests in another. The pair with the longest common ancestor is joined
        // below a new interior node, the third one stays next to it.
        let ((x, y), third) = self.closest_pair(a, b, new);
        let branch_prefix = self.table[x].prefix.common_ancestor(&self.table[y].prefix);
        debug!(
            "graft {:?}: new interior {:?} below {:?}",
            self.table[new].prefix, branch_prefix, self.table[at].prefix
        );
        let branch = self.table.new_node(branch_prefix, Kind::Interior, Some(at));
        self.table.set_children(branch, Some(x), Some(y));
        self.table.set_children(at, Some(branch), Some(third));
    }

    /// Pick the pair with the longest common ancestor among the siblings `a`, `b` and the
    /// newcomer `new`. Candidates are checked in the order `(a, b)`, `(a, new)`, `(b, new)`, and
    /// only a strictly longer ancestor replaces an earlier candidate.
    fn closest_pair(&self, a: usize, b: usize, new: usize) -> ((usize, usize), usize) {
        let len = |x: usize, y: usize| {
            self.table[x]
                .prefix
                .common_ancestor_len(&self.table[y].prefix)
        };
        let mut best = ((a, b), new);
        let mut best_len = len(a, b);
        for (pair, third) in [((a, new), b), ((b, new), a)] {
            let l = len(pair.0, pair.1);
            if l > best_len {
                best = (pair, third);
                best_len = l;
            }
        }
        best
    }

    /// Remove the payload of the route node `idx` and fix up the tree around it. Returns `None`
    /// (and changes nothing) if `idx` is an interior node.
    pub(crate) fn remove_route(&mut self, idx: usize) -> Option<T> {
        let value = self.table[idx].kind.take()?;
        self.count -= 1;

        let node = &self.table[idx];
        let parent = node.parent;
        match (node.left, node.right, parent) {
            (Some(_), Some(_), None) => {
                // the root still joins its two children.
                debug!("erase {:?}: demote root to interior", node.prefix);
            }
            (Some(left), Some(right), Some(parent)) => {
                trace!(
                    "erase {:?}: splice children into {:?}",
                    node.prefix,
                    self.table[parent].prefix
                );
                self.replace_in_parent(idx, Some(left));
                self.table.free(idx);
                self.table[right].parent = None;
                self.graft(parent, right);
            }
            (child, None, _) | (None, child, _) => {
                trace!("erase {:?}: unlink", node.prefix);
                self.replace_in_parent(idx, child);
                self.table.free(idx);
                if let Some(parent) = parent {
                    self.collapse(parent);
                }
            }
        }
        self.debug_validate();
        Some(value)
    }

    /// Put `new` into the slot of `old` (below the parent of `old`, or at the root).
    fn replace_in_parent(&mut self, old: usize, new: Option<usize>) {
        let parent = self.table[old].parent;
        match parent {
            None => {
                if let Some(new) = new {
                    self.table[new].parent = None;
                }
                self.root = new;
            }
            Some(parent) => {
                let sibling = if self.table[parent].left == Some(old) {
                    self.table[parent].right
                } else {
                    self.table[parent].left
                };
                self.table.set_children(parent, new, sibling);
            }
        }
    }

    /// Remove interior nodes with fewer than two children, starting at `idx` and walking up.
    pub(crate) fn collapse(&mut self, mut idx: usize) {
        loop {
            let node = &self.table[idx];
            if node.kind.is_route() || node.num_children() == 2 {
                return;
            }
            debug!("collapse interior {:?}", node.prefix);
            let parent = node.parent;
            let child = node.left.or(node.right);
            self.replace_in_parent(idx, child);
            self.table.free(idx);
            match parent {
                Some(parent) => idx = parent,
                None => return,
            }
        }
    }
}
