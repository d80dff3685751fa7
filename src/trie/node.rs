//! Nodes of the trie and the arena that owns them.

use std::ops::{Index, IndexMut};

use crate::Prefix;

/// What a node carries: either nothing (it only joins two subtrees), or the payload of a route.
#[derive(Clone)]
pub(crate) enum Kind<T> {
    Interior,
    Route(T),
}

impl<T> Kind<T> {
    #[inline(always)]
    pub(crate) fn is_route(&self) -> bool {
        matches!(self, Kind::Route(_))
    }

    #[inline(always)]
    pub(crate) fn value(&self) -> Option<&T> {
        match self {
            Kind::Route(v) => Some(v),
            Kind::Interior => None,
        }
    }

    #[inline(always)]
    pub(crate) fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            Kind::Route(v) => Some(v),
            Kind::Interior => None,
        }
    }

    /// Turn the node into an interior node, returning the payload it carried.
    pub(crate) fn take(&mut self) -> Option<T> {
        match std::mem::replace(self, Kind::Interior) {
            Kind::Route(v) => Some(v),
            Kind::Interior => None,
        }
    }
}

/// A node of the trie. Children are stored in address order: if both slots are occupied, `left`
/// covers lower addresses than `right`. A single child always sits in `left`.
#[derive(Clone)]
pub(crate) struct Node<P, T> {
    pub(crate) prefix: P,
    pub(crate) kind: Kind<T>,
    pub(crate) parent: Option<usize>,
    pub(crate) left: Option<usize>,
    pub(crate) right: Option<usize>,
}

impl<P, T> Node<P, T> {
    /// get the tuple of prefix and value.
    #[inline(always)]
    pub(crate) fn prefix_value(&self) -> Option<(&P, &T)> {
        self.kind.value().map(|v| (&self.prefix, v))
    }

    #[inline(always)]
    pub(crate) fn children(&self) -> impl Iterator<Item = usize> {
        self.left.into_iter().chain(self.right)
    }

    #[inline(always)]
    pub(crate) fn num_children(&self) -> usize {
        self.left.is_some() as usize + self.right.is_some() as usize
    }
}

/// Arena holding all nodes of a trie. Removed nodes are recycled through a free list.
#[derive(Clone)]
pub(crate) struct Table<P, T> {
    nodes: Vec<Node<P, T>>,
    free: Vec<usize>,
}

impl<P, T> Default for Table<P, T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<P, T> Index<usize> for Table<P, T> {
    type Output = Node<P, T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.nodes[index]
    }
}

impl<P, T> IndexMut<usize> for Table<P, T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.nodes[index]
    }
}

impl<P, T> Table<P, T> {
    /// insert a new node without children into the table and return its index.
    pub(crate) fn new_node(&mut self, prefix: P, kind: Kind<T>, parent: Option<usize>) -> usize {
        let node = Node {
            prefix,
            kind,
            parent,
            left: None,
            right: None,
        };
        if let Some(idx) = self.free.pop() {
            self.nodes[idx] = node;
            idx
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    /// Release a node that is no longer linked into the tree. Its payload is dropped right away.
    pub(crate) fn free(&mut self, idx: usize) {
        let node = &mut self.nodes[idx];
        node.kind = Kind::Interior;
        node.parent = None;
        node.left = None;
        node.right = None;
        self.free.push(idx);
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
    }
}

impl<P: Prefix, T> Table<P, T> {
    /// Make `a` and `b` the children of `idx`, storing them in address order, and point their
    /// parent links at `idx`.
    pub(crate) fn set_children(&mut self, idx: usize, a: Option<usize>, b: Option<usize>) {
        let (left, right) = match (a, b) {
            (Some(a), Some(b)) if self[b].prefix.order(&self[a].prefix).is_lt() => {
                (Some(b), Some(a))
            }
            (None, b) => (b, None),
            (a, b) => (a, b),
        };
        for child in left.into_iter().chain(right) {
            self[child].parent = Some(idx);
        }
        let node = &mut self[idx];
        node.left = left;
        node.right = right;
    }

    /// The child of `idx` whose prefix contains `prefix` (or is equal to it).
    #[inline(always)]
    pub(crate) fn child_containing(&self, idx: usize, prefix: &P) -> Option<usize> {
        self[idx]
            .children()
            .find(|c| self[*c].prefix.contains(prefix))
    }
}
