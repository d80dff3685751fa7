//! Tree printout of a [`RouteTrie`]. Interior nodes show up as keys without a payload.

use std::fmt::{Debug, Formatter, Result};

use crate::RouteTrie;

impl<P: Debug, T: Debug> Debug for RouteTrie<P, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.root {
            Some(root) => DebugNode(self, root).fmt(f),
            None => f.debug_map().finish(),
        }
    }
}

struct DebugNode<'a, P, T>(&'a RouteTrie<P, T>, usize);

impl<P: Debug, T: Debug> Debug for DebugNode<'_, P, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let trie = self.0;
        let node = &trie.table[self.1];
        match (node.kind.value(), node.left, node.right) {
            (None, None, None) => node.prefix.fmt(f),
            (None, None, Some(child)) | (None, Some(child), None) => f
                .debug_map()
                .entry(&node.prefix, &Self(trie, child))
                .finish(),
            (None, Some(left), Some(right)) => f
                .debug_map()
                .entry(&node.prefix, &(Self(trie, left), Self(trie, right)))
                .finish(),
            (Some(v), None, None) => f.debug_map().entry(&node.prefix, v).finish(),
            (Some(v), None, Some(child)) | (Some(v), Some(child), None) => f
                .debug_map()
                .entry(&node.prefix, &(v, Self(trie, child)))
                .finish(),
            (Some(v), Some(left), Some(right)) => f
                .debug_map()
                .entry(&node.prefix, &(v, Self(trie, left), Self(trie, right)))
                .finish(),
        }
    }
}
