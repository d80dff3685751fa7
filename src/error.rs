//! Error types returned by the [`RouteTrie`](crate::RouteTrie).

use std::fmt;

/// Possible errors returned by the mutating methods of a [`RouteTrie`](crate::RouteTrie). Both
/// are detected before the tree is touched, so a failed call leaves the trie unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrieError<P> {
    /// A route with exactly this prefix is already stored. Use
    /// [`RouteTrie::entry`](crate::RouteTrie::entry) to replace its payload.
    DuplicateKey(P),
    /// No route with exactly this prefix is stored.
    NotFound(P),
}

impl<P: fmt::Debug> std::error::Error for TrieError<P> {}

impl<P: fmt::Debug> fmt::Display for TrieError<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrieError::DuplicateKey(p) => {
                write!(f, "Error: A route for {:?} is already present.", p)
            }
            TrieError::NotFound(p) => {
                write!(f, "Error: No route for {:?} is present.", p)
            }
        }
    }
}

/// A broken structural invariant, as reported by
/// [`RouteTrie::validate`](crate::RouteTrie::validate). Seeing any of these means the trie is
/// corrupt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation<P> {
    /// The parent link of a node does not point back to the node holding it as a child (or the
    /// root has a parent).
    BadParent(P),
    /// A child is not strictly more specific than its parent.
    NotContained {
        /// prefix of the parent
        parent: P,
        /// prefix of the offending child
        child: P,
    },
    /// An interior node does not join two children.
    UselessInterior(P),
    /// Two siblings overlap, or are stored in the wrong order.
    Unordered {
        /// prefix in the left slot
        left: P,
        /// prefix in the right slot
        right: P,
    },
    /// The route count does not match the number of route nodes.
    CountMismatch {
        /// the stored route count
        expected: usize,
        /// the number of route nodes reachable from the root
        found: usize,
    },
}

impl<P: fmt::Debug> std::error::Error for Violation<P> {}

impl<P: fmt::Debug> fmt::Display for Violation<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::BadParent(p) => write!(f, "FATAL: Broken parent link at {:?}.", p),
            Violation::NotContained { parent, child } => write!(
                f,
                "FATAL: Child {:?} is not strictly contained in its parent {:?}.",
                child, parent
            ),
            Violation::UselessInterior(p) => write!(
                f,
                "FATAL: Interior node {:?} does not have two children.",
                p
            ),
            Violation::Unordered { left, right } => write!(
                f,
                "FATAL: Siblings {:?} and {:?} overlap or are out of order.",
                left, right
            ),
            Violation::CountMismatch { expected, found } => write!(
                f,
                "FATAL: The trie counts {} routes, but holds {}.",
                expected, found
            ),
        }
    }
}
