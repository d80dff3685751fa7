//! This crate provides a route trie: a binary tree of IP prefixes that stays compact no matter in
//! which order prefixes of different specificity are inserted or erased. It supports both IPv4
//! and IPv6 (from either [ipnet](https://docs.rs/ipnet/2.10.0) or
//! [ipnetwork](https://crates.io/crates/ipnetwork)), and any tuple `(R, u8)`, where `R` is an
//! unsigned primitive integer (`u8`, `u16`, `u32`, `u64`, `u128`, or `usize`).
//!
//! The trie is meant to mirror a routing table next to the authoritative one, for instance in a
//! policy filter that must re-evaluate all routes it has seen whenever the policy changes. Each
//! route carries an arbitrary payload (typically a reference-counted handle to the route entry).
//!
//! # Description of the Tree
//!
//! The tree contains two kinds of nodes:
//!
//! - *Route nodes* carry a stored prefix and its payload.
//! - *Interior nodes* carry no payload. They exist only to join two disjoint subtrees below their
//!   longest common prefix.
//!
//! Each node has at most two children. Every child lies strictly within its parent, and two
//! children of the same node never overlap. The left child covers lower addresses than the right
//! one (a single child always sits in the left slot). An interior node always has exactly two
//! children: once it loses one, it is removed and the remaining child takes its place.
//!
//! Inserting a prefix descends from the root as long as a child contains it, and then attaches the
//! new route there. If existing children fall within the new prefix, they move below it. If the
//! node already has two unrelated children, the two of the three candidates with the longest
//! common prefix are joined below a new interior node. Erasing a route undoes the same steps: the
//! node is unlinked, its children move up, and interior nodes with a single child are collapsed. A
//! route at the root that still joins two children is only demoted to an interior node.
//!
//! # Traversals
//!
//! Iteration yields routes in address order, and less specific prefixes before the more specific
//! ones they contain. The [`Iter`] is a cursor that can be restricted to a subtree
//! ([`RouteTrie::subtree_scan`]), peeked at without moving ([`Iter::key`], [`Iter::value`]), and
//! compared to [`RouteTrie::end`].
//!
//! # Operations on the tree
//!
//! The following are the computational complexities of the functions, where `d` is the depth of
//! the tree (bounded by the number of bits in an address), and `n` is the number of routes.
//!
//! | Operation                                          | Complexity |
//! |----------------------------------------------------|------------|
//! | `entry`, `insert`, `erase`                         | `O(d)`     |
//! | `exact`, `longest_match`, `less_specific`          | `O(d)`     |
//! | `find_bounds`, `lower_bound`, `upper_bound`        | `O(d)`     |
//! | `subtree_scan` (creating the cursor)               | `O(d)`     |
//! | `retain`, `validate`                               | `O(n * d)` |
//! | `clear` (calling `drop` on `T`)                    | `O(n)`     |
//! | Operations on an [`OccupiedEntry`] (except remove) | `O(1)`     |
//! | `len` and `is_empty`                               | `O(1)`     |
//!
//! # Features
//!
//! - `ipnet` (default): implement [`Prefix`] for `ipnet::Ipv4Net` and `ipnet::Ipv6Net`.
//! - `ipnetwork`: implement [`Prefix`] for `ipnetwork::Ipv4Network` and `ipnetwork::Ipv6Network`.
//! - `validate`: check the structure of the whole tree after every modification, and panic if it
//!   is broken. This is slow, and only meant for debugging.
//!
//! # Logging
//!
//! Restructuring steps are reported through the [`log`](https://docs.rs/log) facade: `trace` for
//! every attach and unlink, and `debug` whenever the set of interior nodes changes.

#![deny(missing_docs)]

mod error;
mod fmt;
mod prefix;
mod trie;


#[cfg(test)]
mod fuzzing;

pub use error::{TrieError, Violation};
pub use prefix::Prefix;
pub use trie::{Entry, Iter, Keys, OccupiedEntry, RouteTrie, VacantEntry, Values};
