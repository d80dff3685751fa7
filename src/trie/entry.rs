//! The entry pattern: inspect, insert, replace or erase a single route with one lookup.

use super::node::Kind;
use super::restructure::Position;
use super::RouteTrie;
use crate::Prefix;

/// A mutable view into a single route of the trie, which may either be vacant or occupied.
pub enum Entry<'a, P, T> {
    /// No route with this prefix is stored. There may be an interior node with this prefix.
    Vacant(VacantEntry<'a, P, T>),
    /// The route is present in the trie.
    Occupied(OccupiedEntry<'a, P, T>),
}

/// A mutable view into a missing route. It remembers where the route would be attached.
pub struct VacantEntry<'a, P, T> {
    pub(super) trie: &'a mut RouteTrie<P, T>,
    pub(super) prefix: P,
    pub(super) position: Position,
}

/// A mutable view into a stored route. Through it, the payload can be read, replaced, or the route
/// can be erased without a second lookup.
pub struct OccupiedEntry<'a, P, T> {
    pub(super) trie: &'a mut RouteTrie<P, T>,
    pub(super) idx: usize,
}

fn payload<T>(kind: &Kind<T>) -> &T {
    match kind {
        Kind::Route(v) => v,
        Kind::Interior => unreachable!("occupied entry points to an interior node"),
    }
}

fn payload_mut<T>(kind: &mut Kind<T>) -> &mut T {
    match kind {
        Kind::Route(v) => v,
        Kind::Interior => unreachable!("occupied entry points to an interior node"),
    }
}

impl<P, T> Entry<'_, P, T> {
    /// Get the payload if the route exists.
    ///
    /// ```
    /// # use route_trie::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv4Net, _> = RouteTrie::new();
    /// rt.insert("192.168.1.0/24".parse()?, 1)?;
    /// rt.insert("192.168.2.0/24".parse()?, 2)?;
    /// assert_eq!(rt.entry("192.168.1.0/24".parse()?).get(), Some(&1));
    /// // this is only an interior node.
    /// assert_eq!(rt.entry("192.168.0.0/22".parse()?).get(), None);
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    pub fn get(&self) -> Option<&T> {
        match self {
            Entry::Vacant(_) => None,
            Entry::Occupied(e) => Some(e.get()),
        }
    }

    /// Get a mutable reference to the payload if the route exists.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Entry::Vacant(_) => None,
            Entry::Occupied(e) => Some(e.get_mut()),
        }
    }

    /// The prefix of this entry.
    pub fn key(&self) -> &P {
        match self {
            Entry::Vacant(e) => &e.prefix,
            Entry::Occupied(e) => e.key(),
        }
    }
}

impl<'a, P, T> Entry<'a, P, T>
where
    P: Prefix,
{
    /// Store `v` as the payload of this route, and return the payload stored before (if any).
    ///
    /// ```
    /// # use route_trie::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv4Net, _> = RouteTrie::new();
    /// rt.insert("192.168.1.0/24".parse()?, 1)?;
    ///
    /// assert_eq!(rt.entry("192.168.1.0/24".parse()?).insert(10), Some(1));
    /// assert_eq!(rt.entry("192.168.2.0/24".parse()?).insert(20), None);
    ///
    /// assert_eq!(rt.exact(&"192.168.1.0/24".parse()?), Some(&10));
    /// assert_eq!(rt.exact(&"192.168.2.0/24".parse()?), Some(&20));
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    #[inline(always)]
    pub fn insert(self, v: T) -> Option<T> {
        match self {
            Entry::Vacant(e) => {
                e.insert(v);
                None
            }
            Entry::Occupied(e) => Some(e.insert(v)),
        }
    }

    /// Ensures a payload is present by inserting `default` if the route is missing, and returns a
    /// mutable reference to the payload.
    #[inline(always)]
    pub fn or_insert(self, default: T) -> &'a mut T {
        match self {
            Entry::Vacant(e) => e.insert(default),
            Entry::Occupied(e) => e.into_mut(),
        }
    }

    /// Ensures a payload is present by inserting the result of `default` if the route is
    /// missing, and returns a mutable reference to the payload.
    ///
    /// ```
    /// # use route_trie::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv4Net, _> = RouteTrie::new();
    /// rt.insert("192.168.1.0/24".parse()?, 1)?;
    ///
    /// assert_eq!(rt.entry("192.168.1.0/24".parse()?).or_insert_with(|| 10), &1);
    /// assert_eq!(rt.entry("192.168.2.0/24".parse()?).or_insert_with(|| 20), &20);
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    #[inline(always)]
    pub fn or_insert_with<F: FnOnce() -> T>(self, default: F) -> &'a mut T {
        match self {
            Entry::Vacant(e) => e.insert(default()),
            Entry::Occupied(e) => e.into_mut(),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any potential inserts.
    #[inline(always)]
    pub fn and_modify<F: FnOnce(&mut T)>(self, f: F) -> Self {
        match self {
            Entry::Vacant(e) => Entry::Vacant(e),
            Entry::Occupied(mut e) => {
                f(e.get_mut());
                Entry::Occupied(e)
            }
        }
    }
}

impl<'a, P, T> Entry<'a, P, T>
where
    P: Prefix,
    T: Default,
{
    /// Ensures a payload is present by inserting the default value if the route is missing, and
    /// returns a mutable reference to the payload.
    #[allow(clippy::unwrap_or_default)]
    #[inline(always)]
    pub fn or_default(self) -> &'a mut T {
        self.or_insert_with(Default::default)
    }
}

impl<'a, P, T> OccupiedEntry<'a, P, T> {
    /// The prefix of the stored route.
    pub fn key(&self) -> &P {
        &self.trie.table[self.idx].prefix
    }

    /// Gets a reference to the payload.
    pub fn get(&self) -> &T {
        payload(&self.trie.table[self.idx].kind)
    }

    /// Gets a mutable reference to the payload.
    ///
    /// ```
    /// # use route_trie::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv4Net, _> = RouteTrie::new();
    /// rt.insert("192.168.1.0/24".parse()?, 1)?;
    /// match rt.entry("192.168.1.0/24".parse()?) {
    ///     Entry::Occupied(mut e) => *e.get_mut() += 1,
    ///     Entry::Vacant(_) => unreachable!(),
    /// }
    /// assert_eq!(rt.exact(&"192.168.1.0/24".parse()?), Some(&2));
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    pub fn get_mut(&mut self) -> &mut T {
        payload_mut(&mut self.trie.table[self.idx].kind)
    }

    /// Converts the entry into a mutable reference to the payload, bound to the lifetime of the
    /// trie.
    pub fn into_mut(self) -> &'a mut T {
        payload_mut(&mut self.trie.table[self.idx].kind)
    }

    /// Replace the payload, returning the old one.
    pub fn insert(mut self, value: T) -> T {
        std::mem::replace(self.get_mut(), value)
    }
}

impl<P: Prefix, T> OccupiedEntry<'_, P, T> {
    /// Erase the route and return its payload. The tree is restructured just like with
    /// [`RouteTrie::erase`].
    ///
    /// ```
    /// # use route_trie::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv4Net, i32> = RouteTrie::new();
    /// rt.insert("192.168.1.0/24".parse()?, 1)?;
    /// match rt.entry("192.168.1.0/24".parse()?) {
    ///     Entry::Occupied(e) => assert_eq!(e.remove(), 1),
    ///     Entry::Vacant(_) => unreachable!(),
    /// }
    /// assert!(rt.is_empty());
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    pub fn remove(self) -> T {
        match self.trie.remove_route(self.idx) {
            Some(value) => value,
            None => unreachable!("occupied entry points to an interior node"),
        }
    }
}

impl<P, T> VacantEntry<'_, P, T> {
    /// The prefix of the missing route.
    pub fn key(&self) -> &P {
        &self.prefix
    }
}

impl<'a, P: Prefix, T> VacantEntry<'a, P, T> {
    /// Insert the route with the given payload and return a mutable reference to it.
    ///
    /// ```
    /// # use route_trie::*;
    /// # #[cfg(feature = "ipnet")]
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut rt: RouteTrie<ipnet::Ipv4Net, i32> = RouteTrie::new();
    /// match rt.entry("192.168.1.0/24".parse()?) {
    ///     Entry::Vacant(e) => assert_eq!(e.insert(10), &10),
    ///     Entry::Occupied(_) => unreachable!(),
    /// }
    /// assert_eq!(rt.exact(&"192.168.1.0/24".parse()?), Some(&10));
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "ipnet"))]
    /// # fn main() {}
    /// ```
    pub fn insert(self, value: T) -> &'a mut T {
        let VacantEntry {
            trie,
            prefix,
            position,
        } = self;
        let idx = trie.insert_at(position, prefix, value);
        payload_mut(&mut trie.table[idx].kind)
    }
}
