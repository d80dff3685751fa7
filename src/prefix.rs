//! Description of the generic type `Prefix`.

use std::cmp::Ordering;
use std::fmt::Debug;

#[cfg(feature = "ipnet")]
use ipnet::{Ipv4Net, Ipv6Net};
#[cfg(feature = "ipnetwork")]
use ipnetwork::{Ipv4Network, Ipv6Network};
use num_traits::{CheckedShr, PrimInt, Unsigned, Zero};
#[cfg(any(feature = "ipnet", feature = "ipnetwork"))]
use std::net::{Ipv4Addr, Ipv6Addr};

/// Trait for defining prefixes of an address family.
pub trait Prefix: Sized + Clone + Debug {
    /// How can the prefix be represented. This must be one of `u8`, `u16`, `u32`, `u64`, or `u128`.
    type R: Unsigned + PrimInt + Zero + CheckedShr;

    /// A single address of the family, convertible to and from the raw representation.
    type Addr: Copy + From<Self::R> + Into<Self::R>;

    /// Get raw representation of the address, ignoring the prefix length. This function must return
    /// the representation with the mask already applied.
    fn repr(&self) -> Self::R;

    /// Prefix length
    fn prefix_len(&self) -> u8;

    /// Create a new prefix from the representation and the prefix pength.
    fn from_repr_len(repr: Self::R, len: u8) -> Self;

    /// mask `self.repr()` using `self.len()`. If you can guarantee that `repr` is already masked,
    /// them simply re-implement this function for your type.
    fn mask(&self) -> Self::R {
        self.repr() & mask_from_prefix_len(self.prefix_len())
    }

    /// Create a prefix that matches everything
    fn zero() -> Self {
        Self::from_repr_len(Self::R::zero(), 0)
    }

    /// Number of bits in an address of this family (32 for IPv4, 128 for IPv6).
    fn max_len() -> u8 {
        Self::R::zero().count_zeros() as u8
    }

    /// The full-length prefix covering exactly `addr`.
    fn host(addr: Self::Addr) -> Self {
        Self::from_repr_len(addr.into(), Self::max_len())
    }

    /// The highest address covered by `self`.
    fn top(&self) -> Self::R {
        self.mask() | !mask_from_prefix_len::<Self::R>(self.prefix_len())
    }

    /// The longest length `L` such that masking both `self` and `other` to `L` yields the same
    /// address. This is never longer than either of the two prefixes.
    fn common_ancestor_len(&self, other: &Self) -> u8 {
        ((self.mask() ^ other.mask()).leading_zeros() as u8)
            .min(self.prefix_len())
            .min(other.prefix_len())
    }

    /// The longest prefix containing both `self` and `other`.
    fn common_ancestor(&self, other: &Self) -> Self {
        let len = self.common_ancestor_len(other);
        Self::from_repr_len(self.mask() & mask_from_prefix_len(len), len)
    }

    /// Check if `self` contains `other` in its prefix range. This function also returns `True` if
    /// `self` is identical to `other`.
    fn contains(&self, other: &Self) -> bool {
        if self.prefix_len() > other.prefix_len() {
            return false;
        }
        other.repr() & mask_from_prefix_len(self.prefix_len()) == self.mask()
    }

    /// Check if `other` is a strictly more specific prefix within `self`.
    fn strictly_contains(&self, other: &Self) -> bool {
        self.prefix_len() < other.prefix_len() && self.contains(other)
    }

    /// Order two prefixes by their masked address, and by prefix length if the addresses are equal.
    fn order(&self, other: &Self) -> Ordering {
        self.mask()
            .cmp(&other.mask())
            .then_with(|| self.prefix_len().cmp(&other.prefix_len()))
    }

    /// Compare two prefixes together
    fn eq(&self, other: &Self) -> bool {
        self.mask() == other.mask() && self.prefix_len() == other.prefix_len()
    }
}

pub(crate) fn mask_from_prefix_len<R>(len: u8) -> R
where
    R: PrimInt + Zero,
{
    if len as u32 == R::zero().count_zeros() {
        !R::zero()
    } else if len == 0 {
        R::zero()
    } else {
        !((!R::zero()) >> len as usize)
    }
}

#[cfg(feature = "ipnet")]
impl Prefix for Ipv4Net {
    type R = u32;
    type Addr = Ipv4Addr;

    fn repr(&self) -> u32 {
        self.addr().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix_len()
    }

    fn from_repr_len(repr: u32, len: u8) -> Self {
        Ipv4Net::new(repr.into(), len).unwrap()
    }

    fn eq(&self, other: &Self) -> bool {
        self.network() == other.network() && self.prefix_len() == other.prefix_len()
    }

    fn mask(&self) -> u32 {
        self.network().into()
    }

    fn zero() -> Self {
        Default::default()
    }

    fn max_len() -> u8 {
        32
    }

    fn contains(&self, other: &Self) -> bool {
        self.contains(other)
    }
}

#[cfg(feature = "ipnet")]
impl Prefix for Ipv6Net {
    type R = u128;
    type Addr = Ipv6Addr;

    fn repr(&self) -> u128 {
        self.addr().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix_len()
    }

    fn from_repr_len(repr: u128, len: u8) -> Self {
        Ipv6Net::new(repr.into(), len).unwrap()
    }

    fn eq(&self, other: &Self) -> bool {
        self.network() == other.network() && self.prefix_len() == other.prefix_len()
    }

    fn mask(&self) -> u128 {
        self.network().into()
    }

    fn zero() -> Self {
        Default::default()
    }

    fn max_len() -> u8 {
        128
    }

    fn contains(&self, other: &Self) -> bool {
        self.contains(other)
    }
}

#[cfg(feature = "ipnetwork")]
impl Prefix for Ipv4Network {
    type R = u32;
    type Addr = Ipv4Addr;

    fn repr(&self) -> u32 {
        self.ip().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix()
    }

    fn from_repr_len(repr: u32, len: u8) -> Self {
        Ipv4Network::new(repr.into(), len).unwrap()
    }

    fn mask(&self) -> u32 {
        self.network().into()
    }
}

#[cfg(feature = "ipnetwork")]
impl Prefix for Ipv6Network {
    type R = u128;
    type Addr = Ipv6Addr;

    fn repr(&self) -> u128 {
        self.ip().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix()
    }

    fn from_repr_len(repr: u128, len: u8) -> Self {
        Ipv6Network::new(repr.into(), len).unwrap()
    }

    fn mask(&self) -> u128 {
        self.network().into()
    }
}

impl<R> Prefix for (R, u8)
where
    R: Unsigned + PrimInt + Zero + CheckedShr + Debug,
{
    type R = R;
    type Addr = R;

    fn repr(&self) -> R {
        self.0
    }

    fn prefix_len(&self) -> u8 {
        self.1
    }

    fn from_repr_len(repr: R, len: u8) -> Self {
        (repr, len)
    }
}
