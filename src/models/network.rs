//! CIDR network types and algebra.
//!
//! [`Ipv4Network`] and [`Ipv6Network`] pair a network address with a prefix
//! length; netmask, hostmask and broadcast address are derived on demand.
//! Strict construction rejects addresses with host bits set, relaxed
//! construction masks them off silently. Network text accepts a prefix
//! length after `/`, and for IPv4 also a dotted netmask or hostmask.

use std::fmt;
use std::str::FromStr;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AddressError;
use crate::models::iter::{Ipv4Hosts, Ipv4Subnets, Ipv6Hosts, Ipv6Subnets};
use crate::models::{Ipv4Address, Ipv6Address, IPV4_MAX_PREFIXLEN, IPV6_MAX_PREFIXLEN};
use crate::uint128::Uint128;
use crate::unicode;

/// IPv4 network: address plus prefix length, host bits clear.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ipv4Network {
    address: Ipv4Address,
    prefixlen: u32,
}

/// IPv6 network: address plus prefix length, host bits clear. The address
/// keeps any zone identifier it was parsed with.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ipv6Network {
    address: Ipv6Address,
    prefixlen: u32,
}

/// Netmask as a 32-bit value for a prefix length, `prefixlen <= 32`.
pub(crate) fn netmask_u32(prefixlen: u32) -> u32 {
    let right = IPV4_MAX_PREFIXLEN - prefixlen;
    ((u64::from(u32::MAX) >> right) << right) as u32
}

/// Netmask as a 128-bit value for a prefix length, `prefixlen <= 128`.
pub(crate) fn netmask_u128(prefixlen: u32) -> Uint128 {
    if prefixlen == 0 {
        Uint128::ZERO
    } else {
        Uint128::MAX << (IPV6_MAX_PREFIXLEN - prefixlen)
    }
}

/// Prefix length of a contiguous netmask value, or the mixes error kind.
fn prefix_from_u32(mask: u32) -> Result<u32, ()> {
    if mask == 0 {
        return Ok(0);
    }
    let trailing = mask.trailing_zeros();
    let prefixlen = IPV4_MAX_PREFIXLEN - trailing;
    let leading_ones = u64::from(mask >> trailing);
    if leading_ones != (1u64 << prefixlen) - 1 {
        return Err(());
    }
    Ok(prefixlen)
}

/// Re-raise an error from parsing the address portion of a network
/// literal: the full network text replaces the portion and the part/octet
/// index is reported as 0. Network-level diagnostics never carry an inner
/// index.
fn rebrand(err: AddressError, full: &str) -> AddressError {
    let address = unicode::escape_non_ascii(full);
    match err {
        AddressError::Expected4Octets { .. } => AddressError::Expected4Octets { address },
        AddressError::EmptyOctet { .. } => AddressError::EmptyOctet { octet: 0, address },
        AddressError::LeadingZerosNotPermitted { .. } => {
            AddressError::LeadingZerosNotPermitted { octet: 0, address }
        }
        AddressError::OctetMore3Characters { .. } => {
            AddressError::OctetMore3Characters { octet: 0, address }
        }
        AddressError::OctetHasInvalidSymbol { .. } => {
            AddressError::OctetHasInvalidSymbol { octet: 0, address }
        }
        AddressError::OctetExceeded255 { .. } => {
            AddressError::OctetExceeded255 { octet: 0, address }
        }
        AddressError::Least3Parts { .. } => AddressError::Least3Parts { address },
        AddressError::Most8ColonsPermitted { .. } => {
            AddressError::Most8ColonsPermitted { address }
        }
        AddressError::PartIsMore4Chars { .. } => {
            AddressError::PartIsMore4Chars { part: 0, address }
        }
        AddressError::PartHasInvalidSymbol { .. } => {
            AddressError::PartHasInvalidSymbol { part: 0, address }
        }
        AddressError::MostOneDoubleColonPermitted { .. } => {
            AddressError::MostOneDoubleColonPermitted { address }
        }
        AddressError::LeadingColonOnlyPermittedAsPartOfDoubleColon { .. } => {
            AddressError::LeadingColonOnlyPermittedAsPartOfDoubleColon { address }
        }
        AddressError::TrailingColonOnlyPermittedAsPartOfDoubleColon { .. } => {
            AddressError::TrailingColonOnlyPermittedAsPartOfDoubleColon { address }
        }
        AddressError::ExpectedAtMost7OtherPartsWithDoubleColon { .. } => {
            AddressError::ExpectedAtMost7OtherPartsWithDoubleColon { address }
        }
        AddressError::Exactly8PartsExpectedWithoutDoubleColon { .. } => {
            AddressError::Exactly8PartsExpectedWithoutDoubleColon { address }
        }
        AddressError::ScopeIdIsTooLong { .. } => AddressError::ScopeIdIsTooLong { address },
        AddressError::InvalidScopeId { .. } => AddressError::InvalidScopeId { address },
        other => other,
    }
}

/// Split a network literal into address and mask portions, enforcing the
/// single-slash and non-empty-mask rules.
fn split_slash(text: &str) -> Result<(&str, Option<&str>), AddressError> {
    if text.matches('/').count() > 1 {
        return Err(AddressError::OnlyOneSlashPermitted {
            address: unicode::escape_non_ascii(text),
        });
    }
    match text.split_once('/') {
        Some((_, "")) => Err(AddressError::EmptyNetmask {
            address: unicode::escape_non_ascii(text),
        }),
        Some((addr, mask)) => Ok((addr, Some(mask))),
        None => Ok((text, None)),
    }
}

/// Resolve the supernet/subnets argument pair into a prefix difference.
fn resolve_prefix_args(
    prefixlen: u32,
    max_prefixlen: u32,
    prefixlen_diff: Option<u32>,
    new_prefix: Option<u32>,
    shorter: bool,
) -> Result<u32, AddressError> {
    match (prefixlen_diff, new_prefix) {
        (Some(_), Some(_)) => Err(AddressError::CannotSetPrefixlenDiffAndNewPrefix),
        (diff, None) => {
            let diff = diff.unwrap_or(1);
            let valid = if shorter {
                diff <= prefixlen
            } else {
                prefixlen.checked_add(diff).is_some_and(|p| p <= max_prefixlen)
            };
            if valid {
                Ok(diff)
            } else {
                Err(AddressError::InvalidPrefixlenDiff)
            }
        }
        (None, Some(new)) => {
            if shorter {
                if new >= prefixlen {
                    return Err(AddressError::NewPrefixMustBeShorter);
                }
                Ok(prefixlen - new)
            } else {
                if new <= prefixlen {
                    return Err(AddressError::NewPrefixMustBeLonger);
                }
                if new > max_prefixlen {
                    return Err(AddressError::InvalidPrefixlenDiff);
                }
                Ok(new - prefixlen)
            }
        }
    }
}

impl Ipv4Network {
    pub(crate) const fn new_unchecked(address: Ipv4Address, prefixlen: u32) -> Ipv4Network {
        Ipv4Network { address, prefixlen }
    }

    /// Parse a network literal, e.g. `"192.0.2.0/24"`, `"10.0.0.0/255.0.0.0"`
    /// or `"10.0.0.0/0.255.255.255"`. Without a mask the prefix is /32.
    ///
    /// With `strict` set, an address with bits outside the mask is rejected;
    /// otherwise those bits are cleared.
    pub fn parse(text: &str, strict: bool) -> Result<Ipv4Network, AddressError> {
        unicode::ascii_bytes(text)?;
        let (addr_text, mask_text) = split_slash(text)?;
        let prefixlen = match mask_text {
            Some(mask) => parse_netmask_v4(mask, text)?,
            None => IPV4_MAX_PREFIXLEN,
        };
        let address = Ipv4Address::parse(addr_text).map_err(|e| rebrand(e, text))?;
        Self::masked(address, prefixlen, strict, text)
    }

    /// Like [`Ipv4Network::parse`] but panics with the formatted diagnostic.
    pub fn parse_unchecked(text: &str, strict: bool) -> Ipv4Network {
        match Ipv4Network::parse(text, strict) {
            Ok(net) => net,
            Err(e) => panic!("{}", e),
        }
    }

    /// Build a network from an address and prefix length.
    pub fn from_address(
        address: Ipv4Address,
        prefixlen: u32,
        strict: bool,
    ) -> Result<Ipv4Network, AddressError> {
        if prefixlen > IPV4_MAX_PREFIXLEN {
            return Err(AddressError::InvalidNetmask {
                address: address.to_string(),
            });
        }
        Self::masked(address, prefixlen, strict, &address.to_string())
    }

    fn masked(
        address: Ipv4Address,
        prefixlen: u32,
        strict: bool,
        text: &str,
    ) -> Result<Ipv4Network, AddressError> {
        let mask = netmask_u32(prefixlen);
        let packed = address.to_uint();
        if packed & mask != packed {
            if strict {
                return Err(AddressError::HasHostBitsSet {
                    address: unicode::escape_non_ascii(text),
                });
            }
            return Ok(Ipv4Network {
                address: Ipv4Address::from_uint(packed & mask),
                prefixlen,
            });
        }
        Ok(Ipv4Network { address, prefixlen })
    }

    pub const fn network_address(&self) -> Ipv4Address {
        self.address
    }

    pub const fn prefixlen(&self) -> u32 {
        self.prefixlen
    }

    pub fn netmask(&self) -> Ipv4Address {
        Ipv4Address::from_uint(netmask_u32(self.prefixlen))
    }

    pub fn hostmask(&self) -> Ipv4Address {
        Ipv4Address::from_uint(!netmask_u32(self.prefixlen))
    }

    pub fn broadcast_address(&self) -> Ipv4Address {
        Ipv4Address::from_uint(self.address.to_uint() | !netmask_u32(self.prefixlen))
    }

    /// Total number of addresses in the network.
    pub fn addresses_count(&self) -> u64 {
        1u64 << (IPV4_MAX_PREFIXLEN - self.prefixlen)
    }

    /// Whether `address` lies within the network range.
    pub fn contains(&self, address: &Ipv4Address) -> bool {
        let value = address.to_uint();
        self.address.to_uint() <= value && value <= self.broadcast_address().to_uint()
    }

    /// Whether the two network ranges intersect.
    pub fn overlaps(&self, other: &Ipv4Network) -> bool {
        other.contains(&self.address)
            || other.contains(&self.broadcast_address())
            || self.contains(&other.address)
    }

    pub fn subnet_of(&self, other: &Ipv4Network) -> bool {
        other.address.to_uint() <= self.address.to_uint()
            && self.broadcast_address().to_uint() <= other.broadcast_address().to_uint()
    }

    pub fn supernet_of(&self, other: &Ipv4Network) -> bool {
        other.subnet_of(self)
    }

    /// The enclosing network `prefixlen_diff` bits shorter (default one), or
    /// at `new_prefix`. Exactly one of the arguments may be given.
    pub fn supernet(
        &self,
        prefixlen_diff: Option<u32>,
        new_prefix: Option<u32>,
    ) -> Result<Ipv4Network, AddressError> {
        if self.prefixlen == 0 {
            return Ok(*self);
        }
        let diff = resolve_prefix_args(
            self.prefixlen,
            IPV4_MAX_PREFIXLEN,
            prefixlen_diff,
            new_prefix,
            true,
        )?;
        let new_prefixlen = self.prefixlen - diff;
        Ok(Ipv4Network {
            address: Ipv4Address::from_uint(self.address.to_uint() & netmask_u32(new_prefixlen)),
            prefixlen: new_prefixlen,
        })
    }

    /// The subnets of prefix length `prefixlen + prefixlen_diff` (default
    /// one more bit), or of `new_prefix`, tiling this network in ascending
    /// order. A /32 network's only subnet is itself.
    pub fn subnets(
        &self,
        prefixlen_diff: Option<u32>,
        new_prefix: Option<u32>,
    ) -> Result<Ipv4Subnets, AddressError> {
        if self.prefixlen == IPV4_MAX_PREFIXLEN {
            return Ok(Ipv4Subnets {
                base: self.address.to_uint(),
                last_base: self.address.to_uint(),
                step: 1,
                new_prefixlen: self.prefixlen,
            });
        }
        let diff = resolve_prefix_args(
            self.prefixlen,
            IPV4_MAX_PREFIXLEN,
            prefixlen_diff,
            new_prefix,
            false,
        )?;
        let new_prefixlen = self.prefixlen + diff;
        let step = 1u64 << (IPV4_MAX_PREFIXLEN - new_prefixlen);
        let base = self.address.to_uint();
        let last_base = u64::from(self.broadcast_address().to_uint()) - (step - 1);
        Ok(Ipv4Subnets {
            base,
            last_base: last_base as u32,
            step,
            new_prefixlen,
        })
    }

    /// Usable hosts: every address for /31 and /32, otherwise the range
    /// without the network and broadcast addresses.
    pub fn hosts(&self) -> Ipv4Hosts {
        let network = self.address.to_uint();
        let broadcast = self.broadcast_address().to_uint();
        if self.prefixlen >= 31 {
            Ipv4Hosts {
                first: network,
                last: broadcast,
            }
        } else {
            Ipv4Hosts {
                first: network + 1,
                last: broadcast - 1,
            }
        }
    }

    /// Minimal set of subnets of `self` covering everything except `other`,
    /// widest first.
    pub fn address_exclude(&self, other: &Ipv4Network) -> Result<Vec<Ipv4Network>, AddressError> {
        if !other.subnet_of(self) {
            return Err(AddressError::NotContainedNetwork);
        }
        let mut result = Vec::new();
        if other == self {
            return Ok(result);
        }
        let mut current = *self;
        while current != *other {
            let halves = current.subnets(Some(1), None)?;
            let lower = halves.get(0).expect("split has two halves");
            let upper = halves.get(1).expect("split has two halves");
            if other.subnet_of(&lower) {
                result.push(upper);
                current = lower;
            } else {
                result.push(lower);
                current = upper;
            }
        }
        Ok(result)
    }
}

/// Parse an IPv4 mask: a decimal prefix length, a dotted netmask, or a
/// dotted hostmask. `full` is the whole network literal for diagnostics.
fn parse_netmask_v4(mask: &str, full: &str) -> Result<u32, AddressError> {
    if mask.bytes().all(|b| b.is_ascii_digit()) {
        return match mask.parse::<u32>() {
            Ok(prefixlen) if prefixlen <= IPV4_MAX_PREFIXLEN => Ok(prefixlen),
            _ => Err(AddressError::InvalidNetmask {
                address: unicode::escape_non_ascii(full),
            }),
        };
    }
    let ip = Ipv4Address::parse(mask)
        .map_err(|_| AddressError::InvalidNetmask {
            address: unicode::escape_non_ascii(full),
        })?
        .to_uint();
    // netmask first, then the complement as a hostmask
    prefix_from_u32(ip)
        .or_else(|_| prefix_from_u32(!ip))
        .map_err(|_| AddressError::NetmaskPatternMixesZeroesAndOnes {
            address: unicode::escape_non_ascii(full),
        })
}

/// Parse an IPv6 mask: a decimal prefix length only.
fn parse_netmask_v6(mask: &str, full: &str) -> Result<u32, AddressError> {
    if mask.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(prefixlen) = mask.parse::<u32>() {
            if prefixlen <= IPV6_MAX_PREFIXLEN {
                return Ok(prefixlen);
            }
        }
    }
    Err(AddressError::InvalidNetmask {
        address: unicode::escape_non_ascii(full),
    })
}

impl Ipv6Network {
    pub(crate) const fn new_unchecked(address: Ipv6Address, prefixlen: u32) -> Ipv6Network {
        Ipv6Network { address, prefixlen }
    }

    /// Parse a network literal, e.g. `"2001:db8::/32"`. Without a mask the
    /// prefix is /128. The address may carry a `%zone` suffix.
    pub fn parse(text: &str, strict: bool) -> Result<Ipv6Network, AddressError> {
        unicode::ascii_bytes(text)?;
        let (addr_text, mask_text) = split_slash(text)?;
        let prefixlen = match mask_text {
            Some(mask) => parse_netmask_v6(mask, text)?,
            None => IPV6_MAX_PREFIXLEN,
        };
        let address = Ipv6Address::parse(addr_text).map_err(|e| rebrand(e, text))?;
        Self::masked(address, prefixlen, strict, text)
    }

    /// Like [`Ipv6Network::parse`] but panics with the formatted diagnostic.
    pub fn parse_unchecked(text: &str, strict: bool) -> Ipv6Network {
        match Ipv6Network::parse(text, strict) {
            Ok(net) => net,
            Err(e) => panic!("{}", e),
        }
    }

    /// Build a network from an address and prefix length.
    pub fn from_address(
        address: Ipv6Address,
        prefixlen: u32,
        strict: bool,
    ) -> Result<Ipv6Network, AddressError> {
        if prefixlen > IPV6_MAX_PREFIXLEN {
            return Err(AddressError::InvalidNetmask {
                address: address.to_string(),
            });
        }
        let text = address.to_string();
        Self::masked(address, prefixlen, strict, &text)
    }

    fn masked(
        address: Ipv6Address,
        prefixlen: u32,
        strict: bool,
        text: &str,
    ) -> Result<Ipv6Network, AddressError> {
        let mask = netmask_u128(prefixlen);
        let packed = address.to_uint();
        if packed & mask != packed {
            if strict {
                return Err(AddressError::HasHostBitsSet {
                    address: unicode::escape_non_ascii(text),
                });
            }
            let mut masked = Ipv6Address::from_uint(packed & mask);
            if let Some(scope) = address.scope_id() {
                // keep the zone on the truncated address
                masked.set_scope_id(scope.as_str())?;
            }
            return Ok(Ipv6Network {
                address: masked,
                prefixlen,
            });
        }
        Ok(Ipv6Network { address, prefixlen })
    }

    pub fn network_address(&self) -> Ipv6Address {
        self.address.clone()
    }

    pub const fn prefixlen(&self) -> u32 {
        self.prefixlen
    }

    pub fn netmask(&self) -> Ipv6Address {
        Ipv6Address::from_uint(netmask_u128(self.prefixlen))
    }

    pub fn hostmask(&self) -> Ipv6Address {
        Ipv6Address::from_uint(!netmask_u128(self.prefixlen))
    }

    pub fn broadcast_address(&self) -> Ipv6Address {
        Ipv6Address::from_uint(self.address.to_uint() | !netmask_u128(self.prefixlen))
    }

    /// Total number of addresses in the network. For `::/0` the true count
    /// does not fit 128 bits and wraps to zero.
    pub fn addresses_count(&self) -> Uint128 {
        (!netmask_u128(self.prefixlen)).wrapping_add(Uint128::ONE)
    }

    /// Whether `address` lies within the network range. Zone identifiers
    /// are ignored.
    pub fn contains(&self, address: &Ipv6Address) -> bool {
        let value = address.to_uint();
        self.address.to_uint() <= value && value <= self.broadcast_address().to_uint()
    }

    pub fn overlaps(&self, other: &Ipv6Network) -> bool {
        other.contains(&self.address)
            || other.contains(&self.broadcast_address())
            || self.contains(&other.address)
    }

    pub fn subnet_of(&self, other: &Ipv6Network) -> bool {
        other.address.to_uint() <= self.address.to_uint()
            && self.broadcast_address().to_uint() <= other.broadcast_address().to_uint()
    }

    pub fn supernet_of(&self, other: &Ipv6Network) -> bool {
        other.subnet_of(self)
    }

    /// The enclosing network `prefixlen_diff` bits shorter (default one), or
    /// at `new_prefix`. Exactly one of the arguments may be given.
    pub fn supernet(
        &self,
        prefixlen_diff: Option<u32>,
        new_prefix: Option<u32>,
    ) -> Result<Ipv6Network, AddressError> {
        if self.prefixlen == 0 {
            return Ok(self.clone());
        }
        let diff = resolve_prefix_args(
            self.prefixlen,
            IPV6_MAX_PREFIXLEN,
            prefixlen_diff,
            new_prefix,
            true,
        )?;
        let new_prefixlen = self.prefixlen - diff;
        Ok(Ipv6Network {
            address: Ipv6Address::from_uint(self.address.to_uint() & netmask_u128(new_prefixlen)),
            prefixlen: new_prefixlen,
        })
    }

    /// The subnets of prefix length `prefixlen + prefixlen_diff` (default
    /// one more bit), or of `new_prefix`, tiling this network in ascending
    /// order. A /128 network's only subnet is itself.
    pub fn subnets(
        &self,
        prefixlen_diff: Option<u32>,
        new_prefix: Option<u32>,
    ) -> Result<Ipv6Subnets, AddressError> {
        if self.prefixlen == IPV6_MAX_PREFIXLEN {
            return Ok(Ipv6Subnets {
                base: self.address.to_uint(),
                last_base: self.address.to_uint(),
                step: Uint128::ONE,
                new_prefixlen: self.prefixlen,
            });
        }
        let diff = resolve_prefix_args(
            self.prefixlen,
            IPV6_MAX_PREFIXLEN,
            prefixlen_diff,
            new_prefix,
            false,
        )?;
        let new_prefixlen = self.prefixlen + diff;
        let step = Uint128::ONE << (IPV6_MAX_PREFIXLEN - new_prefixlen);
        let base = self.address.to_uint();
        let last_base = self
            .broadcast_address()
            .to_uint()
            .wrapping_sub(step.wrapping_sub(Uint128::ONE));
        Ok(Ipv6Subnets {
            base,
            last_base,
            step,
            new_prefixlen,
        })
    }

    /// Every address of an IPv6 network is a usable host.
    pub fn hosts(&self) -> Ipv6Hosts {
        Ipv6Hosts {
            first: self.address.to_uint(),
            last: self.broadcast_address().to_uint(),
        }
    }

    /// Minimal set of subnets of `self` covering everything except `other`,
    /// widest first.
    pub fn address_exclude(&self, other: &Ipv6Network) -> Result<Vec<Ipv6Network>, AddressError> {
        if !other.subnet_of(self) {
            return Err(AddressError::NotContainedNetwork);
        }
        let mut result = Vec::new();
        if other == self {
            return Ok(result);
        }
        let mut current = self.clone();
        while current != *other {
            let halves = current.subnets(Some(1), None)?;
            let lower = halves.get(Uint128::ZERO).expect("split has two halves");
            let upper = halves.get(Uint128::ONE).expect("split has two halves");
            if other.subnet_of(&lower) {
                result.push(upper);
                current = lower;
            } else {
                result.push(lower);
                current = upper;
            }
        }
        Ok(result)
    }
}

impl fmt::Display for Ipv4Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefixlen)
    }
}

impl fmt::Display for Ipv6Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefixlen)
    }
}

impl FromStr for Ipv4Network {
    type Err = AddressError;

    fn from_str(text: &str) -> Result<Ipv4Network, AddressError> {
        Ipv4Network::parse(text, true)
    }
}

impl FromStr for Ipv6Network {
    type Err = AddressError;

    fn from_str(text: &str) -> Result<Ipv6Network, AddressError> {
        Ipv6Network::parse(text, true)
    }
}

impl Serialize for Ipv4Network {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ipv4Network {
    fn deserialize<D>(deserializer: D) -> Result<Ipv4Network, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ipv4Network::parse(&s, true).map_err(de::Error::custom)
    }
}

impl Serialize for Ipv6Network {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ipv6Network {
    fn deserialize<D>(deserializer: D) -> Result<Ipv6Network, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ipv6Network::parse(&s, true).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(text: &str) -> Ipv4Network {
        Ipv4Network::parse(text, true).unwrap()
    }

    fn v6(text: &str) -> Ipv6Network {
        Ipv6Network::parse(text, true).unwrap()
    }

    #[test]
    fn test_parse_strict_and_relaxed() {
        let err = Ipv4Network::parse("1.2.3.4/24", true).unwrap_err();
        assert_eq!(
            err,
            AddressError::HasHostBitsSet {
                address: "1.2.3.4/24".to_string()
            }
        );
        assert_eq!(err.to_string(), "has host bits set in address 1.2.3.4/24");

        let net = Ipv4Network::parse("1.2.3.4/24", false).unwrap();
        assert_eq!(net.network_address().to_string(), "1.2.3.0");
        assert_eq!(net.broadcast_address().to_string(), "1.2.3.255");
        assert_eq!(net.prefixlen(), 24);

        let err = Ipv6Network::parse("2001:db8::1/64", true).unwrap_err();
        assert!(matches!(err, AddressError::HasHostBitsSet { .. }));
        let net = Ipv6Network::parse("2001:db8::1/64", false).unwrap();
        assert_eq!(net.network_address().to_string(), "2001:db8::");
    }

    #[test]
    fn test_parse_masks() {
        assert_eq!(v4("192.0.2.0/255.255.255.0"), v4("192.0.2.0/24"));
        // a dotted hostmask works too
        assert_eq!(v4("192.0.2.0/0.0.0.255"), v4("192.0.2.0/24"));
        // an all-zero mask is the /0 netmask
        assert_eq!(v4("0.0.0.0/0.0.0.0").prefixlen(), 0);
        assert_eq!(v4("0.0.0.0/255.255.255.255").prefixlen(), 32);
        assert_eq!(v4("0.0.0.0/0").prefixlen(), 0);
        // no mask means a single-address network
        assert_eq!(v4("192.0.2.1").prefixlen(), 32);
        assert_eq!(v6("2001:db8::1").prefixlen(), 128);
    }

    #[test]
    fn test_parse_mask_errors() {
        for (text, expected) in [
            (
                "1.2.3.4//",
                AddressError::OnlyOneSlashPermitted {
                    address: "1.2.3.4//".to_string(),
                },
            ),
            (
                "1.2.3.4/32/24",
                AddressError::OnlyOneSlashPermitted {
                    address: "1.2.3.4/32/24".to_string(),
                },
            ),
            (
                "1.2.3.4/",
                AddressError::EmptyNetmask {
                    address: "1.2.3.4/".to_string(),
                },
            ),
            (
                "/",
                AddressError::EmptyNetmask {
                    address: "/".to_string(),
                },
            ),
            (
                "1.2.3.4/33",
                AddressError::InvalidNetmask {
                    address: "1.2.3.4/33".to_string(),
                },
            ),
            (
                "1.2.3.4/-1",
                AddressError::InvalidNetmask {
                    address: "1.2.3.4/-1".to_string(),
                },
            ),
            (
                "1.2.3.4/+1",
                AddressError::InvalidNetmask {
                    address: "1.2.3.4/+1".to_string(),
                },
            ),
            (
                "1.2.3.4/0x1",
                AddressError::InvalidNetmask {
                    address: "1.2.3.4/0x1".to_string(),
                },
            ),
            (
                "1.1.1.1/pudding",
                AddressError::InvalidNetmask {
                    address: "1.1.1.1/pudding".to_string(),
                },
            ),
            (
                "1.2.3.4/255.0.0.256",
                AddressError::InvalidNetmask {
                    address: "1.2.3.4/255.0.0.256".to_string(),
                },
            ),
            (
                "1.1.1.1/::",
                AddressError::InvalidNetmask {
                    address: "1.1.1.1/::".to_string(),
                },
            ),
            (
                "1.2.3.4/255.255.255.127",
                AddressError::NetmaskPatternMixesZeroesAndOnes {
                    address: "1.2.3.4/255.255.255.127".to_string(),
                },
            ),
            (
                "1.1.1.1/240.255.0.0",
                AddressError::NetmaskPatternMixesZeroesAndOnes {
                    address: "1.1.1.1/240.255.0.0".to_string(),
                },
            ),
            (
                "1.1.1.1/255.254.128.0",
                AddressError::NetmaskPatternMixesZeroesAndOnes {
                    address: "1.1.1.1/255.254.128.0".to_string(),
                },
            ),
        ] {
            assert_eq!(Ipv4Network::parse(text, true).unwrap_err(), expected, "{text}");
        }

        assert_eq!(
            Ipv6Network::parse("2001:db8::/129", true).unwrap_err(),
            AddressError::InvalidNetmask {
                address: "2001:db8::/129".to_string()
            }
        );
        assert_eq!(
            Ipv6Network::parse("::1/word", true).unwrap_err(),
            AddressError::InvalidNetmask {
                address: "::1/word".to_string()
            }
        );
        assert_eq!(
            Ipv6Network::parse("2001:db8::/255.255.255.255", true).unwrap_err(),
            AddressError::InvalidNetmask {
                address: "2001:db8::/255.255.255.255".to_string()
            }
        );
    }

    #[test]
    fn test_address_errors_report_full_text_and_zero_index() {
        assert_eq!(
            Ipv4Network::parse("1.2.3.256", true).unwrap_err(),
            AddressError::OctetExceeded255 {
                octet: 0,
                address: "1.2.3.256".to_string()
            }
        );
        assert_eq!(
            Ipv4Network::parse("bogus", true).unwrap_err(),
            AddressError::OctetHasInvalidSymbol {
                octet: 0,
                address: "bogus".to_string()
            }
        );
        assert_eq!(
            Ipv6Network::parse("1234:axy::b", true).unwrap_err(),
            AddressError::PartHasInvalidSymbol {
                part: 0,
                address: "1234:axy::b".to_string()
            }
        );
        assert_eq!(
            Ipv6Network::parse("10/8", true).unwrap_err(),
            AddressError::Least3Parts {
                address: "10/8".to_string()
            }
        );
        assert_eq!(
            Ipv4Network::parse("/8", true).unwrap_err(),
            AddressError::EmptyAddress
        );
    }

    #[test]
    fn test_from_address() {
        let addr = Ipv4Address::parse("127.0.0.1").unwrap();
        let err = Ipv4Network::from_address(addr, 24, true).unwrap_err();
        assert_eq!(err.to_string(), "has host bits set in address 127.0.0.1");
        let net = Ipv4Network::from_address(addr, 24, false).unwrap();
        assert_eq!(net.to_string(), "127.0.0.0/24");
        assert!(Ipv4Network::from_address(addr, 33, true).is_err());
    }

    #[test]
    fn test_mask_invariant() {
        for net in [v4("192.0.2.0/24"), v4("10.0.0.0/8"), v4("0.0.0.0/0"), v4("1.2.3.4/32")] {
            let address = net.network_address().to_uint();
            let hostmask = net.hostmask().to_uint();
            assert_eq!(address & hostmask, 0);
            assert_eq!(address | hostmask, net.broadcast_address().to_uint());
            assert_eq!(net.netmask().to_uint(), !hostmask);
        }
        for net in [v6("2001:db8::/32"), v6("::/0"), v6("::1/128")] {
            let address = net.network_address().to_uint();
            let hostmask = net.hostmask().to_uint();
            assert_eq!(address & hostmask, Uint128::ZERO);
            assert_eq!(address | hostmask, net.broadcast_address().to_uint());
        }

        let net = v6("2001:db8::%scope/32");
        assert_eq!(net.network_address().to_string(), "2001:db8::%scope");
        assert_eq!(
            net.broadcast_address().to_string(),
            "2001:db8:ffff:ffff:ffff:ffff:ffff:ffff"
        );
        assert_eq!(net.netmask().to_string(), "ffff:ffff::");
        assert_eq!(net.hostmask().to_string(), "::ffff:ffff:ffff:ffff:ffff:ffff");
    }

    #[test]
    fn test_addresses_count() {
        assert_eq!(v4("10.0.0.0/30").addresses_count(), 4);
        assert_eq!(v4("0.0.0.0/0").addresses_count(), 1u64 << 32);
        assert_eq!(
            v6("2001:658:22a:cafe::/64").addresses_count(),
            "18446744073709551616".parse().unwrap()
        );
        assert_eq!(v6("::1/128").addresses_count(), Uint128::ONE);
    }

    #[test]
    fn test_relations() {
        assert!(v4("192.0.2.0/28").contains(&Ipv4Address::parse("192.0.2.6").unwrap()));
        assert!(!v4("192.0.2.0/28").contains(&Ipv4Address::parse("192.0.3.6").unwrap()));
        assert!(v6("2001:db8::/32").contains(&Ipv6Address::parse("2001:db8::1").unwrap()));
        assert!(!v6("2001:db8::/32").contains(&Ipv6Address::parse("2001:dbc::").unwrap()));
        // zone identifiers do not affect containment
        assert!(v6("2001:db8::/32").contains(&Ipv6Address::parse("2001:db8::1%eth0").unwrap()));

        assert!(v4("1.2.3.0/24").overlaps(&v4("1.2.3.0/30")));
        assert!(!v4("1.2.3.0/24").overlaps(&v4("1.2.2.0/24")));
        assert!(v6("2001:db8::/32").overlaps(&v6("2001:db8::/128")));
        assert!(!v6("2001:dbc::/32").overlaps(&v6("2001:db8::/32")));

        assert!(v4("10.0.0.0/30").subnet_of(&v4("10.0.0.0/24")));
        assert!(!v4("10.0.0.0/30").subnet_of(&v4("10.0.1.0/24")));
        assert!(v4("192.168.1.0/24").supernet_of(&v4("192.168.1.128/30")));
        assert!(v6("2000:aaa::/56").subnet_of(&v6("2000:aaa::/48")));
        assert!(!v6("2000:bbb::/56").subnet_of(&v6("2000:aaa::/48")));
    }

    #[test]
    fn test_supernet() {
        assert_eq!(v4("192.0.2.0/24").supernet(None, None).unwrap(), v4("192.0.2.0/23"));
        assert_eq!(
            v4("192.0.2.0/24").supernet(Some(2), None).unwrap(),
            v4("192.0.0.0/22")
        );
        assert_eq!(
            v4("192.0.2.0/24").supernet(None, Some(20)).unwrap(),
            v4("192.0.0.0/20")
        );
        assert_eq!(v4("0.0.0.0/0").supernet(None, None).unwrap(), v4("0.0.0.0/0"));
        assert_eq!(
            v6("2001:db8::/32").supernet(None, None).unwrap(),
            v6("2001:db8::/31")
        );

        assert_eq!(
            v4("192.0.2.0/24").supernet(Some(2), Some(23)).unwrap_err(),
            AddressError::CannotSetPrefixlenDiffAndNewPrefix
        );
        assert_eq!(
            v4("192.0.2.0/24").supernet(Some(25), None).unwrap_err(),
            AddressError::InvalidPrefixlenDiff
        );
        assert_eq!(
            v4("192.0.2.0/24").supernet(None, Some(25)).unwrap_err(),
            AddressError::NewPrefixMustBeShorter
        );
    }

    #[test]
    fn test_subnets() {
        let subnets = v4("192.0.2.0/24").subnets(Some(2), None).unwrap();
        assert_eq!(subnets.count(), 4);
        let all: Vec<String> = subnets.iter().map(|n| n.to_string()).collect();
        assert_eq!(
            all,
            ["192.0.2.0/26", "192.0.2.64/26", "192.0.2.128/26", "192.0.2.192/26"]
        );

        let subnets = v4("192.0.2.0/24").subnets(None, Some(26)).unwrap();
        assert_eq!(subnets.count(), 4);

        // a /32 network's only subnet is itself
        let subnets = v4("1.2.3.4/32").subnets(None, None).unwrap();
        assert_eq!(subnets.iter().collect::<Vec<_>>(), vec![v4("1.2.3.4/32")]);
        let subnets = v6("::1/128").subnets(None, None).unwrap();
        assert_eq!(subnets.iter().collect::<Vec<_>>(), vec![v6("::1/128")]);

        assert_eq!(
            v4("192.0.2.0/24").subnets(Some(2), Some(25)).unwrap_err(),
            AddressError::CannotSetPrefixlenDiffAndNewPrefix
        );
        assert_eq!(
            v4("192.0.2.0/24").subnets(None, Some(33)).unwrap_err(),
            AddressError::InvalidPrefixlenDiff
        );
        assert_eq!(
            v4("192.0.2.0/24").subnets(None, Some(23)).unwrap_err(),
            AddressError::NewPrefixMustBeLonger
        );
        assert_eq!(
            v4("192.0.2.0/24").subnets(Some(9), None).unwrap_err(),
            AddressError::InvalidPrefixlenDiff
        );

        let subnets = v6("2001:db8::/32").subnets(Some(2), None).unwrap();
        let all: Vec<String> = subnets.iter().map(|n| n.to_string()).collect();
        assert_eq!(
            all,
            [
                "2001:db8::/34",
                "2001:db8:4000::/34",
                "2001:db8:8000::/34",
                "2001:db8:c000::/34"
            ]
        );
    }

    #[test]
    fn test_subnet_supernet_duality() {
        for text in ["192.0.2.0/24", "10.0.0.0/8", "172.16.4.0/22"] {
            let net = v4(text);
            for diff in 1..=3 {
                let parent = net.supernet(Some(diff), None).unwrap();
                let children: Vec<Ipv4Network> =
                    parent.subnets(Some(diff), None).unwrap().iter().collect();
                assert!(children.contains(&net), "{text} diff {diff}");
            }
        }
    }

    #[test]
    fn test_hosts() {
        let hosts = v4("192.0.2.0/29").hosts();
        assert_eq!(hosts.count(), 6);
        assert_eq!(hosts.get(0).unwrap().to_string(), "192.0.2.1");
        assert_eq!(hosts.get(5).unwrap().to_string(), "192.0.2.6");

        // /31 and /32 include every address
        let hosts = v4("192.0.2.2/31").hosts();
        let all: Vec<String> = hosts.iter().map(|h| h.to_string()).collect();
        assert_eq!(all, ["192.0.2.2", "192.0.2.3"]);
        let hosts = v4("192.0.2.1/32").hosts();
        let all: Vec<String> = hosts.iter().map(|h| h.to_string()).collect();
        assert_eq!(all, ["192.0.2.1"]);

        // IPv6 networks include the network address
        let hosts = v6("2001:db8::/126").hosts();
        let all: Vec<String> = hosts.iter().map(|h| h.to_string()).collect();
        assert_eq!(all, ["2001:db8::", "2001:db8::1", "2001:db8::2", "2001:db8::3"]);
    }

    #[test]
    fn test_address_exclude() {
        let result = v4("192.0.2.0/28")
            .address_exclude(&v4("192.0.2.1/32"))
            .unwrap();
        let texts: Vec<String> = result.iter().map(|n| n.to_string()).collect();
        assert_eq!(
            texts,
            ["192.0.2.8/29", "192.0.2.4/30", "192.0.2.2/31", "192.0.2.0/32"]
        );

        assert_eq!(
            v4("192.0.2.0/28").address_exclude(&v4("10.0.0.0/8")).unwrap_err(),
            AddressError::NotContainedNetwork
        );
        assert!(v4("192.0.2.0/28")
            .address_exclude(&v4("192.0.2.0/28"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_ordering() {
        // lexicographic on (network address, prefix length)
        let mut nets = vec![v4("10.0.10.0/24"), v4("10.0.0.0/8"), v4("10.0.10.64/26")];
        nets.sort();
        let texts: Vec<String> = nets.iter().map(|n| n.to_string()).collect();
        assert_eq!(texts, ["10.0.0.0/8", "10.0.10.0/24", "10.0.10.64/26"]);

        // same address, different prefix: shorter prefix (smaller netmask) first
        assert!(Ipv4Network::parse("192.0.2.0/24", false).unwrap()
            < Ipv4Network::parse("192.0.2.0/25", false).unwrap());
    }

    #[test]
    fn test_display_roundtrip_and_serde() {
        for text in ["192.0.2.0/24", "0.0.0.0/0", "10.1.2.3/32"] {
            let net = v4(text);
            assert_eq!(net.to_string(), text);
            assert_eq!(text.parse::<Ipv4Network>().unwrap(), net);
        }
        for text in ["2001:db8::/32", "::/0", "2001:db8::%scope/32"] {
            let net = v6(text);
            assert_eq!(net.to_string(), text);
            assert_eq!(text.parse::<Ipv6Network>().unwrap(), net);
        }

        let net = v4("192.0.2.0/24");
        let json = serde_json::to_string(&net).unwrap();
        assert_eq!(json, "\"192.0.2.0/24\"");
        assert_eq!(serde_json::from_str::<Ipv4Network>(&json).unwrap(), net);
        assert!(serde_json::from_str::<Ipv4Network>("\"1.2.3.4/24\"").is_err());
    }
}
