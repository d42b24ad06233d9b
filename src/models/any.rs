//! Version-erased address and network wrappers.
//!
//! [`IpAddress`] and [`IpNetwork`] hold either family behind one type so
//! heterogeneous collections can be parsed, sorted and collapsed. Bare
//! parsing tries the IPv4 grammar first only when the text contains no
//! colon; when both grammars reject, the IPv6 grammar's diagnostic is
//! reported. Dotted inputs still surface octet-level wording through the
//! IPv6 grammar's embedded-IPv4 tail handling.

use std::fmt;
use std::str::FromStr;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AddressError;
use crate::models::iter::{
    Ipv4Hosts, Ipv4HostsIter, Ipv4Subnets, Ipv4SubnetsIter, Ipv6Hosts, Ipv6HostsIter,
    Ipv6Subnets, Ipv6SubnetsIter,
};
use crate::models::{
    Case, Format, Ipv4Address, Ipv4Network, Ipv6Address, Ipv6Network, Version,
};
use crate::uint128::Uint128;
use crate::unicode;

/// An IPv4 or IPv6 address. Orders by version first, then by value, so
/// every IPv4 address sorts before every IPv6 address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IpAddress {
    V4(Ipv4Address),
    V6(Ipv6Address),
}

impl IpAddress {
    /// Parse either family from text.
    pub fn parse(text: &str) -> Result<IpAddress, AddressError> {
        unicode::ascii_bytes(text)?;
        if !text.contains(':') {
            if let Ok(ip) = Ipv4Address::parse(text) {
                return Ok(IpAddress::V4(ip));
            }
        }
        Ipv6Address::parse(text).map(IpAddress::V6)
    }

    /// Like [`IpAddress::parse`] but panics with the formatted diagnostic.
    pub fn parse_unchecked(text: &str) -> IpAddress {
        match IpAddress::parse(text) {
            Ok(ip) => ip,
            Err(e) => panic!("{}", e),
        }
    }

    /// Build an address of `version` from raw bytes. Missing bytes are
    /// zero-filled and extra bytes ignored.
    pub fn from_bytes(bytes: &[u8], version: Version) -> IpAddress {
        match version {
            Version::V4 => {
                let mut octets = [0u8; 4];
                for (slot, &byte) in octets.iter_mut().zip(bytes) {
                    *slot = byte;
                }
                IpAddress::V4(Ipv4Address::from_bytes(octets))
            }
            Version::V6 => {
                let mut octets = [0u8; 16];
                for (slot, &byte) in octets.iter_mut().zip(bytes) {
                    *slot = byte;
                }
                IpAddress::V6(Ipv6Address::from_bytes(octets))
            }
        }
    }

    pub fn version(&self) -> Version {
        match self {
            IpAddress::V4(_) => Version::V4,
            IpAddress::V6(_) => Version::V6,
        }
    }

    pub fn is_v4(&self) -> bool {
        matches!(self, IpAddress::V4(_))
    }

    pub fn is_v6(&self) -> bool {
        matches!(self, IpAddress::V6(_))
    }

    pub fn as_v4(&self) -> Option<&Ipv4Address> {
        match self {
            IpAddress::V4(ip) => Some(ip),
            IpAddress::V6(_) => None,
        }
    }

    pub fn as_v6(&self) -> Option<&Ipv6Address> {
        match self {
            IpAddress::V6(ip) => Some(ip),
            IpAddress::V4(_) => None,
        }
    }

    /// The address value zero-extended to 128 bits.
    pub fn to_uint(&self) -> Uint128 {
        match self {
            IpAddress::V4(ip) => Uint128::from(ip.to_uint()),
            IpAddress::V6(ip) => ip.to_uint(),
        }
    }

    pub fn format(&self, fmt: Format, case: Case) -> String {
        match self {
            IpAddress::V4(ip) => ip.format(fmt, case),
            IpAddress::V6(ip) => ip.format(fmt, case),
        }
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IpAddress::V4(ip) => ip.fmt(f),
            IpAddress::V6(ip) => ip.fmt(f),
        }
    }
}

impl FromStr for IpAddress {
    type Err = AddressError;

    fn from_str(text: &str) -> Result<IpAddress, AddressError> {
        IpAddress::parse(text)
    }
}

impl From<Ipv4Address> for IpAddress {
    fn from(ip: Ipv4Address) -> IpAddress {
        IpAddress::V4(ip)
    }
}

impl From<Ipv6Address> for IpAddress {
    fn from(ip: Ipv6Address) -> IpAddress {
        IpAddress::V6(ip)
    }
}

impl Serialize for IpAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for IpAddress {
    fn deserialize<D>(deserializer: D) -> Result<IpAddress, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        IpAddress::parse(&s).map_err(de::Error::custom)
    }
}

/// An IPv4 or IPv6 network. Orders by version first, then by
/// (network address, prefix length).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IpNetwork {
    V4(Ipv4Network),
    V6(Ipv6Network),
}

impl IpNetwork {
    /// Parse either family from a network literal.
    pub fn parse(text: &str, strict: bool) -> Result<IpNetwork, AddressError> {
        unicode::ascii_bytes(text)?;
        if !text.contains(':') {
            if let Ok(net) = Ipv4Network::parse(text, strict) {
                return Ok(IpNetwork::V4(net));
            }
        }
        Ipv6Network::parse(text, strict).map(IpNetwork::V6)
    }

    /// Like [`IpNetwork::parse`] but panics with the formatted diagnostic.
    pub fn parse_unchecked(text: &str, strict: bool) -> IpNetwork {
        match IpNetwork::parse(text, strict) {
            Ok(net) => net,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn version(&self) -> Version {
        match self {
            IpNetwork::V4(_) => Version::V4,
            IpNetwork::V6(_) => Version::V6,
        }
    }

    pub fn is_v4(&self) -> bool {
        matches!(self, IpNetwork::V4(_))
    }

    pub fn is_v6(&self) -> bool {
        matches!(self, IpNetwork::V6(_))
    }

    pub fn as_v4(&self) -> Option<&Ipv4Network> {
        match self {
            IpNetwork::V4(net) => Some(net),
            IpNetwork::V6(_) => None,
        }
    }

    pub fn as_v6(&self) -> Option<&Ipv6Network> {
        match self {
            IpNetwork::V6(net) => Some(net),
            IpNetwork::V4(_) => None,
        }
    }

    pub fn network_address(&self) -> IpAddress {
        match self {
            IpNetwork::V4(net) => IpAddress::V4(net.network_address()),
            IpNetwork::V6(net) => IpAddress::V6(net.network_address()),
        }
    }

    pub fn broadcast_address(&self) -> IpAddress {
        match self {
            IpNetwork::V4(net) => IpAddress::V4(net.broadcast_address()),
            IpNetwork::V6(net) => IpAddress::V6(net.broadcast_address()),
        }
    }

    pub fn netmask(&self) -> IpAddress {
        match self {
            IpNetwork::V4(net) => IpAddress::V4(net.netmask()),
            IpNetwork::V6(net) => IpAddress::V6(net.netmask()),
        }
    }

    pub fn hostmask(&self) -> IpAddress {
        match self {
            IpNetwork::V4(net) => IpAddress::V4(net.hostmask()),
            IpNetwork::V6(net) => IpAddress::V6(net.hostmask()),
        }
    }

    pub fn prefixlen(&self) -> u32 {
        match self {
            IpNetwork::V4(net) => net.prefixlen(),
            IpNetwork::V6(net) => net.prefixlen(),
        }
    }

    /// Total number of addresses, widened to 128 bits for both families.
    pub fn addresses_count(&self) -> Uint128 {
        match self {
            IpNetwork::V4(net) => Uint128::from(net.addresses_count()),
            IpNetwork::V6(net) => net.addresses_count(),
        }
    }

    /// Containment; an address of the other family is never contained.
    pub fn contains(&self, address: &IpAddress) -> bool {
        match (self, address) {
            (IpNetwork::V4(net), IpAddress::V4(ip)) => net.contains(ip),
            (IpNetwork::V6(net), IpAddress::V6(ip)) => net.contains(ip),
            _ => false,
        }
    }

    /// Interval intersection; networks of different families never overlap.
    pub fn overlaps(&self, other: &IpNetwork) -> bool {
        match (self, other) {
            (IpNetwork::V4(a), IpNetwork::V4(b)) => a.overlaps(b),
            (IpNetwork::V6(a), IpNetwork::V6(b)) => a.overlaps(b),
            _ => false,
        }
    }

    /// Whether `self` is wholly inside `other`. Mixing families is an error.
    pub fn subnet_of(&self, other: &IpNetwork) -> Result<bool, AddressError> {
        match (self, other) {
            (IpNetwork::V4(a), IpNetwork::V4(b)) => Ok(a.subnet_of(b)),
            (IpNetwork::V6(a), IpNetwork::V6(b)) => Ok(a.subnet_of(b)),
            _ => Err(AddressError::InvalidVersion),
        }
    }

    /// Whether `self` wholly contains `other`. Mixing families is an error.
    pub fn supernet_of(&self, other: &IpNetwork) -> Result<bool, AddressError> {
        match (self, other) {
            (IpNetwork::V4(a), IpNetwork::V4(b)) => Ok(a.supernet_of(b)),
            (IpNetwork::V6(a), IpNetwork::V6(b)) => Ok(a.supernet_of(b)),
            _ => Err(AddressError::InvalidVersion),
        }
    }

    pub fn supernet(
        &self,
        prefixlen_diff: Option<u32>,
        new_prefix: Option<u32>,
    ) -> Result<IpNetwork, AddressError> {
        match self {
            IpNetwork::V4(net) => net.supernet(prefixlen_diff, new_prefix).map(IpNetwork::V4),
            IpNetwork::V6(net) => net.supernet(prefixlen_diff, new_prefix).map(IpNetwork::V6),
        }
    }

    pub fn subnets(
        &self,
        prefixlen_diff: Option<u32>,
        new_prefix: Option<u32>,
    ) -> Result<IpSubnets, AddressError> {
        match self {
            IpNetwork::V4(net) => net.subnets(prefixlen_diff, new_prefix).map(IpSubnets::V4),
            IpNetwork::V6(net) => net.subnets(prefixlen_diff, new_prefix).map(IpSubnets::V6),
        }
    }

    pub fn hosts(&self) -> IpHosts {
        match self {
            IpNetwork::V4(net) => IpHosts::V4(net.hosts()),
            IpNetwork::V6(net) => IpHosts::V6(net.hosts()),
        }
    }

    /// Subnets of `self` covering everything except `other`, widest first.
    pub fn address_exclude(&self, other: &IpNetwork) -> Result<Vec<IpNetwork>, AddressError> {
        match (self, other) {
            (IpNetwork::V4(a), IpNetwork::V4(b)) => Ok(a
                .address_exclude(b)?
                .into_iter()
                .map(IpNetwork::V4)
                .collect()),
            (IpNetwork::V6(a), IpNetwork::V6(b)) => Ok(a
                .address_exclude(b)?
                .into_iter()
                .map(IpNetwork::V6)
                .collect()),
            _ => Err(AddressError::InvalidVersion),
        }
    }
}

impl fmt::Display for IpNetwork {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IpNetwork::V4(net) => net.fmt(f),
            IpNetwork::V6(net) => net.fmt(f),
        }
    }
}

impl FromStr for IpNetwork {
    type Err = AddressError;

    fn from_str(text: &str) -> Result<IpNetwork, AddressError> {
        IpNetwork::parse(text, true)
    }
}

impl From<Ipv4Network> for IpNetwork {
    fn from(net: Ipv4Network) -> IpNetwork {
        IpNetwork::V4(net)
    }
}

impl From<Ipv6Network> for IpNetwork {
    fn from(net: Ipv6Network) -> IpNetwork {
        IpNetwork::V6(net)
    }
}

impl Serialize for IpNetwork {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for IpNetwork {
    fn deserialize<D>(deserializer: D) -> Result<IpNetwork, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        IpNetwork::parse(&s, true).map_err(de::Error::custom)
    }
}

/// Hosts of either family.
#[derive(Debug, Clone)]
pub enum IpHosts {
    V4(Ipv4Hosts),
    V6(Ipv6Hosts),
}

impl IpHosts {
    pub fn count(&self) -> Uint128 {
        match self {
            IpHosts::V4(hosts) => Uint128::from(hosts.count()),
            IpHosts::V6(hosts) => hosts.count(),
        }
    }

    pub fn get(&self, index: Uint128) -> Option<IpAddress> {
        match self {
            IpHosts::V4(hosts) => {
                if index.upper() != 0 {
                    return None;
                }
                hosts.get(index.lower()).map(IpAddress::V4)
            }
            IpHosts::V6(hosts) => hosts.get(index).map(IpAddress::V6),
        }
    }

    pub fn iter(&self) -> IpHostsIter {
        match self {
            IpHosts::V4(hosts) => IpHostsIter::V4(hosts.iter()),
            IpHosts::V6(hosts) => IpHostsIter::V6(hosts.iter()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum IpHostsIter {
    V4(Ipv4HostsIter),
    V6(Ipv6HostsIter),
}

impl Iterator for IpHostsIter {
    type Item = IpAddress;

    fn next(&mut self) -> Option<IpAddress> {
        match self {
            IpHostsIter::V4(it) => it.next().map(IpAddress::V4),
            IpHostsIter::V6(it) => it.next().map(IpAddress::V6),
        }
    }
}

impl DoubleEndedIterator for IpHostsIter {
    fn next_back(&mut self) -> Option<IpAddress> {
        match self {
            IpHostsIter::V4(it) => it.next_back().map(IpAddress::V4),
            IpHostsIter::V6(it) => it.next_back().map(IpAddress::V6),
        }
    }
}

/// Subnet tiling of either family.
#[derive(Debug, Clone)]
pub enum IpSubnets {
    V4(Ipv4Subnets),
    V6(Ipv6Subnets),
}

impl IpSubnets {
    pub fn count(&self) -> Uint128 {
        match self {
            IpSubnets::V4(subnets) => Uint128::from(subnets.count()),
            IpSubnets::V6(subnets) => subnets.count(),
        }
    }

    pub fn get(&self, index: Uint128) -> Option<IpNetwork> {
        match self {
            IpSubnets::V4(subnets) => {
                if index.upper() != 0 {
                    return None;
                }
                subnets.get(index.lower()).map(IpNetwork::V4)
            }
            IpSubnets::V6(subnets) => subnets.get(index).map(IpNetwork::V6),
        }
    }

    pub fn iter(&self) -> IpSubnetsIter {
        match self {
            IpSubnets::V4(subnets) => IpSubnetsIter::V4(subnets.iter()),
            IpSubnets::V6(subnets) => IpSubnetsIter::V6(subnets.iter()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum IpSubnetsIter {
    V4(Ipv4SubnetsIter),
    V6(Ipv6SubnetsIter),
}

impl Iterator for IpSubnetsIter {
    type Item = IpNetwork;

    fn next(&mut self) -> Option<IpNetwork> {
        match self {
            IpSubnetsIter::V4(it) => it.next().map(IpNetwork::V4),
            IpSubnetsIter::V6(it) => it.next().map(IpNetwork::V6),
        }
    }
}

impl DoubleEndedIterator for IpSubnetsIter {
    fn next_back(&mut self) -> Option<IpNetwork> {
        match self {
            IpSubnetsIter::V4(it) => it.next_back().map(IpNetwork::V4),
            IpSubnetsIter::V6(it) => it.next_back().map(IpNetwork::V6),
        }
    }
}
