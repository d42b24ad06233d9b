//! Address and network value types.
//!
//! This module contains the core data structures of the crate:
//! - [`Ipv4Address`] and [`Ipv6Address`] - immutable address values
//! - [`Ipv4Network`] and [`Ipv6Network`] - CIDR networks with derived masks
//! - [`IpAddress`] and [`IpNetwork`] - version-erased wrappers
//! - [`ScopeId`] - the optional IPv6 zone identifier

mod any;
mod ipv4;
mod ipv6;
mod iter;
mod network;

// Re-export public types
pub use any::{IpAddress, IpHosts, IpHostsIter, IpNetwork, IpSubnets, IpSubnetsIter};
pub use ipv4::{Ipv4Address, IPV4_MAX_PREFIXLEN};
pub use ipv6::{Ipv6Address, ScopeId, IPV6_MAX_PREFIXLEN, IPV6_SCOPE_ID_MAX_LENGTH};
pub use iter::{
    Ipv4Hosts, Ipv4HostsIter, Ipv4Subnets, Ipv4SubnetsIter, Ipv6Hosts, Ipv6HostsIter,
    Ipv6Subnets, Ipv6SubnetsIter,
};
pub use network::{Ipv4Network, Ipv6Network};

/// Textual rendering style for addresses and networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Every hextet zero-padded to four digits, no `::` compression.
    Full,
    /// No leading zeros, no `::` compression.
    Compact,
    /// Shortest valid form: no leading zeros, longest zero run collapsed.
    #[default]
    Compressed,
}

/// Hex digit case for IPv6 rendering. IPv4 output is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Case {
    #[default]
    Lower,
    Upper,
}

/// IP protocol version of an address or network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Version {
    V4 = 4,
    V6 = 6,
}
