//! IPv4/IPv6 address parsing and CIDR network algebra.
//!
//! The crate provides immutable address and network value types with a
//! strict text parser, netmask/broadcast arithmetic, subnet and supernet
//! decomposition, host enumeration, range summarization and network
//! collapsing, plus [`Uint128`], the fixed-width 128-bit unsigned integer
//! IPv6 arithmetic is built on.
//!
//! Every fallible operation comes in a checked form returning
//! `Result<_, AddressError>` and an `_unchecked` convenience form that
//! panics with the same formatted diagnostic.
//!
//! ```
//! use ipcalc::{collapse_addresses, IpNetwork, Ipv4Network};
//!
//! let net = Ipv4Network::parse("192.0.2.0/24", true).unwrap();
//! assert_eq!(net.broadcast_address().to_string(), "192.0.2.255");
//!
//! let nets = [
//!     IpNetwork::parse("192.0.2.0/25", true).unwrap(),
//!     IpNetwork::parse("192.0.2.128/25", true).unwrap(),
//! ];
//! assert_eq!(collapse_addresses(&nets).unwrap()[0].to_string(), "192.0.2.0/24");
//! ```

mod error;
pub mod models;
pub mod processing;
pub mod uint128;
pub mod unicode;

pub use error::AddressError;
pub use models::{
    Case, Format, IpAddress, IpHosts, IpNetwork, IpSubnets, Ipv4Address, Ipv4Hosts, Ipv4Network,
    Ipv4Subnets, Ipv6Address, Ipv6Hosts, Ipv6Network, Ipv6Subnets, ScopeId, Version,
    IPV4_MAX_PREFIXLEN, IPV6_MAX_PREFIXLEN, IPV6_SCOPE_ID_MAX_LENGTH,
};
pub use processing::{
    collapse_address_list, collapse_addresses, collapse_addresses_into, summarize_address_range,
    summarize_ipv4_address_range, summarize_ipv6_address_range,
};
pub use uint128::{ParseUint128Error, Uint128};
