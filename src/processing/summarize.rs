//! Address range summarization.
//!
//! Converts an inclusive address range into the minimal ordered set of
//! CIDR networks covering exactly that range: repeatedly take the widest
//! power-of-two block that starts at the current lower bound, is aligned
//! to its own size, and does not run past the end of the range.

use crate::error::AddressError;
use crate::models::{
    IpAddress, IpNetwork, Ipv4Address, Ipv4Network, Ipv6Address, Ipv6Network,
    IPV4_MAX_PREFIXLEN, IPV6_MAX_PREFIXLEN,
};
use crate::uint128::Uint128;

/// Lazy summarization of an IPv4 range.
#[derive(Debug, Clone)]
pub struct Ipv4Summarize {
    current: Option<u32>,
    last: u32,
}

impl Ipv4Summarize {
    pub(crate) fn new(first: u32, last: u32) -> Ipv4Summarize {
        Ipv4Summarize {
            current: Some(first),
            last,
        }
    }
}

impl Iterator for Ipv4Summarize {
    type Item = Ipv4Network;

    fn next(&mut self) -> Option<Ipv4Network> {
        let first = self.current?;
        let remaining = u64::from(self.last) - u64::from(first) + 1;
        // alignment of the lower bound caps the block, as does the range
        let align = first.trailing_zeros();
        let fit = 63 - remaining.leading_zeros();
        let nbits = align.min(fit);
        let network = Ipv4Network::new_unchecked(
            Ipv4Address::from_uint(first),
            IPV4_MAX_PREFIXLEN - nbits,
        );
        let next = u64::from(first) + (1u64 << nbits);
        self.current = if next > u64::from(self.last) {
            None
        } else {
            Some(next as u32)
        };
        Some(network)
    }
}

/// Lazy summarization of an IPv6 range.
#[derive(Debug, Clone)]
pub struct Ipv6Summarize {
    current: Option<Uint128>,
    last: Uint128,
}

impl Ipv6Summarize {
    pub(crate) fn new(first: Uint128, last: Uint128) -> Ipv6Summarize {
        Ipv6Summarize {
            current: Some(first),
            last,
        }
    }
}

impl Iterator for Ipv6Summarize {
    type Item = Ipv6Network;

    fn next(&mut self) -> Option<Ipv6Network> {
        let first = self.current?;
        let nbits = if first.is_zero() && self.last == Uint128::MAX {
            IPV6_MAX_PREFIXLEN
        } else {
            let remaining = self.last.wrapping_sub(first).wrapping_add(Uint128::ONE);
            let fit = remaining.bit_length() - 1;
            first.trailing_zeros().min(fit)
        };
        let network = Ipv6Network::new_unchecked(
            Ipv6Address::from_uint(first),
            IPV6_MAX_PREFIXLEN - nbits,
        );
        self.current = if nbits == IPV6_MAX_PREFIXLEN {
            None
        } else {
            let next = first.wrapping_add(Uint128::ONE.wrapping_shl(nbits));
            if next > self.last || next < first {
                None
            } else {
                Some(next)
            }
        };
        Some(network)
    }
}

/// Summarization of either family, yielding [`IpNetwork`] values.
#[derive(Debug, Clone)]
pub enum IpSummarize {
    V4(Ipv4Summarize),
    V6(Ipv6Summarize),
}

impl Iterator for IpSummarize {
    type Item = IpNetwork;

    fn next(&mut self) -> Option<IpNetwork> {
        match self {
            IpSummarize::V4(it) => it.next().map(IpNetwork::V4),
            IpSummarize::V6(it) => it.next().map(IpNetwork::V6),
        }
    }
}

/// Summarize an inclusive IPv4 range into its minimal network tiling.
pub fn summarize_ipv4_address_range(
    first: Ipv4Address,
    last: Ipv4Address,
) -> Result<Ipv4Summarize, AddressError> {
    if first > last {
        return Err(AddressError::LastAddressMustBeGreaterThanFirst);
    }
    log::trace!("summarizing range {first} - {last}");
    Ok(Ipv4Summarize::new(first.to_uint(), last.to_uint()))
}

/// Summarize an inclusive IPv6 range into its minimal network tiling.
/// Zone identifiers are ignored; the produced networks carry none.
pub fn summarize_ipv6_address_range(
    first: &Ipv6Address,
    last: &Ipv6Address,
) -> Result<Ipv6Summarize, AddressError> {
    if first.to_uint() > last.to_uint() {
        return Err(AddressError::LastAddressMustBeGreaterThanFirst);
    }
    log::trace!("summarizing range {first} - {last}");
    Ok(Ipv6Summarize::new(first.to_uint(), last.to_uint()))
}

/// Summarize an inclusive range of either family. The bounds must share a
/// version.
pub fn summarize_address_range(
    first: &IpAddress,
    last: &IpAddress,
) -> Result<IpSummarize, AddressError> {
    match (first, last) {
        (IpAddress::V4(first), IpAddress::V4(last)) => {
            summarize_ipv4_address_range(*first, *last).map(IpSummarize::V4)
        }
        (IpAddress::V6(first), IpAddress::V6(last)) => {
            summarize_ipv6_address_range(first, last).map(IpSummarize::V6)
        }
        _ => Err(AddressError::InvalidVersion),
    }
}
