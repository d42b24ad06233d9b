//! Network collapsing.
//!
//! Reduces a collection of same-family networks to the minimal equivalent
//! set of non-overlapping networks: single addresses are merged into
//! contiguous ranges and summarized, sibling networks are folded into
//! their supernet until a fixed point, and networks already covered by a
//! predecessor are dropped.

use itertools::Itertools;

use crate::error::AddressError;
use crate::models::{
    IpAddress, IpNetwork, Ipv4Network, Ipv6Network, Version, IPV4_MAX_PREFIXLEN,
    IPV6_MAX_PREFIXLEN,
};
use crate::processing::summarize::{Ipv4Summarize, Ipv6Summarize};
use crate::uint128::Uint128;

/// Collapse networks into the minimal covering set.
///
/// The input may contain duplicates and overlaps but must be a single
/// address family; mixing families is a version-mismatch error.
///
/// # Examples
/// ```
/// use ipcalc::{collapse_addresses, IpNetwork};
/// let nets = [
///     IpNetwork::parse("192.0.2.0/25", true).unwrap(),
///     IpNetwork::parse("192.0.2.128/25", true).unwrap(),
/// ];
/// let collapsed = collapse_addresses(&nets).unwrap();
/// assert_eq!(collapsed.len(), 1);
/// assert_eq!(collapsed[0].to_string(), "192.0.2.0/24");
/// ```
pub fn collapse_addresses(networks: &[IpNetwork]) -> Result<Vec<IpNetwork>, AddressError> {
    check_versions(networks)?;
    let mut workset: Vec<IpNetwork> = networks.to_vec();
    collapse_core(&mut workset);
    log::debug!(
        "collapsed {} networks into {}",
        networks.len(),
        workset.len()
    );
    Ok(workset)
}

/// Collapse networks into a caller-provided working set.
///
/// This is the pre-sized variant for callers that know the input size up
/// front and want no allocation during the operation: `workset` must have
/// capacity for at least `networks.len()` entries (the algorithm never
/// holds more), and is cleared and reused without growing.
///
/// Produces exactly the same result as [`collapse_addresses`].
///
/// # Panics
/// Panics if `workset.capacity() < networks.len()`; the capacity contract
/// is a programming error, unlike input errors which are reported through
/// the `Result`.
pub fn collapse_addresses_into<'a>(
    networks: &[IpNetwork],
    workset: &'a mut Vec<IpNetwork>,
) -> Result<&'a [IpNetwork], AddressError> {
    assert!(
        workset.capacity() >= networks.len(),
        "collapse working set smaller than input"
    );
    check_versions(networks)?;
    workset.clear();
    workset.extend(networks.iter().cloned());
    collapse_core(workset);
    log::debug!(
        "collapsed {} networks into {} (pre-sized working set)",
        networks.len(),
        workset.len()
    );
    Ok(workset.as_slice())
}

fn check_versions(networks: &[IpNetwork]) -> Result<(), AddressError> {
    if let Some((first, rest)) = networks.split_first() {
        if rest.iter().any(|net| net.version() != first.version()) {
            return Err(AddressError::InvalidVersion);
        }
    }
    Ok(())
}

/// The shared merge routine: runs entirely inside the working set and
/// never exceeds its initial length.
fn collapse_core(nets: &mut Vec<IpNetwork>) {
    nets.sort();
    nets.dedup();
    merge_single_runs(nets);

    loop {
        let before = nets.len();
        drop_covered(nets);
        let merged = merge_sibling_pass(nets);
        if !merged && nets.len() == before {
            break;
        }
    }
}

fn is_single(net: &IpNetwork) -> bool {
    match net {
        IpNetwork::V4(net) => net.prefixlen() == IPV4_MAX_PREFIXLEN,
        IpNetwork::V6(net) => net.prefixlen() == IPV6_MAX_PREFIXLEN,
    }
}

fn address_uint(net: &IpNetwork) -> Uint128 {
    net.network_address().to_uint()
}

fn broadcast_uint(net: &IpNetwork) -> Uint128 {
    net.broadcast_address().to_uint()
}

/// Replace each run of consecutive single addresses with its range
/// summarization. The input is sorted; output is written in place and is
/// never longer than the run it replaces.
fn merge_single_runs(nets: &mut Vec<IpNetwork>) {
    let mut write = 0;
    let mut read = 0;
    while read < nets.len() {
        if !is_single(&nets[read]) {
            let net = nets[read].clone();
            nets[write] = net;
            write += 1;
            read += 1;
            continue;
        }

        let version = nets[read].version();
        let first = address_uint(&nets[read]);
        let mut last = first;
        read += 1;
        while read < nets.len()
            && is_single(&nets[read])
            && address_uint(&nets[read]) == last.wrapping_add(Uint128::ONE)
        {
            last = address_uint(&nets[read]);
            read += 1;
        }

        match version {
            Version::V4 => {
                for net in Ipv4Summarize::new(first.lower() as u32, last.lower() as u32) {
                    nets[write] = IpNetwork::V4(net);
                    write += 1;
                }
            }
            Version::V6 => {
                for net in Ipv6Summarize::new(first, last) {
                    nets[write] = IpNetwork::V6(net);
                    write += 1;
                }
            }
        }
    }
    nets.truncate(write);
}

/// Drop every network whose range is already covered by the previous kept
/// network. Input sorted by (address, prefix); afterwards all entries are
/// pairwise disjoint.
fn drop_covered(nets: &mut Vec<IpNetwork>) {
    let mut last_broadcast: Option<Uint128> = None;
    nets.retain(|net| {
        let broadcast = broadcast_uint(net);
        if last_broadcast.is_some_and(|last| broadcast <= last) {
            return false;
        }
        last_broadcast = Some(broadcast);
        true
    });
}

/// One pass folding adjacent sibling pairs into their supernet. After
/// [`drop_covered`] siblings are always adjacent, and replacing the lower
/// sibling keeps the set sorted.
fn merge_sibling_pass(nets: &mut Vec<IpNetwork>) -> bool {
    let mut merged = false;
    let mut write = 0;
    let mut read = 0;
    while read < nets.len() {
        if read + 1 < nets.len() {
            if let Some(parent) = sibling_supernet(&nets[read], &nets[read + 1]) {
                nets[write] = parent;
                write += 1;
                read += 2;
                merged = true;
                continue;
            }
        }
        let net = nets[read].clone();
        nets[write] = net;
        write += 1;
        read += 1;
    }
    nets.truncate(write);
    merged
}

/// The common supernet when `a` and `b` are the two halves of it.
fn sibling_supernet(a: &IpNetwork, b: &IpNetwork) -> Option<IpNetwork> {
    if a.prefixlen() != b.prefixlen() || a.prefixlen() == 0 {
        return None;
    }
    let parent = a.supernet(None, None).ok()?;
    if parent == b.supernet(None, None).ok()? && a != b {
        Some(parent)
    } else {
        None
    }
}

/// Convenience form of [`collapse_addresses`] for bare addresses: each
/// address becomes its single-address network first. Zone identifiers are
/// dropped.
pub fn collapse_address_list(addresses: &[IpAddress]) -> Result<Vec<IpNetwork>, AddressError> {
    let networks: Vec<IpNetwork> = addresses
        .iter()
        .map(|ip| match ip {
            IpAddress::V4(ip) => {
                Ipv4Network::from_address(*ip, IPV4_MAX_PREFIXLEN, true).map(IpNetwork::V4)
            }
            IpAddress::V6(ip) => {
                Ipv6Network::from_address(ip.without_scope_id(), IPV6_MAX_PREFIXLEN, true)
                    .map(IpNetwork::V6)
            }
        })
        .try_collect()?;
    collapse_addresses(&networks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nets(texts: &[&str]) -> Vec<IpNetwork> {
        texts
            .iter()
            .map(|t| IpNetwork::parse(t, true).unwrap())
            .collect()
    }

    fn texts(nets: &[IpNetwork]) -> Vec<String> {
        nets.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_collapse_empty_and_singleton() {
        assert!(collapse_addresses(&[]).unwrap().is_empty());
        let collapsed = collapse_addresses(&nets(&["2001:db8::1/128"])).unwrap();
        assert_eq!(texts(&collapsed), ["2001:db8::1/128"]);
    }

    #[test]
    fn test_collapse_sibling_halves() {
        let collapsed =
            collapse_addresses(&nets(&["192.0.2.0/25", "192.0.2.128/25"])).unwrap();
        assert_eq!(texts(&collapsed), ["192.0.2.0/24"]);
    }

    #[test]
    fn test_collapse_non_adjacent_stay_separate() {
        let collapsed =
            collapse_addresses(&nets(&["2001:db8::1/128", "2001:db8::2/128"])).unwrap();
        assert_eq!(texts(&collapsed), ["2001:db8::1/128", "2001:db8::2/128"]);
    }

    #[test]
    fn test_collapse_consecutive_singles() {
        let collapsed =
            collapse_addresses(&nets(&["192.168.1.1/32", "192.168.1.0/32"])).unwrap();
        assert_eq!(texts(&collapsed), ["192.168.1.0/31"]);

        let collapsed = collapse_addresses(&nets(&[
            "192.168.1.3/32",
            "192.168.1.0/32",
            "192.168.1.1/32",
        ]))
        .unwrap();
        assert_eq!(texts(&collapsed), ["192.168.1.0/31", "192.168.1.3/32"]);
    }

    #[test]
    fn test_collapse_singles_fixture() {
        // 2001:db8::a through ::19 minus nothing, scrambled, all /128
        let input = nets(&[
            "2001:db8::19/128",
            "2001:db8::a/128",
            "2001:db8::b/128",
            "2001:db8::16/128",
            "2001:db8::c/128",
            "2001:db8::d/128",
            "2001:db8::10/128",
            "2001:db8::11/128",
            "2001:db8::12/128",
            "2001:db8::13/128",
            "2001:db8::e/128",
            "2001:db8::f/128",
            "2001:db8::14/128",
            "2001:db8::15/128",
            "2001:db8::17/128",
            "2001:db8::18/128",
        ]);
        let collapsed = collapse_addresses(&input).unwrap();
        assert_eq!(
            texts(&collapsed),
            [
                "2001:db8::a/127",
                "2001:db8::c/126",
                "2001:db8::10/125",
                "2001:db8::18/127"
            ]
        );
    }

    #[test]
    fn test_collapse_overlapping_and_duplicates() {
        let collapsed = collapse_addresses(&nets(&[
            "192.0.2.0/26",
            "192.0.2.0/24",
            "192.0.2.64/26",
            "192.0.2.0/24",
        ]))
        .unwrap();
        assert_eq!(texts(&collapsed), ["192.0.2.0/24"]);

        // merging cascades through several prefix levels
        let collapsed = collapse_addresses(&nets(&[
            "10.0.0.0/26",
            "10.0.0.64/26",
            "10.0.0.128/26",
            "10.0.0.192/26",
        ]))
        .unwrap();
        assert_eq!(texts(&collapsed), ["10.0.0.0/24"]);
    }

    #[test]
    fn test_collapse_mixed_sizes_between_singles() {
        let collapsed = collapse_addresses(&nets(&[
            "10.0.0.0/30",
            "10.0.0.2/31",
            "10.0.0.4/30",
        ]))
        .unwrap();
        assert_eq!(texts(&collapsed), ["10.0.0.0/29"]);
    }

    #[test]
    fn test_collapse_version_mismatch() {
        let input = nets(&["2001:db8::1/128", "192.0.2.0/28"]);
        assert_eq!(
            collapse_addresses(&input).unwrap_err(),
            AddressError::InvalidVersion
        );
        let input = nets(&["192.0.2.0/28", "2001:db8::1/128"]);
        assert_eq!(
            collapse_addresses(&input).unwrap_err(),
            AddressError::InvalidVersion
        );
    }

    #[test]
    fn test_collapse_idempotent() {
        let input = nets(&[
            "10.0.0.0/27",
            "10.0.0.32/27",
            "10.0.1.1/32",
            "10.0.1.2/32",
            "10.0.1.3/32",
            "192.168.0.0/16",
        ]);
        let once = collapse_addresses(&input).unwrap();
        let twice = collapse_addresses(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_collapse_into_matches_unbounded() {
        let input = nets(&[
            "192.0.2.0/25",
            "192.0.2.128/25",
            "10.0.0.1/32",
            "10.0.0.2/32",
            "10.0.0.3/32",
            "10.0.0.0/32",
        ]);
        let unbounded = collapse_addresses(&input).unwrap();
        let mut workset = Vec::with_capacity(input.len());
        let bounded = collapse_addresses_into(&input, &mut workset).unwrap();
        assert_eq!(bounded, unbounded.as_slice());
        assert_eq!(texts(bounded), ["10.0.0.0/30", "192.0.2.0/24"]);
    }

    #[test]
    #[should_panic(expected = "collapse working set smaller than input")]
    fn test_collapse_into_capacity_contract() {
        let input = nets(&["192.0.2.0/25", "192.0.2.128/25"]);
        let mut workset = Vec::with_capacity(1);
        let _ = collapse_addresses_into(&input, &mut workset);
    }

    #[test]
    fn test_collapse_address_list() {
        let addresses: Vec<IpAddress> = ["10.0.0.0", "10.0.0.1", "10.0.0.2", "10.0.0.3"]
            .iter()
            .map(|t| IpAddress::parse(t).unwrap())
            .collect();
        let collapsed = collapse_address_list(&addresses).unwrap();
        assert_eq!(texts(&collapsed), ["10.0.0.0/30"]);
    }
}
