//! Ordered address and subnet sequences.
//!
//! [`hosts()`](crate::Ipv4Network::hosts) and
//! [`subnets()`](crate::Ipv4Network::subnets) return value types over a
//! known, finite range: they support counting, indexed random access and
//! double-ended iteration, and can be re-iterated any number of times.

use crate::models::network::{Ipv4Network, Ipv6Network};
use crate::models::{Ipv4Address, Ipv6Address};
use crate::uint128::Uint128;

/// Usable host addresses of an IPv4 network, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Hosts {
    pub(crate) first: u32,
    pub(crate) last: u32,
}

impl Ipv4Hosts {
    /// Number of host addresses in the sequence.
    pub fn count(&self) -> u64 {
        u64::from(self.last) - u64::from(self.first) + 1
    }

    /// Random access by position.
    pub fn get(&self, index: u64) -> Option<Ipv4Address> {
        if index < self.count() {
            Some(Ipv4Address::from_uint(self.first + index as u32))
        } else {
            None
        }
    }

    pub fn iter(&self) -> Ipv4HostsIter {
        Ipv4HostsIter {
            front: self.first,
            back: self.last,
            exhausted: false,
        }
    }
}

impl IntoIterator for Ipv4Hosts {
    type Item = Ipv4Address;
    type IntoIter = Ipv4HostsIter;

    fn into_iter(self) -> Ipv4HostsIter {
        self.iter()
    }
}

impl IntoIterator for &Ipv4Hosts {
    type Item = Ipv4Address;
    type IntoIter = Ipv4HostsIter;

    fn into_iter(self) -> Ipv4HostsIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct Ipv4HostsIter {
    front: u32,
    back: u32,
    exhausted: bool,
}

impl Iterator for Ipv4HostsIter {
    type Item = Ipv4Address;

    fn next(&mut self) -> Option<Ipv4Address> {
        if self.exhausted {
            return None;
        }
        let item = Ipv4Address::from_uint(self.front);
        if self.front == self.back {
            self.exhausted = true;
        } else {
            self.front += 1;
        }
        Some(item)
    }
}

impl DoubleEndedIterator for Ipv4HostsIter {
    fn next_back(&mut self) -> Option<Ipv4Address> {
        if self.exhausted {
            return None;
        }
        let item = Ipv4Address::from_uint(self.back);
        if self.front == self.back {
            self.exhausted = true;
        } else {
            self.back -= 1;
        }
        Some(item)
    }
}

/// Host addresses of an IPv6 network, in ascending order. Every address of
/// the network is a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv6Hosts {
    pub(crate) first: Uint128,
    pub(crate) last: Uint128,
}

impl Ipv6Hosts {
    /// Number of host addresses. For `::/0` the true count does not fit
    /// 128 bits and wraps to zero.
    pub fn count(&self) -> Uint128 {
        self.last.wrapping_sub(self.first).wrapping_add(Uint128::ONE)
    }

    pub fn get(&self, index: Uint128) -> Option<Ipv6Address> {
        if index <= self.last.wrapping_sub(self.first) {
            Some(Ipv6Address::from_uint(self.first.wrapping_add(index)))
        } else {
            None
        }
    }

    pub fn iter(&self) -> Ipv6HostsIter {
        Ipv6HostsIter {
            front: self.first,
            back: self.last,
            exhausted: false,
        }
    }
}

impl IntoIterator for Ipv6Hosts {
    type Item = Ipv6Address;
    type IntoIter = Ipv6HostsIter;

    fn into_iter(self) -> Ipv6HostsIter {
        self.iter()
    }
}

impl IntoIterator for &Ipv6Hosts {
    type Item = Ipv6Address;
    type IntoIter = Ipv6HostsIter;

    fn into_iter(self) -> Ipv6HostsIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct Ipv6HostsIter {
    front: Uint128,
    back: Uint128,
    exhausted: bool,
}

impl Iterator for Ipv6HostsIter {
    type Item = Ipv6Address;

    fn next(&mut self) -> Option<Ipv6Address> {
        if self.exhausted {
            return None;
        }
        let item = Ipv6Address::from_uint(self.front);
        if self.front == self.back {
            self.exhausted = true;
        } else {
            self.front = self.front.wrapping_add(Uint128::ONE);
        }
        Some(item)
    }
}

impl DoubleEndedIterator for Ipv6HostsIter {
    fn next_back(&mut self) -> Option<Ipv6Address> {
        if self.exhausted {
            return None;
        }
        let item = Ipv6Address::from_uint(self.back);
        if self.front == self.back {
            self.exhausted = true;
        } else {
            self.back = self.back.wrapping_sub(Uint128::ONE);
        }
        Some(item)
    }
}

/// Subnets of a fixed new prefix length tiling an IPv4 network, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Subnets {
    pub(crate) base: u32,
    pub(crate) last_base: u32,
    pub(crate) step: u64,
    pub(crate) new_prefixlen: u32,
}

impl Ipv4Subnets {
    pub fn count(&self) -> u64 {
        (u64::from(self.last_base) - u64::from(self.base)) / self.step + 1
    }

    pub fn get(&self, index: u64) -> Option<Ipv4Network> {
        if index < self.count() {
            let address = u64::from(self.base) + index * self.step;
            Some(Ipv4Network::new_unchecked(
                Ipv4Address::from_uint(address as u32),
                self.new_prefixlen,
            ))
        } else {
            None
        }
    }

    pub fn iter(&self) -> Ipv4SubnetsIter {
        Ipv4SubnetsIter {
            front: self.base,
            back: self.last_base,
            step: self.step,
            new_prefixlen: self.new_prefixlen,
            exhausted: false,
        }
    }
}

impl IntoIterator for Ipv4Subnets {
    type Item = Ipv4Network;
    type IntoIter = Ipv4SubnetsIter;

    fn into_iter(self) -> Ipv4SubnetsIter {
        self.iter()
    }
}

impl IntoIterator for &Ipv4Subnets {
    type Item = Ipv4Network;
    type IntoIter = Ipv4SubnetsIter;

    fn into_iter(self) -> Ipv4SubnetsIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct Ipv4SubnetsIter {
    front: u32,
    back: u32,
    step: u64,
    new_prefixlen: u32,
    exhausted: bool,
}

impl Iterator for Ipv4SubnetsIter {
    type Item = Ipv4Network;

    fn next(&mut self) -> Option<Ipv4Network> {
        if self.exhausted {
            return None;
        }
        let item = Ipv4Network::new_unchecked(Ipv4Address::from_uint(self.front), self.new_prefixlen);
        if self.front == self.back {
            self.exhausted = true;
        } else {
            self.front = (u64::from(self.front) + self.step) as u32;
        }
        Some(item)
    }
}

impl DoubleEndedIterator for Ipv4SubnetsIter {
    fn next_back(&mut self) -> Option<Ipv4Network> {
        if self.exhausted {
            return None;
        }
        let item = Ipv4Network::new_unchecked(Ipv4Address::from_uint(self.back), self.new_prefixlen);
        if self.front == self.back {
            self.exhausted = true;
        } else {
            self.back = (u64::from(self.back) - self.step) as u32;
        }
        Some(item)
    }
}

/// Subnets of a fixed new prefix length tiling an IPv6 network, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv6Subnets {
    pub(crate) base: Uint128,
    pub(crate) last_base: Uint128,
    pub(crate) step: Uint128,
    pub(crate) new_prefixlen: u32,
}

impl Ipv6Subnets {
    /// Number of subnets; wraps for the degenerate `::/0` into `/128` split.
    pub fn count(&self) -> Uint128 {
        self.last_base
            .wrapping_sub(self.base)
            .wrapping_div(self.step)
            .wrapping_add(Uint128::ONE)
    }

    pub fn get(&self, index: Uint128) -> Option<Ipv6Network> {
        if index <= self.last_base.wrapping_sub(self.base).wrapping_div(self.step) {
            let address = self.base.wrapping_add(index.wrapping_mul(self.step));
            Some(Ipv6Network::new_unchecked(
                Ipv6Address::from_uint(address),
                self.new_prefixlen,
            ))
        } else {
            None
        }
    }

    pub fn iter(&self) -> Ipv6SubnetsIter {
        Ipv6SubnetsIter {
            front: self.base,
            back: self.last_base,
            step: self.step,
            new_prefixlen: self.new_prefixlen,
            exhausted: false,
        }
    }
}

impl IntoIterator for Ipv6Subnets {
    type Item = Ipv6Network;
    type IntoIter = Ipv6SubnetsIter;

    fn into_iter(self) -> Ipv6SubnetsIter {
        self.iter()
    }
}

impl IntoIterator for &Ipv6Subnets {
    type Item = Ipv6Network;
    type IntoIter = Ipv6SubnetsIter;

    fn into_iter(self) -> Ipv6SubnetsIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct Ipv6SubnetsIter {
    front: Uint128,
    back: Uint128,
    step: Uint128,
    new_prefixlen: u32,
    exhausted: bool,
}

impl Iterator for Ipv6SubnetsIter {
    type Item = Ipv6Network;

    fn next(&mut self) -> Option<Ipv6Network> {
        if self.exhausted {
            return None;
        }
        let item =
            Ipv6Network::new_unchecked(Ipv6Address::from_uint(self.front), self.new_prefixlen);
        if self.front == self.back {
            self.exhausted = true;
        } else {
            self.front = self.front.wrapping_add(self.step);
        }
        Some(item)
    }
}

impl DoubleEndedIterator for Ipv6SubnetsIter {
    fn next_back(&mut self) -> Option<Ipv6Network> {
        if self.exhausted {
            return None;
        }
        let item =
            Ipv6Network::new_unchecked(Ipv6Address::from_uint(self.back), self.new_prefixlen);
        if self.front == self.back {
            self.exhausted = true;
        } else {
            self.back = self.back.wrapping_sub(self.step);
        }
        Some(item)
    }
}
