//! IPv4 address value type and parser.
//!
//! Provides [`Ipv4Address`], an immutable 4-byte big-endian value with a
//! strict character-by-character parser: four dot-separated decimal
//! octets, one to three digits each, no leading zeros unless the octet is
//! exactly `"0"`.

use std::fmt;
use std::str::FromStr;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AddressError;
use crate::models::{Case, Format};
use crate::unicode;

/// Maximum prefix length for an IPv4 network (32 bits).
pub const IPV4_MAX_PREFIXLEN: u32 = 32;

/// IPv4 address as a 4-byte big-endian array.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ipv4Address {
    octets: [u8; 4],
}

/// Internal parse outcome of the IPv4 grammar, before the offending text is
/// attached. The index is the number of fully stored octets at failure time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum V4Error {
    Empty,
    Expected4Octets,
    EmptyOctet(usize),
    LeadingZeros(usize),
    More3Chars(usize),
    InvalidSymbol(usize),
    Exceeded255(usize),
}

impl V4Error {
    /// Attach the full original input, producing the public error.
    pub(crate) fn into_address_error(self, text: &str) -> AddressError {
        let address = unicode::escape_non_ascii(text);
        match self {
            V4Error::Empty => AddressError::EmptyAddress,
            V4Error::Expected4Octets => AddressError::Expected4Octets { address },
            V4Error::EmptyOctet(octet) => AddressError::EmptyOctet { octet, address },
            V4Error::LeadingZeros(octet) => {
                AddressError::LeadingZerosNotPermitted { octet, address }
            }
            V4Error::More3Chars(octet) => AddressError::OctetMore3Characters { octet, address },
            V4Error::InvalidSymbol(octet) => AddressError::OctetHasInvalidSymbol { octet, address },
            V4Error::Exceeded255(octet) => AddressError::OctetExceeded255 { octet, address },
        }
    }

    /// Variant used for an IPv4 tail embedded in an IPv6 address: the same
    /// octet-level error kinds, reported at the enclosing part index.
    pub(crate) fn into_part_error(self, part: usize, text: &str) -> AddressError {
        let address = unicode::escape_non_ascii(text);
        match self {
            V4Error::Empty => AddressError::EmptyAddress,
            V4Error::Expected4Octets => AddressError::Expected4Octets { address },
            V4Error::EmptyOctet(_) => AddressError::EmptyOctet { octet: part, address },
            V4Error::LeadingZeros(_) => {
                AddressError::LeadingZerosNotPermitted { octet: part, address }
            }
            V4Error::More3Chars(_) => AddressError::OctetMore3Characters { octet: part, address },
            V4Error::InvalidSymbol(_) => {
                AddressError::OctetHasInvalidSymbol { octet: part, address }
            }
            V4Error::Exceeded255(_) => AddressError::OctetExceeded255 { octet: part, address },
        }
    }
}

/// Run the IPv4 state machine over ASCII bytes.
pub(crate) fn ip_from_bytes(bytes: &[u8]) -> Result<[u8; 4], V4Error> {
    if bytes.is_empty() {
        return Err(V4Error::Empty);
    }

    let mut octets = [0u8; 4];
    let mut first_symbol = 0u8;
    let mut digits = 0usize;
    let mut octet = 0u32;
    let mut index = 0usize;

    for &c in bytes {
        if index >= 4 {
            return Err(V4Error::Expected4Octets);
        }
        if c.is_ascii_digit() {
            if digits > 0 && first_symbol == b'0' {
                return Err(V4Error::LeadingZeros(index));
            }
            if digits == 0 {
                first_symbol = c;
            }
            octet = octet * 10 + u32::from(c - b'0');
            digits += 1;
            if digits > 3 {
                return Err(V4Error::More3Chars(index));
            }
        } else if c == b'.' && digits > 0 {
            if octet > 255 {
                return Err(V4Error::Exceeded255(index));
            }
            octets[index] = octet as u8;
            index += 1;
            digits = 0;
            octet = 0;
        } else if c == b'.' {
            return Err(V4Error::EmptyOctet(index));
        } else {
            return Err(V4Error::InvalidSymbol(index));
        }
    }

    if index != 3 {
        return Err(V4Error::Expected4Octets);
    }
    if digits == 0 {
        return Err(V4Error::EmptyOctet(index));
    }
    if octet > 255 {
        return Err(V4Error::Exceeded255(index));
    }
    octets[3] = octet as u8;
    Ok(octets)
}

impl Ipv4Address {
    /// Parse dotted-quad text.
    ///
    /// # Examples
    /// ```
    /// use ipcalc::Ipv4Address;
    /// let ip = Ipv4Address::parse("192.0.2.1").unwrap();
    /// assert_eq!(ip.to_uint(), 0xC0000201);
    /// ```
    pub fn parse(text: &str) -> Result<Ipv4Address, AddressError> {
        let bytes = unicode::ascii_bytes(text)?;
        ip_from_bytes(&bytes)
            .map(Ipv4Address::from)
            .map_err(|e| e.into_address_error(text))
    }

    /// Like [`Ipv4Address::parse`] but panics with the formatted diagnostic.
    ///
    /// For call sites that have already decided the input must be valid.
    pub fn parse_unchecked(text: &str) -> Ipv4Address {
        match Ipv4Address::parse(text) {
            Ok(ip) => ip,
            Err(e) => panic!("{}", e),
        }
    }

    pub const fn from_bytes(octets: [u8; 4]) -> Ipv4Address {
        Ipv4Address { octets }
    }

    pub const fn octets(&self) -> [u8; 4] {
        self.octets
    }

    /// The address as its 32-bit unsigned integer view.
    pub const fn to_uint(&self) -> u32 {
        u32::from_be_bytes(self.octets)
    }

    pub const fn from_uint(value: u32) -> Ipv4Address {
        Ipv4Address {
            octets: value.to_be_bytes(),
        }
    }

    /// Render the address. All three formats produce the same dotted quad;
    /// the parameters exist for API symmetry with [`crate::Ipv6Address`].
    pub fn format(&self, _fmt: Format, _case: Case) -> String {
        self.to_string()
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.octets[0], self.octets[1], self.octets[2], self.octets[3]
        )
    }
}

impl FromStr for Ipv4Address {
    type Err = AddressError;

    fn from_str(text: &str) -> Result<Ipv4Address, AddressError> {
        Ipv4Address::parse(text)
    }
}

impl From<[u8; 4]> for Ipv4Address {
    fn from(octets: [u8; 4]) -> Ipv4Address {
        Ipv4Address { octets }
    }
}

impl From<u32> for Ipv4Address {
    fn from(value: u32) -> Ipv4Address {
        Ipv4Address::from_uint(value)
    }
}

impl From<Ipv4Address> for u32 {
    fn from(ip: Ipv4Address) -> u32 {
        ip.to_uint()
    }
}

impl Serialize for Ipv4Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ipv4Address {
    fn deserialize<D>(deserializer: D) -> Result<Ipv4Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ipv4Address::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(
            Ipv4Address::parse("127.0.0.1").unwrap().octets(),
            [127, 0, 0, 1]
        );
        assert_eq!(Ipv4Address::parse("0.0.0.0").unwrap().to_uint(), 0);
        assert_eq!(
            Ipv4Address::parse("255.255.255.255").unwrap().to_uint(),
            u32::MAX
        );
        assert_eq!(
            Ipv4Address::parse("192.0.2.1").unwrap(),
            Ipv4Address::from_uint(0xC0000201)
        );
        // single zero octets are fine, only padded zeros are rejected
        assert_eq!(
            Ipv4Address::parse("0.10.200.3").unwrap().octets(),
            [0, 10, 200, 3]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Ipv4Address::parse("").unwrap_err(), AddressError::EmptyAddress);
        assert_eq!(
            Ipv4Address::parse("127").unwrap_err(),
            AddressError::Expected4Octets {
                address: "127".to_string()
            }
        );
        assert_eq!(
            Ipv4Address::parse("1.2.3.4.5").unwrap_err(),
            AddressError::Expected4Octets {
                address: "1.2.3.4.5".to_string()
            }
        );
        assert_eq!(
            Ipv4Address::parse("127.0.0.").unwrap_err(),
            AddressError::EmptyOctet {
                octet: 3,
                address: "127.0.0.".to_string()
            }
        );
        assert_eq!(
            Ipv4Address::parse("127..0.1").unwrap_err(),
            AddressError::EmptyOctet {
                octet: 1,
                address: "127..0.1".to_string()
            }
        );
        assert_eq!(
            Ipv4Address::parse("1.2.3.040").unwrap_err(),
            AddressError::LeadingZerosNotPermitted {
                octet: 3,
                address: "1.2.3.040".to_string()
            }
        );
        assert_eq!(
            Ipv4Address::parse("127.0.0.1271").unwrap_err(),
            AddressError::OctetMore3Characters {
                octet: 3,
                address: "127.0.0.1271".to_string()
            }
        );
        assert_eq!(
            Ipv4Address::parse("192.168.0.999").unwrap_err(),
            AddressError::OctetExceeded255 {
                octet: 3,
                address: "192.168.0.999".to_string()
            }
        );
        assert_eq!(
            Ipv4Address::parse("1.2.3.256").unwrap_err(),
            AddressError::OctetExceeded255 {
                octet: 3,
                address: "1.2.3.256".to_string()
            }
        );
        assert_eq!(
            Ipv4Address::parse("1.2x.3.4").unwrap_err(),
            AddressError::OctetHasInvalidSymbol {
                octet: 1,
                address: "1.2x.3.4".to_string()
            }
        );
        assert_eq!(
            Ipv4Address::parse("127.0.0.1/24").unwrap_err(),
            AddressError::OctetHasInvalidSymbol {
                octet: 3,
                address: "127.0.0.1/24".to_string()
            }
        );
    }

    #[test]
    fn test_leading_zero_rule() {
        // "0" is accepted, "00" and "01" are not
        assert!(Ipv4Address::parse("0.0.0.0").is_ok());
        assert_eq!(
            Ipv4Address::parse("00.0.0.0").unwrap_err(),
            AddressError::LeadingZerosNotPermitted {
                octet: 0,
                address: "00.0.0.0".to_string()
            }
        );
        assert_eq!(
            Ipv4Address::parse("192.168.01.1").unwrap_err(),
            AddressError::LeadingZerosNotPermitted {
                octet: 2,
                address: "192.168.01.1".to_string()
            }
        );
    }

    #[test]
    fn test_non_ascii_input() {
        let err = Ipv4Address::parse("12\u{d55c}3").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected next unicode symbol {U+d55c} in string 12{U+d55c}3"
        );
    }

    #[test]
    #[should_panic(expected = "leading zeros are not permitted in octet 3 of address 1.2.3.040")]
    fn test_parse_unchecked_panics_with_diagnostic() {
        Ipv4Address::parse_unchecked("1.2.3.040");
    }

    #[test]
    fn test_roundtrip_and_order() {
        for text in ["0.0.0.0", "127.100.200.254", "255.255.255.255", "10.0.0.1"] {
            let ip = Ipv4Address::parse(text).unwrap();
            assert_eq!(ip.to_string(), text);
            assert_eq!(Ipv4Address::parse(&ip.to_string()).unwrap(), ip);
            assert_eq!(Ipv4Address::from_uint(ip.to_uint()), ip);
        }

        let a = Ipv4Address::parse("10.0.0.1").unwrap();
        let b = Ipv4Address::parse("10.0.0.2").unwrap();
        let c = Ipv4Address::parse("9.255.255.255").unwrap();
        assert!(a < b);
        assert!(c < a);
        assert_eq!(a.cmp(&a), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_serde_roundtrip() {
        let ip = Ipv4Address::parse("192.0.2.33").unwrap();
        let json = serde_json::to_string(&ip).unwrap();
        assert_eq!(json, "\"192.0.2.33\"");
        let back: Ipv4Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ip);
        assert!(serde_json::from_str::<Ipv4Address>("\"1.2.3.999\"").is_err());
    }
}
