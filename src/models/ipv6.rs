//! IPv6 address value type, zone identifiers and parser.
//!
//! Provides [`Ipv6Address`], an immutable 16-byte big-endian value with an
//! optional zone identifier, plus the colon-separated hextet parser: one
//! `::` compression, an optional embedded IPv4 tail in the final part, and
//! a `%zone` suffix validated against a conservative ASCII character set.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AddressError;
use crate::models::ipv4;
use crate::models::{Case, Format, Ipv4Address};
use crate::uint128::Uint128;
use crate::unicode;

/// Maximum prefix length for an IPv6 network (128 bits).
pub const IPV6_MAX_PREFIXLEN: u32 = 128;

/// Maximum length of a zone identifier, counted after the `%`.
pub const IPV6_SCOPE_ID_MAX_LENGTH: usize = 63;

const MIN_PARTS: usize = 3;
const MAX_PARTS: usize = 8;

lazy_static! {
    /// Allowed zone-identifier characters: ASCII letters, digits and the
    /// unreserved punctuation `. _ ~ -`. Notably excludes `%` and `/`.
    static ref SCOPE_ID_RE: Regex = Regex::new(r"^[0-9A-Za-z._~-]+$").expect("valid regex");
}

/// IPv6 zone identifier (the `%suffix` naming an interface or scope).
///
/// Stored as the original token; an all-digit token that is a canonical
/// decimal `u32` additionally carries a cached numeric view. Equality,
/// ordering and hashing use the textual token only, so `%3` and `%03`
/// are distinct zones.
#[derive(Debug, Clone)]
pub struct ScopeId {
    text: String,
    numeric: Option<u32>,
}

impl ScopeId {
    /// Validate and store a zone token. `text` must be non-empty, at most
    /// [`IPV6_SCOPE_ID_MAX_LENGTH`] characters, and drawn from the allowed
    /// set; `context` is the full address text used in diagnostics.
    pub(crate) fn new(text: &str, context: &str) -> Result<ScopeId, AddressError> {
        if text.len() > IPV6_SCOPE_ID_MAX_LENGTH {
            return Err(AddressError::ScopeIdIsTooLong {
                address: unicode::escape_non_ascii(context),
            });
        }
        if text.is_empty() || !SCOPE_ID_RE.is_match(text) {
            return Err(AddressError::InvalidScopeId {
                address: unicode::escape_non_ascii(context),
            });
        }
        let numeric = if text.bytes().all(|b| b.is_ascii_digit()) {
            text.parse::<u32>().ok()
        } else {
            None
        };
        Ok(ScopeId {
            text: text.to_string(),
            numeric,
        })
    }

    /// The textual token, always available.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The numeric view, present when the token is all decimal digits and
    /// fits 32 bits.
    pub fn as_u32(&self) -> Option<u32> {
        self.numeric
    }

    pub fn has_u32(&self) -> bool {
        self.numeric.is_some()
    }
}

impl PartialEq for ScopeId {
    fn eq(&self, other: &ScopeId) -> bool {
        self.text == other.text
    }
}

impl Eq for ScopeId {}

impl PartialOrd for ScopeId {
    fn partial_cmp(&self, other: &ScopeId) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScopeId {
    fn cmp(&self, other: &ScopeId) -> Ordering {
        self.text.cmp(&other.text)
    }
}

impl std::hash::Hash for ScopeId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// IPv6 address: 16 bytes big-endian plus an optional zone identifier.
///
/// Ordering is by the byte payload first, then by zone (no zone sorts
/// before any zone, zones compare as strings). Two addresses with equal
/// bytes but different zone tokens are different values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ipv6Address {
    octets: [u8; 16],
    scope_id: Option<ScopeId>,
}

/// One resolved part of the colon-split address text.
enum Part<'a> {
    Text(&'a str),
    Value(u16),
}

impl Part<'_> {
    fn is_empty(&self) -> bool {
        matches!(self, Part::Text(t) if t.is_empty())
    }
}

/// Parse the address portion (scope already stripped) of `full` text.
fn parse_v6(addr: &str, full: &str) -> Result<[u8; 16], AddressError> {
    let escaped = || unicode::escape_non_ascii(full);

    let raw: Vec<&str> = addr.split(':').collect();
    let n = raw.len();

    // count and length checks over the non-final parts, left to right
    for (i, part) in raw[..n - 1].iter().enumerate() {
        if i >= MAX_PARTS {
            return Err(classify_overflow(&raw, escaped()));
        }
        if part.len() > 4 {
            return Err(AddressError::PartIsMore4Chars {
                part: i,
                address: escaped(),
            });
        }
    }
    if n - 1 >= MAX_PARTS {
        return Err(classify_overflow(&raw, escaped()));
    }

    let mut parts: Vec<Part> = raw[..n - 1].iter().copied().map(Part::Text).collect();

    let last = raw[n - 1];
    if last.len() > 15 {
        return Err(AddressError::PartIsMore4Chars {
            part: n - 1,
            address: escaped(),
        });
    }
    if last.contains('.') {
        // embedded IPv4 tail replaces the final part with two hextets
        if (n - 1) + 1 >= MAX_PARTS {
            return Err(AddressError::Most8ColonsPermitted { address: escaped() });
        }
        let tail = ipv4::ip_from_bytes(last.as_bytes())
            .map_err(|e| e.into_part_error(n - 1, full))?;
        parts.push(Part::Value(u16::from_be_bytes([tail[0], tail[1]])));
        parts.push(Part::Value(u16::from_be_bytes([tail[2], tail[3]])));
    } else {
        if last.len() > 4 {
            return Err(AddressError::PartIsMore4Chars {
                part: n - 1,
                address: escaped(),
            });
        }
        parts.push(Part::Text(last));
    }

    let count = parts.len();
    if count < MIN_PARTS {
        return Err(AddressError::Least3Parts { address: escaped() });
    }

    // locate the compressed run
    let mut skip = None;
    for (i, part) in parts.iter().enumerate().take(count - 1).skip(1) {
        if part.is_empty() {
            if skip.is_some() {
                return Err(AddressError::MostOneDoubleColonPermitted { address: escaped() });
            }
            skip = Some(i);
        }
    }

    let (parts_hi, parts_lo, skipped) = match skip {
        Some(skip) => {
            let mut hi = skip;
            let mut lo = count - skip - 1;
            if parts[0].is_empty() {
                hi -= 1;
                if hi != 0 {
                    return Err(AddressError::LeadingColonOnlyPermittedAsPartOfDoubleColon {
                        address: escaped(),
                    });
                }
            }
            if parts[count - 1].is_empty() {
                lo -= 1;
                if lo != 0 {
                    return Err(AddressError::TrailingColonOnlyPermittedAsPartOfDoubleColon {
                        address: escaped(),
                    });
                }
            }
            (hi, lo, MAX_PARTS - (hi + lo))
        }
        None => {
            if count != MAX_PARTS {
                return Err(AddressError::Exactly8PartsExpectedWithoutDoubleColon {
                    address: escaped(),
                });
            }
            if parts[0].is_empty() {
                return Err(AddressError::LeadingColonOnlyPermittedAsPartOfDoubleColon {
                    address: escaped(),
                });
            }
            if parts[count - 1].is_empty() {
                return Err(AddressError::TrailingColonOnlyPermittedAsPartOfDoubleColon {
                    address: escaped(),
                });
            }
            (MAX_PARTS, 0, 0)
        }
    };

    let mut octets = [0u8; 16];
    let mut index = 0;
    for part in &parts[..parts_hi] {
        let value = parse_hextet(part, count, full)?;
        octets[index] = (value >> 8) as u8;
        octets[index + 1] = (value & 0xFF) as u8;
        index += 2;
    }
    index += skipped * 2;
    for part in &parts[count - parts_lo..] {
        let value = parse_hextet(part, count, full)?;
        octets[index] = (value >> 8) as u8;
        octets[index + 1] = (value & 0xFF) as u8;
        index += 2;
    }
    Ok(octets)
}

/// Classify a text with more than the permitted number of colon-separated
/// parts: a stray leading or trailing colon beats the count errors.
fn classify_overflow(raw: &[&str], address: String) -> AddressError {
    let n = raw.len();
    if raw[0].is_empty() && !raw[1].is_empty() {
        AddressError::LeadingColonOnlyPermittedAsPartOfDoubleColon { address }
    } else if raw[n - 1].is_empty() {
        AddressError::TrailingColonOnlyPermittedAsPartOfDoubleColon { address }
    } else if raw[1..n - 1].iter().any(|p| p.is_empty()) {
        AddressError::ExpectedAtMost7OtherPartsWithDoubleColon { address }
    } else {
        AddressError::Most8ColonsPermitted { address }
    }
}

/// Parse a 1-4 digit hextet. The part index reported on bad symbols is
/// the total part count; callers relying on the diagnostic text expect
/// that, not the failing part's position.
fn parse_hextet(part: &Part, count: usize, full: &str) -> Result<u16, AddressError> {
    match part {
        Part::Value(value) => Ok(*value),
        Part::Text(text) => {
            let mut value: u16 = 0;
            for c in text.bytes() {
                let digit = match c {
                    b'0'..=b'9' => c - b'0',
                    b'A'..=b'F' => c - b'A' + 10,
                    b'a'..=b'f' => c - b'a' + 10,
                    _ => {
                        return Err(AddressError::PartHasInvalidSymbol {
                            part: count,
                            address: unicode::escape_non_ascii(full),
                        })
                    }
                };
                value = (value << 4) | u16::from(digit);
            }
            Ok(value)
        }
    }
}

impl Ipv6Address {
    /// Parse IPv6 text, including any `%zone` suffix.
    ///
    /// # Examples
    /// ```
    /// use ipcalc::Ipv6Address;
    /// let ip = Ipv6Address::parse("2001:db8::1").unwrap();
    /// assert_eq!(ip.to_string(), "2001:db8::1");
    /// ```
    pub fn parse(text: &str) -> Result<Ipv6Address, AddressError> {
        unicode::ascii_bytes(text)?;
        if text.is_empty() {
            return Err(AddressError::EmptyAddress);
        }

        let (addr, scope_id) = match text.split_once('%') {
            Some((addr, scope)) => (addr, Some(ScopeId::new(scope, text)?)),
            None => (text, None),
        };

        let octets = parse_v6(addr, text)?;
        Ok(Ipv6Address { octets, scope_id })
    }

    /// Like [`Ipv6Address::parse`] but panics with the formatted diagnostic.
    pub fn parse_unchecked(text: &str) -> Ipv6Address {
        match Ipv6Address::parse(text) {
            Ok(ip) => ip,
            Err(e) => panic!("{}", e),
        }
    }

    pub const fn from_bytes(octets: [u8; 16]) -> Ipv6Address {
        Ipv6Address {
            octets,
            scope_id: None,
        }
    }

    pub const fn octets(&self) -> [u8; 16] {
        self.octets
    }

    /// The address as its 128-bit unsigned integer view. The zone
    /// identifier does not participate.
    pub fn to_uint(&self) -> Uint128 {
        let upper = u64::from_be_bytes(self.octets[..8].try_into().expect("8 bytes"));
        let lower = u64::from_be_bytes(self.octets[8..].try_into().expect("8 bytes"));
        Uint128::new(upper, lower)
    }

    pub fn from_uint(value: Uint128) -> Ipv6Address {
        let mut octets = [0u8; 16];
        octets[..8].copy_from_slice(&value.upper().to_be_bytes());
        octets[8..].copy_from_slice(&value.lower().to_be_bytes());
        Ipv6Address {
            octets,
            scope_id: None,
        }
    }

    pub fn scope_id(&self) -> Option<&ScopeId> {
        self.scope_id.as_ref()
    }

    /// Replace the zone identifier. An empty string clears it; otherwise
    /// the token is validated like one parsed from text.
    pub fn set_scope_id(&mut self, scope: &str) -> Result<(), AddressError> {
        if scope.is_empty() {
            self.scope_id = None;
            return Ok(());
        }
        let context = self.format(Format::Compressed, Case::Lower);
        self.scope_id = Some(ScopeId::new(scope, &context)?);
        Ok(())
    }

    /// The same address without its zone identifier.
    pub fn without_scope_id(&self) -> Ipv6Address {
        Ipv6Address {
            octets: self.octets,
            scope_id: None,
        }
    }

    /// The embedded IPv4 address of an IPv4-mapped value (`::ffff:a.b.c.d`).
    pub fn ipv4_mapped(&self) -> Option<Ipv4Address> {
        if self.octets[..10].iter().all(|&b| b == 0)
            && self.octets[10] == 0xFF
            && self.octets[11] == 0xFF
        {
            Some(Ipv4Address::from_bytes([
                self.octets[12],
                self.octets[13],
                self.octets[14],
                self.octets[15],
            ]))
        } else {
            None
        }
    }

    fn hextets(&self) -> [u16; 8] {
        let mut groups = [0u16; 8];
        for (i, group) in groups.iter_mut().enumerate() {
            *group = u16::from_be_bytes([self.octets[i * 2], self.octets[i * 2 + 1]]);
        }
        groups
    }

    /// Render the address in the requested format and hex-digit case. The
    /// zone identifier is appended verbatim, unaffected by `case`.
    pub fn format(&self, fmt: Format, case: Case) -> String {
        let groups = self.hextets();
        let body = match fmt {
            Format::Full => groups.iter().map(|g| format!("{:04x}", g)).join(":"),
            Format::Compact => groups.iter().map(|g| format!("{:x}", g)).join(":"),
            Format::Compressed => compress(&groups),
        };
        let body = match case {
            Case::Lower => body,
            Case::Upper => body.to_uppercase(),
        };
        match &self.scope_id {
            Some(scope) => format!("{}%{}", body, scope),
            None => body,
        }
    }
}

/// Compressed rendering: the leftmost longest run of two or more zero
/// groups collapses to `::`.
fn compress(groups: &[u16; 8]) -> String {
    let mut best_start = 0;
    let mut best_len = 0;
    let mut run_start = 0;
    let mut run_len = 0;
    for (i, &group) in groups.iter().enumerate() {
        if group == 0 {
            if run_len == 0 {
                run_start = i;
            }
            run_len += 1;
            if run_len > best_len {
                best_len = run_len;
                best_start = run_start;
            }
        } else {
            run_len = 0;
        }
    }

    if best_len < 2 {
        return groups.iter().map(|g| format!("{:x}", g)).join(":");
    }
    let left = groups[..best_start].iter().map(|g| format!("{:x}", g)).join(":");
    let right = groups[best_start + best_len..]
        .iter()
        .map(|g| format!("{:x}", g))
        .join(":");
    format!("{}::{}", left, right)
}

impl fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.format(Format::Compressed, Case::Lower))
    }
}

impl FromStr for Ipv6Address {
    type Err = AddressError;

    fn from_str(text: &str) -> Result<Ipv6Address, AddressError> {
        Ipv6Address::parse(text)
    }
}

impl From<[u8; 16]> for Ipv6Address {
    fn from(octets: [u8; 16]) -> Ipv6Address {
        Ipv6Address::from_bytes(octets)
    }
}

impl From<Uint128> for Ipv6Address {
    fn from(value: Uint128) -> Ipv6Address {
        Ipv6Address::from_uint(value)
    }
}

impl From<Ipv6Address> for Uint128 {
    fn from(ip: Ipv6Address) -> Uint128 {
        ip.to_uint()
    }
}

impl Serialize for Ipv6Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ipv6Address {
    fn deserialize<D>(deserializer: D) -> Result<Ipv6Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ipv6Address::parse(&s).map_err(de::Error::custom)
    }
}
