//! Error taxonomy for address and network parsing.
//!
//! Every fallible operation in this crate reports one of the variants
//! below. The `Display` output is a stable part of the API; callers match
//! on the exact sentences, so the wording never changes between releases.
//! Offending input embedded in a message has already been passed through
//! [`crate::unicode::escape_non_ascii`].

use thiserror::Error;

/// Parse and network-algebra errors.
///
/// Variants carrying an `address` field embed the full original input text;
/// `octet`/`part` indexes are zero-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("address cannot be empty")]
    EmptyAddress,

    #[error("empty mask in address {address}")]
    EmptyNetmask { address: String },

    #[error("is not a valid netmask in address {address}")]
    InvalidNetmask { address: String },

    #[error("netmask pattern mixes zeroes & ones in address {address}")]
    NetmaskPatternMixesZeroesAndOnes { address: String },

    #[error("has host bits set in address {address}")]
    HasHostBitsSet { address: String },

    #[error("only one '/' permitted in address {address}")]
    OnlyOneSlashPermitted { address: String },

    #[error("empty octet {octet} in address {address}")]
    EmptyOctet { octet: usize, address: String },

    #[error("expected 4 octets in {address}")]
    Expected4Octets { address: String },

    #[error("leading zeros are not permitted in octet {octet} of address {address}")]
    LeadingZerosNotPermitted { octet: usize, address: String },

    #[error("in octet {octet} of address {address} more 3 characters")]
    OctetMore3Characters { octet: usize, address: String },

    #[error("in octet {octet} of address {address} has invalid symbol")]
    OctetHasInvalidSymbol { octet: usize, address: String },

    #[error("octet {octet} of address {address} exceeded 255")]
    OctetExceeded255 { octet: usize, address: String },

    #[error("least 3 parts in address {address}")]
    Least3Parts { address: String },

    #[error("most 8 colons permitted in address {address}")]
    Most8ColonsPermitted { address: String },

    #[error("in part {part} of address {address} more 4 characters")]
    PartIsMore4Chars { part: usize, address: String },

    #[error("in part {part} of address {address} has invalid symbols")]
    PartHasInvalidSymbol { part: usize, address: String },

    #[error("at most one '::' permitted in address {address}")]
    MostOneDoubleColonPermitted { address: String },

    #[error("at leading ':' only permitted as part of '::' in address {address}")]
    LeadingColonOnlyPermittedAsPartOfDoubleColon { address: String },

    #[error("at trailing ':' only permitted as part of '::' in address {address}")]
    TrailingColonOnlyPermittedAsPartOfDoubleColon { address: String },

    #[error("expected at most 7 other parts with '::' in address {address}")]
    ExpectedAtMost7OtherPartsWithDoubleColon { address: String },

    #[error("exactly 8 parts expected without '::' in address {address}")]
    Exactly8PartsExpectedWithoutDoubleColon { address: String },

    #[error("scope id is too long in address {address}")]
    ScopeIdIsTooLong { address: String },

    #[error("invalid scope id in address {address}")]
    InvalidScopeId { address: String },

    #[error("invalid prefixlen_diff")]
    InvalidPrefixlenDiff,

    #[error("new prefix must be shorter")]
    NewPrefixMustBeShorter,

    #[error("new prefix must be longer")]
    NewPrefixMustBeLonger,

    #[error("cannot set prefixlen_diff and new_prefix")]
    CannotSetPrefixlenDiffAndNewPrefix,

    #[error("network is not a subnet of other")]
    NotContainedNetwork,

    #[error("versions don't match")]
    InvalidVersion,

    #[error("last address must be greater than first")]
    LastAddressMustBeGreaterThanFirst,

    /// A well-formed Unicode scalar with no printable-ASCII representation.
    #[error("unexpected next unicode symbol {{U+{symbol:04x}}} in string {string}")]
    UnexpectedSymbol { symbol: u32, string: String },

    /// Broken encoding: truncated multi-byte sequence, bad continuation
    /// byte, or a lone UTF-16 surrogate. Distinct from [`Self::UnexpectedSymbol`],
    /// which is reserved for scalars that decoded cleanly.
    #[error("malformed unicode sequence in string {string}")]
    MalformedUnicodeSequence { string: String },
}
