//! Low-level errors shared by the varint, wire-type, and buffer primitives.

use core::fmt;

/// Errors surfaced by `polo-core`'s byte-level primitives.
///
/// These map onto the "malformed tag" and "insufficient wire" branches of
/// the taxonomy; the typed encode/decode errors (incompatible wire,
/// incompatible value, ...) live one layer up in `polo::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoloError {
    /// A varint ended before its continuation bit cleared.
    VarintTerminated,
    /// A varint ran past the 10-byte limit, or its 10th byte exceeded `0x01`.
    VarintOverflow,
    /// A compound's body did not start with a LOAD tag.
    MissingLoadTag,
    /// A compound's declared HEAD length ran past the available bytes.
    TruncatedHead,
    /// A HEAD entry's offset fell outside the compound's BODY.
    MalformedHead,
    /// The decoder was asked to read but no bytes/elements remained.
    InsufficientWire,
}

impl fmt::Display for PoloError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VarintTerminated => write!(f, "varint terminated before continuation bit cleared"),
            Self::VarintOverflow => write!(f, "varint overflowed 64 bits"),
            Self::MissingLoadTag => write!(f, "compound wire is missing its LOAD tag"),
            Self::TruncatedHead => write!(f, "compound HEAD is shorter than its declared length"),
            Self::MalformedHead => write!(f, "compound HEAD entry points outside its BODY"),
            Self::InsufficientWire => write!(f, "no elements remain to read"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PoloError {}

/// Result alias for `polo-core`'s fallible operations.
pub type Result<T> = core::result::Result<T, PoloError>;
