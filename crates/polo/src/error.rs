//! Typed errors for the `polo` crate (§6).
//!
//! [`polo_core::PoloError`] covers malformed wire bytes (bad varints, a
//! missing LOAD tag, truncated HEAD). This module adds the layer above it:
//! type mismatches between the wire and the requested Rust shape, plus a
//! contextualizing wrapper so a failure deep inside a record decode names
//! the offending field instead of just the offending byte.

use polo_core::{PoloError, WireType};
use thiserror::Error;

/// Everything that can go wrong turning bytes into a typed value, or back.
#[derive(Debug, Error)]
pub enum Error {
    /// A malformed varint, LOAD tag, or HEAD entry.
    #[error(transparent)]
    Wire(#[from] PoloError),

    /// The element's wire type isn't one this target can absorb.
    #[error("unexpected wire type {observed}; expected {expected}")]
    IncompatibleWire {
        observed: WireType,
        expected: &'static str,
    },

    /// The element's wire type matched, but its value didn't fit the target
    /// (an overflowing integer, a non-UTF-8 word, a NaN float, ...).
    #[error("{0}")]
    IncompatibleValue(String),

    /// A decoder was asked for an element it doesn't have.
    #[error("no elements remain to decode")]
    InsufficientWire,

    /// `unpack()` was called on a NULL element.
    #[error("cannot unpack a null value")]
    NullPack,

    /// A failure while decoding one field of a record, recontextualized with
    /// the record/field/type names it was threaded through.
    #[error("{record}.{field} <{ty}>: {source}")]
    Field {
        record: &'static str,
        field: &'static str,
        ty: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Builds an [`Error::IncompatibleValue`] from a formatted message.
    pub fn incompatible_value(msg: impl Into<String>) -> Self {
        Self::IncompatibleValue(msg.into())
    }

    /// Wraps `self` with the record/field/type context it was decoded under.
    #[must_use]
    pub fn in_field(self, record: &'static str, field: &'static str, ty: &'static str) -> Self {
        Self::Field {
            record,
            field,
            ty,
            source: Box::new(self),
        }
    }
}

/// Threads a field decode's result through [`Error::in_field`] on failure.
///
/// Manual `Depolorizable` impls for record types use this to name which
/// field broke:
///
/// ```ignore
/// let cost: u32 = field("Fruit", "Cost", "u32", dec.read_u32())?;
/// ```
pub fn field<T>(
    record: &'static str,
    field_name: &'static str,
    ty: &'static str,
    result: Result<T>,
) -> Result<T> {
    result.map_err(|e| e.in_field(record, field_name, ty))
}

/// The crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_wrapping_preserves_source_message() {
        let base: Result<u32> = Err(Error::incompatible_value("posint body of 5 bytes exceeds u32"));
        let wrapped = field("Fruit", "Cost", "u32", base).unwrap_err();
        let msg = wrapped.to_string();
        assert!(msg.contains("Fruit.Cost"));
        assert!(msg.contains("u32"));
        assert!(msg.contains("posint body of 5 bytes exceeds u32"));
    }

    #[test]
    fn wire_error_converts_via_from() {
        let e: Error = PoloError::VarintOverflow.into();
        assert!(matches!(e, Error::Wire(PoloError::VarintOverflow)));
    }
}
