//! `Raw` and `Any`: the two "I don't want to be parsed" escape hatches.
//!
//! A [`Raw`] always travels wrapped in an outer RAW tag — this is what
//! [`crate::Document`] uses for its values, so a document can hold children
//! of mixed, self-describing type without the document itself knowing what
//! they are. An [`Any`] carries its own wire type inline instead, and is
//! the typed-read counterpart of "give me whatever element is here."

use polo_core::WireType;

use crate::{
    decoder::Depolorizer,
    encoder::Polorizer,
    error::Result,
    traits::{Depolorizable, Polorizable},
};

/// An opaque, already-tagged wire fragment.
///
/// Encoding a `Raw` emits it behind an outer RAW tag; decoding into one
/// requires the source element's wire type to *be* RAW. A nil raw is the
/// one-byte NULL fragment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Raw(Vec<u8>);

impl Raw {
    /// The nil raw: a single NULL-tagged fragment.
    #[must_use]
    pub fn nil() -> Self {
        Self(vec![WireType::NULL.tag()])
    }

    /// `true` if this raw holds nothing but the nil fragment.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0 == [WireType::NULL.tag()]
    }

    /// Wraps an already-encoded wire fragment (tag byte plus body) as-is.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The fragment's bytes, tag included.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes `self`, returning the fragment's bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Encodes `value` and wraps the result as a raw fragment.
    pub fn encode<T: Polorizable + ?Sized>(value: &T) -> Self {
        Self(crate::encode(value))
    }

    /// Decodes this fragment's bytes as `T`.
    pub fn decode<T: Depolorizable>(&self) -> Result<T> {
        crate::decode(&self.0)
    }
}

impl Polorizable for Raw {
    fn polorize(&self, enc: &mut Polorizer) {
        enc.write_raw(self);
    }
}

impl Depolorizable for Raw {
    fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self> {
        dec.read_raw()
    }
}

/// A single element carried with its own wire type, for values whose shape
/// isn't known ahead of decode time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Any {
    pub wire: WireType,
    pub data: Vec<u8>,
}

impl Any {
    /// The nil `Any`: a NULL element with an empty body.
    #[must_use]
    pub fn nil() -> Self {
        Self {
            wire: WireType::NULL,
            data: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.wire == WireType::NULL
    }
}

impl Polorizable for Any {
    fn polorize(&self, enc: &mut Polorizer) {
        enc.write_any(self);
    }
}

impl Depolorizable for Any {
    fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self> {
        dec.read_any()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nil_raw_round_trips() {
        let r = Raw::nil();
        assert!(r.is_nil());
        assert_eq!(r.as_bytes(), &[0x00]);
    }

    #[test]
    fn raw_encode_decode_round_trip() {
        let r = Raw::encode(&300u64);
        let back: u64 = r.decode().unwrap();
        assert_eq!(back, 300);
    }

    #[test]
    fn nil_any_is_null_wire() {
        let a = Any::nil();
        assert!(a.is_nil());
        assert_eq!(a.wire, WireType::NULL);
    }
}
