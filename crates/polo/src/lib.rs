//! polo — the POLO codec
//!
//! Prefix Ordered Lookup Offsets (POLO) is a deterministic, type-tagged
//! binary serialization scheme: the same logical value always produces the
//! same bytes, map keys travel in sorted order, and integers use the
//! shortest encoding that round-trips. This crate builds the typed codec
//! on top of [`polo_core`]'s wire primitives —
//!
//! - [`Polorizer`] / [`Depolorizer`]: the encoder and decoder.
//! - [`Document`]: a sorted, string-keyed bag of opaque values.
//! - [`Raw`] / [`Any`]: escape hatches for opaque or type-erased values.
//! - [`Polorizable`] / [`Depolorizable`]: the shape-adaptor trait pair
//!   every typed value goes through, including the container impls in
//!   [`traits`] (`Vec<T>`, `Option<T>`, `BTreeMap<String, T>`, `HashMap`).
//!
//! There is no derive macro in this revision; implement the trait pair by
//! hand for record types, same as the container impls do.

pub mod decoder;
pub mod document;
pub mod encoder;
pub mod error;
pub mod options;
pub mod ordering;
pub mod raw;
pub mod traits;

pub use decoder::Depolorizer;
pub use document::Document;
pub use encoder::Polorizer;
pub use error::{Error, Result};
pub use options::Options;
pub use ordering::KeyOrd;
pub use raw::{Any, Raw};
pub use traits::{Bytes, Depolorizable, Polorizable};

pub use polo_core::WireType;

/// Encodes `value` to its POLO wire bytes, using default [`Options`].
pub fn encode<T: Polorizable + ?Sized>(value: &T) -> Vec<u8> {
    let mut enc = Polorizer::new();
    value.polorize(&mut enc);
    enc.bytes()
}

/// Encodes `value` to its POLO wire bytes with the given [`Options`].
pub fn encode_with_options<T: Polorizable + ?Sized>(value: &T, opts: Options) -> Vec<u8> {
    let mut enc = Polorizer::with_options(opts);
    value.polorize(&mut enc);
    enc.bytes()
}

/// Decodes a `T` from its POLO wire bytes, using default [`Options`].
pub fn decode<T: Depolorizable>(bytes: &[u8]) -> Result<T> {
    let mut dec = Depolorizer::new(bytes)?;
    T::depolorize(&mut dec)
}

/// Decodes a `T` from its POLO wire bytes with the given [`Options`].
pub fn decode_with_options<T: Depolorizable>(bytes: &[u8], opts: Options) -> Result<T> {
    let mut dec = Depolorizer::with_options(bytes, opts)?;
    T::depolorize(&mut dec)
}

/// Convenience re-exports for consumers of this crate.
pub mod prelude {
    pub use crate::{
        decode, encode, Any, Depolorizable, Depolorizer, Document, Error, Options, Polorizable,
        Polorizer, Raw, Result,
    };
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn round_trip_u64(v: u64) {
            let bytes = encode(&v);
            let back: u64 = decode(&bytes).unwrap();
            prop_assert_eq!(back, v);
        }

        #[test]
        fn round_trip_i64(v: i64) {
            let bytes = encode(&v);
            let back: i64 = decode(&bytes).unwrap();
            prop_assert_eq!(back, v);
        }

        #[test]
        fn round_trip_f64_excluding_nan(v in any::<f64>().prop_filter("no NaN", |v| !v.is_nan())) {
            let bytes = encode(&v);
            let back: f64 = decode(&bytes).unwrap();
            prop_assert_eq!(back, v);
        }

        #[test]
        fn round_trip_string(v: String) {
            let bytes = encode(&v);
            let back: String = decode(&bytes).unwrap();
            prop_assert_eq!(back, v);
        }

        #[test]
        fn round_trip_nested_sequence(v: Vec<Vec<String>>) {
            let bytes = encode(&v);
            let back: Vec<Vec<String>> = decode(&bytes).unwrap();
            prop_assert_eq!(back, v);
        }

        #[test]
        fn round_trip_string_keyed_map(v: std::collections::BTreeMap<String, u64>) {
            let bytes = encode(&v);
            let back: std::collections::BTreeMap<String, u64> = decode(&bytes).unwrap();
            prop_assert_eq!(back, v);
        }

        #[test]
        fn re_encode_after_decode_is_byte_identical(v: Vec<u64>) {
            let first = encode(&v);
            let back: Vec<u64> = decode(&first).unwrap();
            let second = encode(&back);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn integer_body_never_has_a_leading_zero_byte(v: u64) {
            let bytes = encode(&v);
            // Atomic POSINT: tag byte then body.
            if bytes.len() > 1 {
                prop_assert_ne!(bytes[1], 0x00);
            }
        }
    }
}
