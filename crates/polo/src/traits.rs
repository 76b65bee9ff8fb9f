//! [`Polorizable`]/[`Depolorizable`]: the shape-adaptor trait pair (§4.9),
//! plus the primitive and container impls built on top of them.
//!
//! There is no derive macro in this revision (see `SPEC_FULL.md` §1):
//! record types implement these traits by hand, writing/reading one field
//! at a time through a [`Polorizer`]/[`Depolorizer`], same as every
//! container impl below does.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

#[cfg(feature = "bigint")]
use num_bigint::{BigInt, BigUint};

use crate::{
    decoder::Depolorizer, document::Document, encoder::Polorizer, error::Result, ordering::KeyOrd,
};

/// A type that knows how to write itself into a [`Polorizer`].
///
/// Exactly one `write_*`/`write_packed`/`write_document` call should
/// happen per `polorize`, so the containing encoder's atomic/compound
/// collapse logic sees one element per value, not a fragment of one.
pub trait Polorizable {
    fn polorize(&self, enc: &mut Polorizer);
}

/// A type that knows how to read itself out of a [`Depolorizer`].
pub trait Depolorizable: Sized {
    fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self>;
}

macro_rules! impl_uint {
    ($($t:ty => $read:ident),* $(,)?) => {
        $(
            impl Polorizable for $t {
                fn polorize(&self, enc: &mut Polorizer) {
                    enc.write_uint(u64::from(*self));
                }
            }
            impl Depolorizable for $t {
                fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self> {
                    dec.$read()
                }
            }
        )*
    };
}

macro_rules! impl_int {
    ($($t:ty => $read:ident),* $(,)?) => {
        $(
            impl Polorizable for $t {
                fn polorize(&self, enc: &mut Polorizer) {
                    enc.write_int(i64::from(*self));
                }
            }
            impl Depolorizable for $t {
                fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self> {
                    dec.$read()
                }
            }
        )*
    };
}

impl_uint!(u8 => read_u8, u16 => read_u16, u32 => read_u32);
impl_int!(i8 => read_i8, i16 => read_i16, i32 => read_i32);

impl Polorizable for u64 {
    fn polorize(&self, enc: &mut Polorizer) {
        enc.write_uint(*self);
    }
}
impl Depolorizable for u64 {
    fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self> {
        dec.read_u64()
    }
}

impl Polorizable for i64 {
    fn polorize(&self, enc: &mut Polorizer) {
        enc.write_int(*self);
    }
}
impl Depolorizable for i64 {
    fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self> {
        dec.read_i64()
    }
}

impl Polorizable for bool {
    fn polorize(&self, enc: &mut Polorizer) {
        enc.write_bool(*self);
    }
}
impl Depolorizable for bool {
    fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self> {
        dec.read_bool()
    }
}

impl Polorizable for f32 {
    fn polorize(&self, enc: &mut Polorizer) {
        enc.write_f32(*self);
    }
}
impl Depolorizable for f32 {
    fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self> {
        dec.read_f32()
    }
}

impl Polorizable for f64 {
    fn polorize(&self, enc: &mut Polorizer) {
        enc.write_f64(*self);
    }
}
impl Depolorizable for f64 {
    fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self> {
        dec.read_f64()
    }
}

impl Polorizable for str {
    fn polorize(&self, enc: &mut Polorizer) {
        enc.write_string(self);
    }
}

impl Polorizable for String {
    fn polorize(&self, enc: &mut Polorizer) {
        enc.write_string(self);
    }
}
impl Depolorizable for String {
    fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self> {
        dec.read_string()
    }
}

#[cfg(feature = "bigint")]
impl Polorizable for BigInt {
    fn polorize(&self, enc: &mut Polorizer) {
        enc.write_bigint(self);
    }
}
#[cfg(feature = "bigint")]
impl Depolorizable for BigInt {
    fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self> {
        dec.read_bigint()
    }
}

#[cfg(feature = "bigint")]
impl Polorizable for BigUint {
    fn polorize(&self, enc: &mut Polorizer) {
        enc.write_biguint(self);
    }
}
#[cfg(feature = "bigint")]
impl Depolorizable for BigUint {
    fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self> {
        dec.read_biguint()
    }
}

/// Wraps a byte vector so it's written as a byte sequence (WORD, or
/// PACK-of-POSINT under [`crate::Options::packed_bytes`]) rather than via
/// the blanket `Vec<T>` impl, which would write a `u8` sequence as a PACK
/// of individually-tagged POSINT elements. Rust has no specialization to
/// pick between the two automatically; this mirrors how `serde` needs
/// `serde_bytes` for the same reason.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bytes(pub Vec<u8>);

impl Polorizable for Bytes {
    fn polorize(&self, enc: &mut Polorizer) {
        enc.write_bytes(&self.0);
    }
}
impl Depolorizable for Bytes {
    fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self> {
        Ok(Self(dec.read_bytes()?))
    }
}

impl<T: Polorizable> Polorizable for Option<T> {
    fn polorize(&self, enc: &mut Polorizer) {
        match self {
            None => enc.write_null(),
            Some(v) => v.polorize(enc),
        }
    }
}
impl<T: Depolorizable> Depolorizable for Option<T> {
    fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self> {
        if dec.peek_wire() == Some(polo_core::WireType::NULL) {
            dec.read_null()?;
            return Ok(None);
        }
        Ok(Some(T::depolorize(dec)?))
    }
}

/// A nil list (`None`-like absence) emits NULL; an empty list emits an
/// empty PACK (`[0x0E, 0x0F]`) — these are distinct wire values, and only
/// the latter is what `Vec::new()` produces.
impl<T: Polorizable> Polorizable for Vec<T> {
    fn polorize(&self, enc: &mut Polorizer) {
        let mut sub = Polorizer::with_options(enc.options());
        for item in self {
            item.polorize(&mut sub);
        }
        enc.write_packed(&sub);
    }
}
impl<T: Depolorizable> Depolorizable for Vec<T> {
    fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self> {
        if dec.peek_wire() == Some(polo_core::WireType::NULL) {
            dec.read_null()?;
            return Ok(Vec::new());
        }
        let mut sub = dec.unpack()?;
        let mut out = Vec::new();
        while !sub.done() {
            out.push(T::depolorize(&mut sub)?);
        }
        Ok(out)
    }
}

/// String-keyed maps: PACK of interleaved sorted key/value pairs by
/// default, or (with [`crate::Options::doc_maps`]) a real [`Document`]
/// whose values are each independently re-encoded.
impl<T: Polorizable> Polorizable for BTreeMap<String, T> {
    fn polorize(&self, enc: &mut Polorizer) {
        if enc.options().doc_maps {
            let mut doc = Document::new();
            for (key, value) in self {
                doc.set(key.clone(), value);
            }
            enc.write_document(&doc);
        } else {
            let mut sub = Polorizer::with_options(enc.options());
            for (key, value) in self {
                key.polorize(&mut sub);
                value.polorize(&mut sub);
            }
            enc.write_packed(&sub);
        }
    }
}
impl<T: Depolorizable> Depolorizable for BTreeMap<String, T> {
    fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self> {
        match dec.peek_wire() {
            Some(polo_core::WireType::NULL) => {
                dec.read_null()?;
                Ok(Self::new())
            }
            Some(polo_core::WireType::DOC) => {
                let doc = dec.read_document()?;
                let mut out = Self::new();
                for (key, raw) in doc.iter() {
                    out.insert(key.clone(), raw.decode()?);
                }
                Ok(out)
            }
            _ => {
                let mut sub = dec.unpack()?;
                let mut out = Self::new();
                while !sub.done() {
                    let key = String::depolorize(&mut sub)?;
                    let value = T::depolorize(&mut sub)?;
                    out.insert(key, value);
                }
                Ok(out)
            }
        }
    }
}

/// General (non-string-keyed) maps: always a PACK of interleaved sorted
/// key/value pairs. [`KeyOrd`] provides the sort since `HashMap` has no
/// natural iteration order of its own.
impl<K: Polorizable + KeyOrd, V: Polorizable> Polorizable for HashMap<K, V> {
    fn polorize(&self, enc: &mut Polorizer) {
        let mut entries: Vec<(&K, &V)> = self.iter().collect();
        entries.sort_by(|a, b| a.0.key_cmp(b.0));
        let mut sub = Polorizer::with_options(enc.options());
        for (key, value) in entries {
            key.polorize(&mut sub);
            value.polorize(&mut sub);
        }
        enc.write_packed(&sub);
    }
}
impl<K: Depolorizable + Eq + Hash, V: Depolorizable> Depolorizable for HashMap<K, V> {
    fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self> {
        if dec.peek_wire() == Some(polo_core::WireType::NULL) {
            dec.read_null()?;
            return Ok(Self::new());
        }
        let mut sub = dec.unpack()?;
        let mut out = Self::new();
        while !sub.done() {
            let key = K::depolorize(&mut sub)?;
            let value = V::depolorize(&mut sub)?;
            out.insert(key, value);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn vec_of_strings_matches_canonical_example() {
        let v = vec!["foo".to_string(), "bar".to_string()];
        let bytes = crate::encode(&v);
        assert_eq!(bytes, vec![14, 47, 6, 54, b'f', b'o', b'o', b'b', b'a', b'r']);
    }

    #[test]
    fn option_none_is_null() {
        let v: Option<u64> = None;
        assert_eq!(crate::encode(&v), vec![0x00]);
    }

    #[test]
    fn nil_vs_empty_vec_are_distinct_wire_values() {
        let empty: Vec<u64> = Vec::new();
        let nil: Option<Vec<u64>> = None;
        assert_eq!(crate::encode(&empty), vec![14, 15]);
        assert_eq!(crate::encode(&nil), vec![0x00]);
    }

    #[test]
    fn round_trips_btreemap_of_strings() {
        let mut m = BTreeMap::new();
        m.insert("b".to_string(), 2u64);
        m.insert("a".to_string(), 1u64);
        let bytes = crate::encode(&m);
        let back: BTreeMap<String, u64> = crate::decode(&bytes).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn hashmap_emits_sorted_keys_deterministically() {
        let mut m = HashMap::new();
        m.insert(3u64, "c");
        m.insert(1u64, "a");
        m.insert(2u64, "b");
        let a = crate::encode(&m);
        let b = crate::encode(&m);
        assert_eq!(a, b);

        let back: HashMap<u64, String> =
            crate::decode(&a).unwrap();
        assert_eq!(back.get(&1), Some(&"a".to_string()));
    }

    #[test]
    fn bytes_wrapper_round_trips_as_word() {
        let b = Bytes(vec![1, 2, 3]);
        let bytes = crate::encode(&b);
        assert_eq!(bytes[0], polo_core::WireType::WORD.tag());
        let back: Bytes = crate::decode(&bytes).unwrap();
        assert_eq!(back, b);
    }

    #[cfg(feature = "bigint")]
    #[test]
    fn biguint_zero_has_empty_body() {
        let v = BigUint::from(0u8);
        let bytes = crate::encode(&v);
        assert_eq!(bytes, vec![polo_core::WireType::POSINT.tag()]);
        let back: BigUint = crate::decode(&bytes).unwrap();
        assert_eq!(back, v);
    }

    #[cfg(feature = "bigint")]
    #[test]
    fn biguint_round_trips_beyond_u64_range() {
        let v = BigUint::from(u64::MAX) * BigUint::from(3u8);
        let bytes = crate::encode(&v);
        let back: BigUint = crate::decode(&bytes).unwrap();
        assert_eq!(back, v);
    }

    #[cfg(feature = "bigint")]
    #[test]
    fn biguint_rejects_negint() {
        let mut enc = Polorizer::new();
        enc.write_int(-5);
        let bytes = enc.bytes();
        let back: Result<BigUint> = crate::decode(&bytes);
        assert!(back.is_err());
    }
}
