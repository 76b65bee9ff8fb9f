//! [`Document`]: a sorted, string-keyed bag of raw values (§4.7).
//!
//! A document is POLO's schemaless compound: children alternate a WORD key
//! and a RAW value, always in ascending key order, so two documents with
//! the same keys and values always produce byte-identical wire regardless
//! of insertion order. That's just the [`Polorizable`] impl for
//! `BTreeMap<String, Raw>` — `Document` exists as a named type so callers
//! get typed `get`/`set` instead of juggling `Raw` by hand.

use std::collections::BTreeMap;

use polo_core::{Element, WireType};

use crate::{
    decoder::Depolorizer,
    encoder::Polorizer,
    error::{Error, Result},
    options::Options,
    raw::Raw,
    traits::{Depolorizable, Polorizable},
};

/// A sorted string-keyed map of opaque values, wire-compatible with any
/// other document sharing its keys and values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    fields: BTreeMap<String, Raw>,
}

impl Document {
    /// An empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of key/value pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` if this document has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The raw fragment stored under `key`, if present.
    #[must_use]
    pub fn get_raw(&self, key: &str) -> Option<&Raw> {
        self.fields.get(key)
    }

    /// Stores a raw fragment under `key`, overwriting any existing value.
    pub fn set_raw(&mut self, key: impl Into<String>, value: Raw) {
        self.fields.insert(key.into(), value);
    }

    /// Decodes the value under `key` as `T`; a missing key decodes as if
    /// a NULL element were present (so `T`'s NULL-absorption zero value).
    pub fn get<T: Depolorizable>(&self, key: &str) -> Result<T> {
        match self.fields.get(key) {
            Some(raw) => raw.decode(),
            None => {
                let mut dec = Depolorizer::new(&[WireType::NULL.tag()])?;
                T::depolorize(&mut dec)
            }
        }
    }

    /// Encodes `value` and stores it under `key`.
    pub fn set<T: Polorizable + ?Sized>(&mut self, key: impl Into<String>, value: &T) {
        self.fields.insert(key.into(), Raw::encode(value));
    }

    /// Removes the field under `key`, returning its value if present.
    pub fn remove(&mut self, key: &str) -> Option<Raw> {
        self.fields.remove(key)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    /// Key/value pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Raw)> {
        self.fields.iter()
    }

    /// Builds the sub-encoder of interleaved key/value writes used by
    /// [`Polorizer::write_document`]: `BTreeMap` iteration is already
    /// ascending, so no explicit sort step is needed here.
    pub(crate) fn build_encoder(&self, opts: Options) -> Polorizer {
        let mut sub = Polorizer::with_options(opts);
        for (key, value) in &self.fields {
            sub.write_string(key);
            sub.write_raw(value);
        }
        sub
    }

    /// Parses a DOC element's children into a document.
    pub(crate) fn from_element(el: &Element<'_>, _opts: Options) -> Result<Self> {
        let mut reader = el.unpack()?;
        let mut doc = Self::new();
        loop {
            let Some(key_el) = reader.next() else {
                break;
            };
            let key_el = key_el?;
            if key_el.wire != WireType::WORD {
                return Err(Error::IncompatibleWire {
                    observed: key_el.wire,
                    expected: "word (document key)",
                });
            }
            let key = core::str::from_utf8(key_el.data)
                .map_err(|_| Error::incompatible_value("document key is not valid utf-8"))?
                .to_owned();

            let val_el = reader
                .next()
                .ok_or(Error::InsufficientWire)?
                .map_err(Error::from)?;
            if val_el.wire != WireType::RAW {
                return Err(Error::IncompatibleWire {
                    observed: val_el.wire,
                    expected: "raw (document value)",
                });
            }
            doc.fields.insert(key, Raw::from_bytes(val_el.data.to_vec()));
        }
        Ok(doc)
    }

    /// Encodes this document to its wire bytes (`DOC(...)`, or the one-byte
    /// NULL atom if used through the generic [`crate::encode`] path on a
    /// `None`).
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        crate::encode(self)
    }

    /// Decodes a document from its wire bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        crate::decode(bytes)
    }
}

impl Polorizable for Document {
    fn polorize(&self, enc: &mut Polorizer) {
        enc.write_document(self);
    }
}

impl Depolorizable for Document {
    fn depolorize(dec: &mut Depolorizer<'_>) -> Result<Self> {
        dec.read_document()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_matches_canonical_example() {
        let doc = Document::new();
        assert_eq!(doc.to_bytes(), vec![13, 15]);
    }

    #[test]
    fn keys_are_sorted_ascending_regardless_of_insertion_order() {
        let mut doc = Document::new();
        doc.set("cost", &25u64);
        doc.set("Name", &"orange".to_string());
        doc.set("alias", &Vec::<String>::new());

        let keys: Vec<&String> = doc.keys().collect();
        assert_eq!(keys, vec!["Name", "alias", "cost"]);
    }

    #[test]
    fn round_trips_through_bytes() {
        let mut doc = Document::new();
        doc.set("Name", &"orange".to_string());
        doc.set("Cost", &42u64);

        let bytes = doc.to_bytes();
        let back = Document::from_bytes(&bytes).unwrap();
        assert_eq!(back.get::<String>("Name").unwrap(), "orange");
        assert_eq!(back.get::<u64>("Cost").unwrap(), 42);
    }

    #[test]
    fn missing_key_decodes_as_zero_value() {
        let doc = Document::new();
        assert_eq!(doc.get::<u64>("missing").unwrap(), 0);
        assert_eq!(doc.get::<String>("missing").unwrap(), "");
    }

    #[test]
    fn duplicate_set_is_last_write_wins() {
        let mut doc = Document::new();
        doc.set("x", &1u64);
        doc.set("x", &2u64);
        assert_eq!(doc.get::<u64>("x").unwrap(), 2);
        assert_eq!(doc.len(), 1);
    }
}
