//! The encoder: [`Polorizer`] (§4.5).
//!
//! A `Polorizer` accumulates typed writes into a [`polo_core::WriteBuffer`].
//! `bytes()` then collapses that buffer per the atomic/compound rule: zero
//! writes becomes the one-byte NULL atom, exactly one write is inlined
//! as-is (already a complete atomic or LOAD-framed wire), and two or more
//! writes are wrapped behind an outer PACK tag.

use polo_core::{WireType, WriteBuffer};

#[cfg(feature = "bigint")]
use num_bigint::{BigInt, BigUint, Sign};

use crate::{document::Document, options::Options, raw::Any, raw::Raw};

/// Accumulates one value's worth of typed writes.
///
/// Each `write_*` call appends exactly one element. A value that's
/// naturally a sequence (a record's fields, a list's items, a map's sorted
/// key/value pairs) should be written into its own sub-`Polorizer` and then
/// folded into the parent with [`Polorizer::write_packed`] or
/// [`Polorizer::write_document`], which always emit a compound regardless
/// of how many elements the sub-encoder holds.
#[derive(Debug, Clone)]
pub struct Polorizer {
    buf: WriteBuffer,
    opts: Options,
}

impl Default for Polorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Polorizer {
    /// A fresh encoder with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// A fresh encoder with the given options, inherited by every
    /// sub-encoder it spawns.
    #[must_use]
    pub fn with_options(opts: Options) -> Self {
        Self {
            buf: WriteBuffer::new(),
            opts,
        }
    }

    /// The options this encoder (and anything it spawns) was built with.
    #[must_use]
    pub fn options(&self) -> Options {
        self.opts
    }

    pub(crate) fn load_bytes(&self) -> Vec<u8> {
        self.buf.load()
    }

    /// Writes a NULL element.
    pub fn write_null(&mut self) {
        self.buf.write(WireType::NULL, &[]);
    }

    /// Writes a TRUE/FALSE element.
    pub fn write_bool(&mut self, v: bool) {
        self.buf.write(if v { WireType::TRUE } else { WireType::FALSE }, &[]);
    }

    /// Writes a WORD element holding `v`'s UTF-8 bytes.
    pub fn write_string(&mut self, v: &str) {
        self.buf.write(WireType::WORD, v.as_bytes());
    }

    /// Writes a byte sequence: a WORD by default, or (with
    /// [`Options::packed_bytes`]) a PACK of single-byte POSINTs.
    pub fn write_bytes(&mut self, v: &[u8]) {
        if self.opts.packed_bytes {
            let mut sub = Self::with_options(self.opts);
            for byte in v {
                sub.write_uint(u64::from(*byte));
            }
            self.write_packed(&sub);
        } else {
            self.buf.write(WireType::WORD, v);
        }
    }

    /// Writes an unsigned integer as a minimal-width POSINT (zero becomes
    /// an empty body).
    pub fn write_uint(&mut self, v: u64) {
        self.buf.write(WireType::POSINT, &minimal_be_bytes(v));
    }

    /// Writes a signed integer: non-negative values as POSINT, negative
    /// values as NEGINT holding the magnitude (so `i64::MIN`'s magnitude,
    /// `1u64 << 63`, still fits).
    pub fn write_int(&mut self, v: i64) {
        if v >= 0 {
            self.write_uint(v as u64);
        } else {
            self.buf.write(WireType::NEGINT, &minimal_be_bytes(v.unsigned_abs()));
        }
    }

    /// Writes a 32-bit float as an IEEE-754 big-endian FLOAT body.
    /// NaN is accepted here; decoders are the ones that reject it.
    pub fn write_f32(&mut self, v: f32) {
        self.buf.write(WireType::FLOAT, &v.to_be_bytes());
    }

    /// Writes a 64-bit float as an IEEE-754 big-endian FLOAT body.
    pub fn write_f64(&mut self, v: f64) {
        self.buf.write(WireType::FLOAT, &v.to_be_bytes());
    }

    /// Writes an arbitrary-precision integer as a minimal-width POSINT or
    /// NEGINT, per its sign.
    #[cfg(feature = "bigint")]
    pub fn write_bigint(&mut self, v: &BigInt) {
        match v.sign() {
            Sign::NoSign => self.buf.write(WireType::POSINT, &[]),
            Sign::Plus => {
                let (_, mag) = v.to_bytes_be();
                self.buf.write(WireType::POSINT, &mag);
            }
            Sign::Minus => {
                let (_, mag) = v.to_bytes_be();
                self.buf.write(WireType::NEGINT, &mag);
            }
        }
    }

    /// Writes an arbitrary-precision unsigned integer as a minimal-width
    /// POSINT (zero becomes an empty body, matching [`Polorizer::write_uint`]).
    #[cfg(feature = "bigint")]
    pub fn write_biguint(&mut self, v: &BigUint) {
        let mag = v.to_bytes_be();
        // `to_bytes_be` always returns at least one byte, `[0]` for zero;
        // strip it to match the empty-body-for-zero minimality invariant.
        if mag == [0] {
            self.buf.write(WireType::POSINT, &[]);
        } else {
            self.buf.write(WireType::POSINT, &mag);
        }
    }

    /// Writes a raw (already-tagged) fragment behind an outer RAW tag.
    pub fn write_raw(&mut self, v: &Raw) {
        self.buf.write(WireType::RAW, v.as_bytes());
    }

    /// Writes an `Any` using its own carried wire type, inline.
    pub fn write_any(&mut self, v: &Any) {
        self.buf.write(v.wire, &v.data);
    }

    /// Folds a sub-encoder's accumulated writes into `self` behind a PACK
    /// tag, regardless of how many elements the sub-encoder holds (so an
    /// empty record still emits `PACK(LOAD)` rather than collapsing to
    /// NULL).
    pub fn write_packed(&mut self, sub: &Self) {
        self.buf.write(WireType::PACK, &sub.load_bytes());
    }

    /// Folds a document's sorted key/value pairs into `self` behind a DOC
    /// tag.
    pub fn write_document(&mut self, doc: &Document) {
        let sub = doc.build_encoder(self.opts);
        self.buf.write(WireType::DOC, &sub.load_bytes());
    }

    /// Collapses the accumulated writes into the final wire: the one-byte
    /// NULL atom if nothing was written, the single written element as-is
    /// if exactly one was, or a PACK-wrapped compound otherwise.
    #[must_use]
    pub fn bytes(&self) -> Vec<u8> {
        match self.buf.count() {
            0 => vec![WireType::NULL.tag()],
            1 => self.buf.bytes(),
            _ => self.packed(),
        }
    }

    /// Unconditionally wraps the accumulated writes behind a PACK tag.
    #[must_use]
    pub fn packed(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.buf.bytes().len() + 2);
        out.push(WireType::PACK.tag());
        out.extend(self.load_bytes());
        out
    }
}

/// Big-endian bytes of `v` with no leading zero byte; zero encodes as an
/// empty slice.
fn minimal_be_bytes(v: u64) -> Vec<u8> {
    if v == 0 {
        return Vec::new();
    }
    let full = v.to_be_bytes();
    let first_nonzero = full.iter().position(|b| *b != 0).unwrap_or(full.len() - 1);
    full[first_nonzero..].to_vec()
}
