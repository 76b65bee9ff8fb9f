//! The decoder: [`Depolorizer`] (§4.6).
//!
//! A `Depolorizer` is seeded from a byte slice holding one wire element. In
//! atomic mode it holds that single element; `unpack()` switches it into
//! packed mode, backed by a [`polo_core::PackReader`] cursor over the
//! element's children. Every typed `read_*` call consumes exactly one
//! element from whichever mode is current.

use polo_core::{Element, PackReader, WireType};

#[cfg(feature = "bigint")]
use num_bigint::{BigInt, BigUint, Sign};

use crate::{
    document::Document,
    error::{Error, Result},
    options::Options,
    raw::{Any, Raw},
};

enum Mode<'a> {
    Atomic(Option<Element<'a>>),
    Packed(PackReader<'a>),
}

/// Reads typed values out of a POLO-encoded byte slice.
pub struct Depolorizer<'a> {
    mode: Mode<'a>,
    opts: Options,
}

impl<'a> Depolorizer<'a> {
    /// Parses `bytes` as a single wire element, with default options.
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        Self::with_options(bytes, Options::default())
    }

    /// Parses `bytes` as a single wire element.
    pub fn with_options(bytes: &'a [u8], opts: Options) -> Result<Self> {
        let el = Element::parse(bytes)?;
        Ok(Self {
            mode: Mode::Atomic(Some(el)),
            opts,
        })
    }

    /// The options this decoder was built with.
    #[must_use]
    pub fn options(&self) -> Options {
        self.opts
    }

    /// `true` once the current element (atomic) or every child element
    /// (packed) has been consumed.
    #[must_use]
    pub fn done(&self) -> bool {
        match &self.mode {
            Mode::Atomic(e) => e.is_none(),
            Mode::Packed(p) => p.done(),
        }
    }

    /// The wire type of the next element to be consumed, without consuming
    /// it.
    #[must_use]
    pub fn peek_wire(&self) -> Option<WireType> {
        match &self.mode {
            Mode::Atomic(e) => e.map(|el| el.wire),
            Mode::Packed(p) => p.peek(),
        }
    }

    /// `true` if the next element to be consumed is NULL.
    ///
    /// Record `Depolorizable` impls check this *before* calling
    /// [`Depolorizer::unpack`], since `unpack()` on a NULL element returns
    /// [`Error::NullPack`] rather than the all-zero record the
    /// null-absorption invariant requires — the caller, not `unpack()`
    /// itself, is responsible for turning "the compound was null" into a
    /// default value.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.peek_wire() == Some(WireType::NULL)
    }

    fn take(&mut self) -> Result<Element<'a>> {
        match &mut self.mode {
            Mode::Atomic(slot) => slot.take().ok_or(Error::InsufficientWire),
            Mode::Packed(reader) => reader
                .next()
                .ok_or(Error::InsufficientWire)?
                .map_err(Error::from),
        }
    }

    /// Switches into packed mode over the current element's children.
    ///
    /// In atomic mode, this consumes the decoder's single element. In
    /// packed mode, it consumes the next child off the pack cursor instead
    /// — nesting (a `Vec<Vec<T>>`, a record field that's itself a sequence,
    /// ...) is a compound element one level down from whatever the current
    /// cursor is yielding, not a reason to refuse. Fails if that element is
    /// NULL ([`Error::NullPack`]) or anything else non-compound
    /// ([`Error::IncompatibleWire`]).
    pub fn unpack(&mut self) -> Result<Self> {
        let el = self.take()?;
        if el.wire == WireType::NULL {
            return Err(Error::NullPack);
        }
        if !el.wire.is_compound() {
            return Err(Error::IncompatibleWire {
                observed: el.wire,
                expected: "pack or document",
            });
        }
        let reader = el.unpack()?;
        #[cfg(feature = "tracing")]
        tracing::trace!(wire = %el.wire, "entering packed mode");
        Ok(Self {
            mode: Mode::Packed(reader),
            opts: self.opts,
        })
    }

    /// Reads a NULL element.
    pub fn read_null(&mut self) -> Result<()> {
        let el = self.take()?;
        match el.wire {
            WireType::NULL => Ok(()),
            other => Err(Error::IncompatibleWire {
                observed: other,
                expected: "null",
            }),
        }
    }

    /// Reads a boolean; NULL absorbs to `false`.
    pub fn read_bool(&mut self) -> Result<bool> {
        let el = self.take()?;
        match el.wire {
            WireType::NULL | WireType::FALSE => Ok(false),
            WireType::TRUE => Ok(true),
            other => Err(Error::IncompatibleWire {
                observed: other,
                expected: "null, true, or false",
            }),
        }
    }

    /// Reads a UTF-8 string; NULL absorbs to an empty string.
    pub fn read_string(&mut self) -> Result<String> {
        let el = self.take()?;
        match el.wire {
            WireType::NULL => Ok(String::new()),
            WireType::WORD => core::str::from_utf8(el.data)
                .map(str::to_owned)
                .map_err(|_| Error::incompatible_value("word body is not valid utf-8")),
            other => Err(Error::IncompatibleWire {
                observed: other,
                expected: "null or word",
            }),
        }
    }

    /// Reads a byte sequence: a WORD body verbatim, or (with
    /// [`Options::packed_bytes`]) a PACK of single-byte POSINTs. NULL
    /// absorbs to an empty vector.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let el = self.take()?;
        match el.wire {
            WireType::NULL => Ok(Vec::new()),
            WireType::WORD => Ok(el.data.to_vec()),
            WireType::PACK => {
                let mut reader = el.unpack()?;
                let mut out = Vec::new();
                while let Some(item) = reader.next() {
                    let item = item?;
                    if item.wire != WireType::POSINT || item.data.len() > 1 {
                        return Err(Error::incompatible_value(
                            "packed byte sequence element is not a single-byte posint",
                        ));
                    }
                    out.push(item.data.first().copied().unwrap_or(0));
                }
                Ok(out)
            }
            other => Err(Error::IncompatibleWire {
                observed: other,
                expected: "null, word, or packed bytes",
            }),
        }
    }

    /// Reads an unsigned 64-bit integer; NULL absorbs to zero.
    pub fn read_u64(&mut self) -> Result<u64> {
        let el = self.take()?;
        match el.wire {
            WireType::NULL => Ok(0),
            WireType::POSINT => {
                if el.data.len() > 8 {
                    return Err(Error::incompatible_value(format!(
                        "posint body of {} bytes exceeds u64 width",
                        el.data.len()
                    )));
                }
                Ok(be_bytes_to_u64(el.data))
            }
            other => Err(Error::IncompatibleWire {
                observed: other,
                expected: "null or posint",
            }),
        }
    }

    /// Reads a signed 64-bit integer; NULL absorbs to zero. The magnitude
    /// `1u64 << 63` on a NEGINT is accepted as `i64::MIN`.
    pub fn read_i64(&mut self) -> Result<i64> {
        let el = self.take()?;
        match el.wire {
            WireType::NULL => Ok(0),
            WireType::POSINT => {
                if el.data.len() > 8 {
                    return Err(Error::incompatible_value(format!(
                        "posint body of {} bytes exceeds i64 width",
                        el.data.len()
                    )));
                }
                let v = be_bytes_to_u64(el.data);
                i64::try_from(v)
                    .map_err(|_| Error::incompatible_value("posint value exceeds i64 range"))
            }
            WireType::NEGINT => {
                if el.data.len() > 8 {
                    return Err(Error::incompatible_value(format!(
                        "negint body of {} bytes exceeds i64 width",
                        el.data.len()
                    )));
                }
                let mag = be_bytes_to_u64(el.data);
                if mag == 1u64 << 63 {
                    return Ok(i64::MIN);
                }
                i64::try_from(mag)
                    .map(|v| -v)
                    .map_err(|_| Error::incompatible_value("negint magnitude exceeds i64 range"))
            }
            other => Err(Error::IncompatibleWire {
                observed: other,
                expected: "null, posint, or negint",
            }),
        }
    }

    /// Reads a `u8`, range-checking the widened `u64`.
    pub fn read_u8(&mut self) -> Result<u8> {
        u8::try_from(self.read_u64()?).map_err(|_| Error::incompatible_value("posint value exceeds u8 range"))
    }

    /// Reads a `u16`, range-checking the widened `u64`.
    pub fn read_u16(&mut self) -> Result<u16> {
        u16::try_from(self.read_u64()?).map_err(|_| Error::incompatible_value("posint value exceeds u16 range"))
    }

    /// Reads a `u32`, range-checking the widened `u64`.
    pub fn read_u32(&mut self) -> Result<u32> {
        u32::try_from(self.read_u64()?).map_err(|_| Error::incompatible_value("posint value exceeds u32 range"))
    }

    /// Reads an `i8`, range-checking the widened `i64`.
    pub fn read_i8(&mut self) -> Result<i8> {
        i8::try_from(self.read_i64()?).map_err(|_| Error::incompatible_value("integer value exceeds i8 range"))
    }

    /// Reads an `i16`, range-checking the widened `i64`.
    pub fn read_i16(&mut self) -> Result<i16> {
        i16::try_from(self.read_i64()?).map_err(|_| Error::incompatible_value("integer value exceeds i16 range"))
    }

    /// Reads an `i32`, range-checking the widened `i64`.
    pub fn read_i32(&mut self) -> Result<i32> {
        i32::try_from(self.read_i64()?).map_err(|_| Error::incompatible_value("integer value exceeds i32 range"))
    }

    /// Reads a 32-bit float from an exactly-4-byte FLOAT body; NULL
    /// absorbs to `0.0`. Rejects NaN.
    pub fn read_f32(&mut self) -> Result<f32> {
        let el = self.take()?;
        match el.wire {
            WireType::NULL => Ok(0.0),
            WireType::FLOAT => {
                let bytes: [u8; 4] = el.data.try_into().map_err(|_| {
                    Error::incompatible_value(format!("float body must be 4 bytes, got {}", el.data.len()))
                })?;
                let v = f32::from_be_bytes(bytes);
                if v.is_nan() {
                    return Err(Error::incompatible_value("NaN is not a valid float value"));
                }
                Ok(v)
            }
            other => Err(Error::IncompatibleWire {
                observed: other,
                expected: "null or float",
            }),
        }
    }

    /// Reads a 64-bit float from an exactly-8-byte FLOAT body; NULL
    /// absorbs to `0.0`. Rejects NaN.
    pub fn read_f64(&mut self) -> Result<f64> {
        let el = self.take()?;
        match el.wire {
            WireType::NULL => Ok(0.0),
            WireType::FLOAT => {
                let bytes: [u8; 8] = el.data.try_into().map_err(|_| {
                    Error::incompatible_value(format!("float body must be 8 bytes, got {}", el.data.len()))
                })?;
                let v = f64::from_be_bytes(bytes);
                if v.is_nan() {
                    return Err(Error::incompatible_value("NaN is not a valid float value"));
                }
                Ok(v)
            }
            other => Err(Error::IncompatibleWire {
                observed: other,
                expected: "null or float",
            }),
        }
    }

    /// Reads an arbitrary-precision integer; NULL absorbs to zero.
    #[cfg(feature = "bigint")]
    pub fn read_bigint(&mut self) -> Result<BigInt> {
        let el = self.take()?;
        match el.wire {
            WireType::NULL => Ok(BigInt::from(0)),
            WireType::POSINT => Ok(BigInt::from_bytes_be(Sign::Plus, el.data)),
            WireType::NEGINT => {
                if el.data.iter().all(|b| *b == 0) {
                    Ok(BigInt::from(0))
                } else {
                    Ok(BigInt::from_bytes_be(Sign::Minus, el.data))
                }
            }
            other => Err(Error::IncompatibleWire {
                observed: other,
                expected: "null, posint, or negint",
            }),
        }
    }

    /// Reads an arbitrary-precision *unsigned* integer; NULL absorbs to
    /// zero. Unlike [`Depolorizer::read_bigint`], a NEGINT element is
    /// rejected rather than accepted, per the "unsigned" compatibility row
    /// (NULL, POSINT only).
    #[cfg(feature = "bigint")]
    pub fn read_biguint(&mut self) -> Result<BigUint> {
        let el = self.take()?;
        match el.wire {
            WireType::NULL => Ok(BigUint::from(0u8)),
            WireType::POSINT => Ok(BigUint::from_bytes_be(el.data)),
            other => Err(Error::IncompatibleWire {
                observed: other,
                expected: "null or posint",
            }),
        }
    }

    /// Reads a raw fragment; the current element's wire type must be RAW.
    pub fn read_raw(&mut self) -> Result<Raw> {
        let el = self.take()?;
        if el.wire != WireType::RAW {
            return Err(Error::IncompatibleWire {
                observed: el.wire,
                expected: "raw",
            });
        }
        Ok(Raw::from_bytes(el.data.to_vec()))
    }

    /// Reads whatever element is next, preserving its wire type.
    pub fn read_any(&mut self) -> Result<Any> {
        let el = self.take()?;
        Ok(Any {
            wire: el.wire,
            data: el.data.to_vec(),
        })
    }

    /// Reads a document; NULL absorbs to an empty document.
    pub fn read_document(&mut self) -> Result<Document> {
        let el = self.take()?;
        match el.wire {
            WireType::NULL => Ok(Document::new()),
            WireType::DOC => Document::from_element(&el, self.opts),
            other => Err(Error::IncompatibleWire {
                observed: other,
                expected: "null or document",
            }),
        }
    }
}

fn be_bytes_to_u64(data: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    let start = 8 - data.len();
    buf[start..].copy_from_slice(data);
    u64::from_be_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Polorizer;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_back_canonical_posint_example() {
        let mut dec = Depolorizer::new(&[0x03, 0x01, 0x2C]).unwrap();
        assert_eq!(dec.read_u64().unwrap(), 300);
    }

    #[test]
    fn null_absorbs_to_zero_value() {
        let mut dec = Depolorizer::new(&[0x00]).unwrap();
        assert_eq!(dec.read_u64().unwrap(), 0);
        let mut dec = Depolorizer::new(&[0x00]).unwrap();
        assert!(!dec.read_bool().unwrap());
        let mut dec = Depolorizer::new(&[0x00]).unwrap();
        assert_eq!(dec.read_string().unwrap(), "");
    }

    #[test]
    fn negint_min_i64_round_trips() {
        let mut enc = Polorizer::new();
        enc.write_int(i64::MIN);
        let bytes = enc.bytes();
        let mut dec = Depolorizer::new(&bytes).unwrap();
        assert_eq!(dec.read_i64().unwrap(), i64::MIN);
    }

    #[test]
    fn posint_overflow_is_rejected() {
        let el_bytes = [WireType::POSINT.tag(), 1, 2, 3, 4, 5];
        let mut dec = Depolorizer::new(&el_bytes).unwrap();
        assert!(dec.read_u32().is_err());
    }

    #[test]
    fn nan_float_is_rejected_on_decode() {
        let mut enc = Polorizer::new();
        enc.write_f64(f64::NAN);
        let bytes = enc.bytes();
        let mut dec = Depolorizer::new(&bytes).unwrap();
        assert!(dec.read_f64().is_err());
    }

    #[test]
    fn unpack_on_null_is_a_distinct_error() {
        let mut dec = Depolorizer::new(&[0x00]).unwrap();
        assert!(matches!(dec.unpack(), Err(Error::NullPack)));
    }

    #[test]
    fn unpack_two_word_pack_and_read_strings() {
        let mut sub = Polorizer::new();
        sub.write_string("foo");
        sub.write_string("bar");
        let mut outer = Polorizer::new();
        outer.write_packed(&sub);
        let bytes = outer.bytes();

        let mut dec = Depolorizer::new(&bytes).unwrap();
        let mut pack = dec.unpack().unwrap();
        assert_eq!(pack.read_string().unwrap(), "foo");
        assert_eq!(pack.read_string().unwrap(), "bar");
        assert!(pack.done());
    }

    #[test]
    fn unpack_nests_through_an_already_packed_decoder() {
        // [["foo"], ["bar", "baz"]]: outer pack holds two inner packs, so the
        // inner `unpack()` calls happen on a decoder that's already Packed.
        let mut inner_a = Polorizer::new();
        inner_a.write_string("foo");

        let mut inner_b = Polorizer::new();
        inner_b.write_string("bar");
        inner_b.write_string("baz");

        let mut outer = Polorizer::new();
        outer.write_packed(&inner_a);
        outer.write_packed(&inner_b);
        let bytes = outer.bytes();

        let mut dec = Depolorizer::new(&bytes).unwrap();
        let mut items = dec.unpack().unwrap();

        let mut first = items.unpack().unwrap();
        assert_eq!(first.read_string().unwrap(), "foo");
        assert!(first.done());

        let mut second = items.unpack().unwrap();
        assert_eq!(second.read_string().unwrap(), "bar");
        assert_eq!(second.read_string().unwrap(), "baz");
        assert!(second.done());

        assert!(items.done());
    }
}
