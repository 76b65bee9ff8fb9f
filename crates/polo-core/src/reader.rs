//! The read side: parsing a single tagged element and unpacking compounds
//! into an iterator over child elements (§4.4).

use crate::{
    error::{PoloError, Result},
    varint,
    wire::WireType,
};

/// A single parsed (wire-type, body-bytes) pair. No validation of `data`'s
/// length against `wire`'s expected shape happens at this layer — that is
/// the typed decoder's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element<'a> {
    /// The element's wire type.
    pub wire: WireType,
    /// The element's body bytes (post tag, pre any further framing).
    pub data: &'a [u8],
}

impl<'a> Element<'a> {
    /// Parses one element from the front of `bytes`: a tag varint followed
    /// by the remainder as `data`.
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        let (tag, consumed) = varint::decode(bytes)?;
        Ok(Self {
            wire: WireType::from_tag(tag as u8),
            data: &bytes[consumed..],
        })
    }

    /// Unpacks a compound element (PACK or DOC) into an iterator over its
    /// children. Fails if this element isn't compound, or if its body
    /// doesn't start with a well-formed LOAD tag.
    pub fn unpack(&self) -> Result<PackReader<'a>> {
        if !self.wire.is_compound() {
            return Err(PoloError::MissingLoadTag);
        }
        let (load_entry, consumed) = varint::decode(self.data)?;
        let load_wire = WireType::from_tag((load_entry & 0x0F) as u8);
        if load_wire != WireType::LOAD {
            return Err(PoloError::MissingLoadTag);
        }
        let head_len = (load_entry >> 4) as usize;
        let rest = &self.data[consumed..];
        if rest.len() < head_len {
            return Err(PoloError::TruncatedHead);
        }
        let (head, body) = rest.split_at(head_len);
        #[cfg(feature = "tracing")]
        tracing::trace!(head_len, body_len = body.len(), wire = %self.wire, "unpacked compound");
        Ok(PackReader::new(head, body))
    }
}

/// A cursor over a compound's HEAD+BODY that yields [`Element`]s left to
/// right. Seeded with the first HEAD entry; each call to `next()` shifts
/// that entry into "current", pulls the following one into "next", and
/// slices BODY between the two offsets (or to BODY's end for the last
/// element).
#[derive(Debug, Clone)]
pub struct PackReader<'a> {
    head: &'a [u8],
    head_pos: usize,
    body: &'a [u8],
    nxt: Option<(u64, WireType)>,
    head_err: bool,
    done: bool,
}

impl<'a> PackReader<'a> {
    pub(crate) fn new(head: &'a [u8], body: &'a [u8]) -> Self {
        let mut reader = Self {
            head,
            head_pos: 0,
            body,
            nxt: None,
            head_err: false,
            done: false,
        };
        reader.nxt = reader.pull_head_entry();
        reader.done = reader.nxt.is_none() && !reader.head_err;
        reader
    }

    fn pull_head_entry(&mut self) -> Option<(u64, WireType)> {
        if self.head_pos >= self.head.len() {
            return None;
        }
        match varint::decode(&self.head[self.head_pos..]) {
            Ok((entry, n)) => {
                self.head_pos += n;
                Some((entry >> 4, WireType::from_tag((entry & 0x0F) as u8)))
            }
            Err(_) => {
                self.head_err = true;
                None
            }
        }
    }

    /// Wire type of the element the next call to `next()` will yield,
    /// without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<WireType> {
        self.nxt.map(|(_, w)| w)
    }

    /// `true` once every element has been yielded (or an error has been
    /// returned and the reader has given up).
    #[must_use]
    pub fn done(&self) -> bool {
        self.done
    }
}

impl<'a> Iterator for PackReader<'a> {
    type Item = Result<Element<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let Some((cur_off, cur_wire)) = self.nxt.take() else {
            self.done = true;
            return Some(Err(PoloError::MalformedHead));
        };

        let start = cur_off as usize;
        if start > self.body.len() {
            self.done = true;
            return Some(Err(PoloError::MalformedHead));
        }

        self.nxt = self.pull_head_entry();
        if self.head_err {
            self.done = true;
            return Some(Err(PoloError::MalformedHead));
        }

        let end = match self.nxt {
            Some((next_off, _)) => next_off as usize,
            None => {
                self.done = true;
                self.body.len()
            }
        };

        if end > self.body.len() || end < start {
            self.done = true;
            return Some(Err(PoloError::MalformedHead));
        }

        Some(Ok(Element {
            wire: cur_wire,
            data: &self.body[start..end],
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::WriteBuffer;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_atomic_posint() {
        // 300 encoded as a top-level POSINT: tag=3, body=[0x01, 0x2C].
        let bytes = [0x03u8, 0x01, 0x2C];
        let el = Element::parse(&bytes).unwrap();
        assert_eq!(el.wire, WireType::POSINT);
        assert_eq!(el.data, &[0x01, 0x2C]);
    }

    #[test]
    fn unpacks_two_word_pack() {
        let mut w = WriteBuffer::new();
        w.write(WireType::WORD, b"foo");
        w.write(WireType::WORD, b"bar");
        let mut wire = Vec::from([WireType::PACK.tag()]);
        wire.extend(w.load());

        let el = Element::parse(&wire).unwrap();
        assert_eq!(el.wire, WireType::PACK);
        let mut pack = el.unpack().unwrap();

        assert_eq!(pack.peek(), Some(WireType::WORD));
        let first = pack.next().unwrap().unwrap();
        assert_eq!(first.data, b"foo");
        assert!(!pack.done());

        let second = pack.next().unwrap().unwrap();
        assert_eq!(second.data, b"bar");
        assert!(pack.done());
        assert!(pack.next().is_none());
    }

    #[test]
    fn empty_pack_yields_nothing() {
        let el = Element {
            wire: WireType::PACK,
            data: &[0x0F],
        };
        let mut pack = el.unpack().unwrap();
        assert!(pack.done());
        assert!(pack.next().is_none());
    }

    #[test]
    fn unpack_rejects_non_compound() {
        let el = Element {
            wire: WireType::WORD,
            data: b"hi",
        };
        assert_eq!(el.unpack().unwrap_err(), PoloError::MissingLoadTag);
    }

    #[test]
    fn unpack_rejects_missing_load_tag() {
        let el = Element {
            wire: WireType::PACK,
            // First varint's low nibble is 6 (WORD), not 15 (LOAD).
            data: &[0x06, b'h', b'i'],
        };
        assert_eq!(el.unpack().unwrap_err(), PoloError::MissingLoadTag);
    }
}
