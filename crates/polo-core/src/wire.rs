//! The 4-bit wire-type tag taxonomy (§3/§4.2).

use core::fmt;

/// A wire-type tag: the low 4 bits of every element's leading varint.
///
/// Values 8..=12 are reserved (invalid); values above 15 cannot occur since
/// a tag is always masked to its low nibble, but [`WireType::from_tag`]
/// still masks defensively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WireType(u8);

impl WireType {
    /// Absence / zero value / skipped field.
    pub const NULL: Self = Self(0);
    /// Boolean false.
    pub const FALSE: Self = Self(1);
    /// Boolean true.
    pub const TRUE: Self = Self(2);
    /// Unsigned big-endian integer (also ≥0 signed, or big integers).
    pub const POSINT: Self = Self(3);
    /// Absolute value of a negative integer, big-endian.
    pub const NEGINT: Self = Self(4);
    /// Opaque pre-encoded wire fragment.
    pub const RAW: Self = Self(5);
    /// Byte string (UTF-8 for strings).
    pub const WORD: Self = Self(6);
    /// IEEE-754 big-endian float (4 or 8 bytes).
    pub const FLOAT: Self = Self(7);
    /// Document-encoded compound.
    pub const DOC: Self = Self(13);
    /// Sequence-encoded compound.
    pub const PACK: Self = Self(14);
    /// Inner framing marker, only appears inside compounds.
    pub const LOAD: Self = Self(15);

    /// Builds a `WireType` from a raw tag value, masking to its low nibble.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Self {
        Self(tag & 0x0F)
    }

    /// The raw 4-bit tag value.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self.0
    }

    /// `true` for every tag that isn't reserved (8..=12).
    #[must_use]
    pub const fn is_valid(self) -> bool {
        !matches!(self.0, 8..=12)
    }

    /// `true` for PACK and DOC, the two compound wire types.
    #[must_use]
    pub const fn is_compound(self) -> bool {
        matches!(self.0, 14 | 13)
    }

    /// `true` for NULL, and for any reserved/invalid tag (treated as absent).
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0 || !self.is_valid()
    }

    /// Presentation name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self.0 {
            0 => "null",
            1 => "false",
            2 => "true",
            3 => "posint",
            4 => "negint",
            5 => "raw",
            6 => "word",
            7 => "float",
            13 => "document",
            14 => "pack",
            15 => "load",
            8..=12 => "reserved",
            _ => "unknown",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_match_spec_table() {
        assert!(WireType::NULL.is_valid());
        assert!(WireType::FLOAT.is_valid());
        assert!(WireType::DOC.is_valid());
        assert!(!WireType::from_tag(8).is_valid());
        assert!(!WireType::from_tag(12).is_valid());

        assert!(WireType::PACK.is_compound());
        assert!(WireType::DOC.is_compound());
        assert!(!WireType::WORD.is_compound());

        assert!(WireType::NULL.is_null());
        assert!(WireType::from_tag(9).is_null());
        assert!(!WireType::TRUE.is_null());
    }

    #[test]
    fn masks_to_low_nibble() {
        assert_eq!(WireType::from_tag(0xF6), WireType::from_tag(0x06));
    }

    #[test]
    fn names_match_taxonomy() {
        assert_eq!(WireType::NULL.name(), "null");
        assert_eq!(WireType::PACK.name(), "pack");
        assert_eq!(WireType::LOAD.name(), "load");
        assert_eq!(WireType::from_tag(10).name(), "reserved");
    }
}
