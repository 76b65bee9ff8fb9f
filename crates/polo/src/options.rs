//! The encoder/decoder configuration record (§4.5): three independent,
//! default-off flags that are threaded into every sub-encoder/sub-decoder a
//! compound value spawns.

/// Per-instance configuration shared by a [`crate::Polorizer`] and
/// [`crate::Depolorizer`] pair.
///
/// This is POLO's only configuration surface — there is no file- or
/// env-based configuration (§6).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Emit/expect byte sequences as a PACK of single-byte POSINTs instead
    /// of a WORD.
    pub packed_bytes: bool,
    /// Emit/expect record-like values as DOC rather than PACK.
    pub doc_structs: bool,
    /// Emit/expect string-keyed maps as DOC rather than PACK.
    pub doc_maps: bool,
}

impl Options {
    /// The all-off default (every value travels as PACK/WORD).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            packed_bytes: false,
            doc_structs: false,
            doc_maps: false,
        }
    }

    /// Builder: byte sequences as PACK-of-POSINT.
    #[must_use]
    pub const fn with_packed_bytes(mut self, on: bool) -> Self {
        self.packed_bytes = on;
        self
    }

    /// Builder: records as DOC.
    #[must_use]
    pub const fn with_doc_structs(mut self, on: bool) -> Self {
        self.doc_structs = on;
        self
    }

    /// Builder: string-keyed maps as DOC.
    #[must_use]
    pub const fn with_doc_maps(mut self, on: bool) -> Self {
        self.doc_maps = on;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_all_off() {
        let o = Options::default();
        assert!(!o.packed_bytes);
        assert!(!o.doc_structs);
        assert!(!o.doc_maps);
    }

    #[test]
    fn builders_compose() {
        let o = Options::new().with_packed_bytes(true).with_doc_maps(true);
        assert!(o.packed_bytes);
        assert!(!o.doc_structs);
        assert!(o.doc_maps);
    }
}
