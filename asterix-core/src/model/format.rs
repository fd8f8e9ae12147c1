//! The seven item-format variants (`spec.md` §3, §4.5, §9).
//!
//! Modeled as a tagged enum rather than a trait-object hierarchy per the
//! re-architecture note in `spec.md` §9: the two polymorphic operations
//! (`length_of`, `decode`) are exhaustive `match`es in
//! [`crate::record::format`], not virtual calls.

use super::bitfield::BitField;

/// One segment of a [`ItemFormat::Fixed`] or a single repetition/extension
/// unit: a byte width paired with the bit-fields packed into it.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSegment {
    pub length: usize,
    pub bits: Vec<BitField>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemFormat {
    /// Always `length` bytes; `bits` are read from that one slab.
    Fixed { length: usize, bits: Vec<BitField> },

    /// One or more `FixedSegment`s; each segment but the last reserves its
    /// final bit as the FX continuation bit (not itself a field).
    Extensible {
        /// The always-present leading segment.
        base: FixedSegment,
        /// Each additional segment appended while FX is set.
        extensions: Vec<FixedSegment>,
    },

    /// A leading `REP` count byte followed by `REP` copies of `element`.
    Repetitive { element: Box<ItemFormat> },

    /// A compound FSPEC selecting which of `sub_items` (in declaration
    /// order) follow.
    Compound { sub_items: Vec<ItemFormat> },

    /// First byte is the total length (including itself); opaque unless a
    /// category chooses to interpret it.
    Explicit,

    /// Same length convention as `Explicit`; always rendered opaque.
    SpecialPurpose,

    /// Fixed 8 bytes: one selector byte + seven register-content bytes.
    BDSRegister,
}

impl ItemFormat {
    pub fn is_compound(&self) -> bool {
        matches!(self, ItemFormat::Compound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_is_not_compound() {
        let f = ItemFormat::Fixed {
            length: 2,
            bits: vec![],
        };
        assert!(!f.is_compound());
    }

    #[test]
    fn compound_is_compound() {
        let f = ItemFormat::Compound { sub_items: vec![] };
        assert!(f.is_compound());
    }
}
