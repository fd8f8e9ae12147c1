//! User Application Profile: FSPEC bit position → item identity
//! (`spec.md` §3, §4.2).

/// What a single UAP slot (one FSPEC bit position) refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UapSlot {
    /// A regular data item, looked up by id in the owning category.
    Item(u16),
    /// Reserved Field Specification: a secondary FSPEC referencing item
    /// ids directly (`spec.md` §4.6 state 4).
    Rfs,
    /// Special-Purpose Field: one length-prefixed opaque blob.
    Spf,
    /// The XML used `-` for this `frn` — the slot exists but decodes to
    /// nothing.
    Spare,
}

/// The ordered FSPEC-bit-to-item mapping for one category.
///
/// `slots[k]` is the UAP entry for presence bit `k + 1` (1-origin bit
/// position, per `spec.md` §3: "ordered mapping from FSPEC bit index to
/// item identifier").
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Uap {
    slots: Vec<UapSlot>,
}

impl Uap {
    pub fn new(slots: Vec<UapSlot>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot for presence bit `bit` (1-origin). `None` if `bit` exceeds the
    /// UAP's declared length.
    pub fn slot(&self, bit: usize) -> Option<&UapSlot> {
        self.slots.get(bit - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_is_one_origin() {
        let uap = Uap::new(vec![UapSlot::Item(10), UapSlot::Item(20), UapSlot::Spare]);
        assert_eq!(uap.slot(1), Some(&UapSlot::Item(10)));
        assert_eq!(uap.slot(3), Some(&UapSlot::Spare));
        assert_eq!(uap.slot(4), None);
    }
}
