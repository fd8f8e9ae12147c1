//! The runtime decoded representation (`spec.md` §3: `DecodedRecord`,
//! `DecodedItem`, `DecodedValue`).

use std::collections::BTreeMap;

use crate::error::DecodeErrorKind;

/// Identifies a decoded item's slot. Most slots are a catalogued item id;
/// the Special-Purpose Field (`spec.md` §4.2, §4.6) has no catalogue entry
/// of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ItemKey {
    Id(u16),
    /// Reserved Field Specification slot (`spec.md` §4.2, §4.6).
    Rfs,
    Spf,
}

/// A decoded field value. `spec.md` §3: "`Integer(i64) | Float(f64) |
/// Text(str) | Bytes(slice) | Compound(map)`" — `Text`/`Bytes` are owned
/// here rather than borrowed, per the note in §3 that borrowing vs.
/// copying is an implementation concern.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Compound(BTreeMap<String, DecodedValue>),
}

/// One decoded data item: its raw bytes (for opaque/unknown-format
/// rendering) plus its named field values.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedItem {
    pub id: ItemKey,
    pub raw_bytes: Vec<u8>,
    pub fields: BTreeMap<String, DecodedValue>,
}

impl DecodedItem {
    pub fn opaque(id: ItemKey, raw_bytes: Vec<u8>) -> Self {
        Self {
            id,
            raw_bytes,
            fields: BTreeMap::new(),
        }
    }
}

/// One fully or partially decoded record (`spec.md` §3, §4.6, §7).
///
/// `items` preserves UAP emission order (`spec.md` §4.6: "Items are
/// emitted in UAP order, not in wire order"), so it is a `Vec` rather than
/// a sorted map; [`Self::item`] provides map-like lookup by key.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub category: u8,
    pub bytes_consumed: usize,
    pub timestamp: Option<f64>,
    pub items: Vec<DecodedItem>,
    /// Set when an item failed to decode (`spec.md` §7): earlier items are
    /// retained, the error marks where decoding stopped.
    pub error: Option<DecodeErrorKind>,
}

impl DecodedRecord {
    pub fn is_partial(&self) -> bool {
        self.error.is_some()
    }

    pub fn item(&self, id: ItemKey) -> Option<&DecodedItem> {
        self.items.iter().find(|i| i.id == id)
    }
}
