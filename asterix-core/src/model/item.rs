//! A single data item's description (`spec.md` §3: `ItemDescription`).

use super::format::ItemFormat;

#[derive(Debug, Clone, PartialEq)]
pub struct ItemDescription {
    pub id: u16,
    pub name: String,
    pub format: ItemFormat,
}
