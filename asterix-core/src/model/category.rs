//! A single `(category, version)` grammar (`spec.md` §3: `CategoryDescription`).

use std::collections::BTreeMap;

use super::item::ItemDescription;
use super::uap::Uap;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDescription {
    pub id: u8,
    pub version: String,
    pub items: BTreeMap<u16, ItemDescription>,
    pub uap: Uap,
}

impl CategoryDescription {
    pub fn item(&self, id: u16) -> Option<&ItemDescription> {
        self.items.get(&id)
    }
}
