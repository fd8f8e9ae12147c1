//! The immutable description model: categories, items, formats, bit-fields,
//! and UAPs (`spec.md` §3, §4.2).

mod bitfield;
mod category;
mod format;
mod item;
mod library;
mod uap;

pub use bitfield::{BitField, Encoding};
pub use category::CategoryDescription;
pub use format::{FixedSegment, ItemFormat};
pub use item::ItemDescription;
pub use library::DescriptionLibrary;
pub use uap::{Uap, UapSlot};
