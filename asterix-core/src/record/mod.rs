//! Record- and item-level decoding (`spec.md` §4.5, §4.6).

mod decoded;
pub mod format;
mod parser;

pub use decoded::{DecodedItem, DecodedRecord, DecodedValue, ItemKey};
pub use parser::parse_records;
