//! Stateless output encoders over [`crate::record::DecodedRecord`]
//! (`spec.md` §4.7). None of these fail on a structurally valid record,
//! `Partial` included — malformed items render as opaque hex plus an
//! `error` marker.

pub mod json;
pub mod line;
pub mod text;
pub mod xml_encoder;

pub use json::JsonMode;
pub use xml_encoder::XmlMode;
