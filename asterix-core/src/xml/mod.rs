//! XML-to-description-model loader (`spec.md` §4.3, §6.2).
//!
//! The category grammar is carried in [`CATEGORY_DTD`] for reference and
//! tooling (e.g. editor validation of fixture files); `quick-xml` does not
//! itself enforce a DTD, so structural well-formedness is checked by
//! `serde` deserialization and the semantic rules (duplicate ids, dangling
//! UAP references, `frn` completeness) are checked explicitly in
//! [`convert`].

mod convert;
mod schema;

use crate::error::LoadError;
use crate::model::CategoryDescription;

/// The category description DTD, bundled as documentation and for fixture
/// authors — see the module comment for why it is not mechanically
/// enforced.
pub const CATEGORY_DTD: &str = include_str!("category.dtd");

/// Parses one category description XML document already read into memory.
pub fn parse_category_str(xml: &str, path: &str) -> Result<CategoryDescription, LoadError> {
    let parsed: schema::XmlCategory =
        quick_xml::de::from_str(xml).map_err(|e| LoadError::InvalidXml {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
    convert::to_category(parsed, path)
}

/// Reads and parses one category description XML file.
pub fn load_category_file(path: &std::path::Path) -> Result<CategoryDescription, LoadError> {
    let display = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;
    parse_category_str(&contents, &display)
}
