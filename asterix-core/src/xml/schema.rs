//! `serde` structs mirroring the category description DTD (`spec.md` §6.2).
//!
//! These are the direct XML shape; [`super::convert`] turns them into the
//! [`crate::model`] types and does the semantic validation the DTD cannot
//! express (duplicate ids, dangling UAP references, `frn` completeness).

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct XmlCategory {
    #[serde(rename = "@id")]
    pub id: u8,
    #[serde(rename = "@ver")]
    pub ver: String,
    #[serde(rename = "DataItem", default)]
    pub data_items: Vec<XmlDataItem>,
    #[serde(rename = "UAP")]
    pub uap: XmlUap,
}

#[derive(Debug, Deserialize)]
pub struct XmlDataItem {
    #[serde(rename = "@id")]
    pub id: u16,
    #[serde(rename = "DataItemName", default)]
    pub name: Option<String>,
    #[serde(rename = "DataItemFormat")]
    pub format: XmlDataItemFormat,
}

#[derive(Debug, Deserialize)]
pub struct XmlDataItemFormat {
    #[serde(rename = "@desc", default)]
    pub desc: Option<String>,
    #[serde(rename = "$value")]
    pub content: XmlFormatContent,
}

/// The one-of-seven `<DataItemFormat>` child; the element tag names
/// directly drive variant selection under `quick-xml`'s `$value` content
/// model.
#[derive(Debug, Deserialize)]
pub enum XmlFormatContent {
    Fixed(XmlFixed),
    Variable(XmlVariable),
    Repetitive(XmlRepetitive),
    Compound(XmlCompound),
    Explicit(XmlEmpty),
    ExplicitSP(XmlEmpty),
    BDS(XmlEmpty),
}

#[derive(Debug, Deserialize)]
pub struct XmlFixed {
    #[serde(rename = "@length")]
    pub length: usize,
    #[serde(rename = "Bits", default)]
    pub bits: Vec<XmlBits>,
}

/// `<Variable>` is the XML spelling of `Extensible` (`spec.md` §6.2).
#[derive(Debug, Deserialize)]
pub struct XmlVariable {
    #[serde(rename = "Fixed", default)]
    pub segments: Vec<XmlFixed>,
}

#[derive(Debug, Deserialize)]
pub struct XmlRepetitive {
    #[serde(rename = "Fixed")]
    pub element: XmlFixed,
}

#[derive(Debug, Deserialize)]
pub struct XmlCompound {
    #[serde(rename = "$value", default)]
    pub sub_items: Vec<XmlFormatContent>,
}

/// A self-closing marker element (`<Explicit/>`, `<ExplicitSP/>`, `<BDS/>`).
#[derive(Debug, Deserialize, Default)]
pub struct XmlEmpty {}

#[derive(Debug, Deserialize)]
pub struct XmlBits {
    #[serde(rename = "@from")]
    pub from: u32,
    #[serde(rename = "@to")]
    pub to: u32,
    #[serde(rename = "@encoding", default)]
    pub encoding: Option<String>,
    #[serde(rename = "@scale", default)]
    pub scale: Option<String>,
    #[serde(rename = "BitsShortName", default)]
    pub short_name: Option<String>,
    #[serde(rename = "BitsValue", default)]
    pub values: Vec<XmlBitsValue>,
}

#[derive(Debug, Deserialize)]
pub struct XmlBitsValue {
    #[serde(rename = "@val")]
    pub val: String,
    #[serde(rename = "$text")]
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct XmlUap {
    #[serde(rename = "UAPItem", default)]
    pub items: Vec<XmlUapItem>,
}

#[derive(Debug, Deserialize)]
pub struct XmlUapItem {
    #[serde(rename = "@bit")]
    pub bit: usize,
    #[serde(rename = "@frn")]
    pub frn: usize,
    #[serde(rename = "@len", default)]
    pub len: Option<usize>,
    #[serde(rename = "$text", default)]
    pub item_ref: String,
}
