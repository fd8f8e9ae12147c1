//! **Text** mode: human-readable, multi-line rendition of one record
//! (`spec.md` §4.7).

use std::fmt::Write as _;

use crate::record::{DecodedRecord, DecodedValue, ItemKey};

fn item_label(id: ItemKey) -> String {
    match id {
        ItemKey::Id(n) => format!("I{n:03}"),
        ItemKey::Rfs => "RFS".to_string(),
        ItemKey::Spf => "SPF".to_string(),
    }
}

fn value_text(value: &DecodedValue) -> String {
    match value {
        DecodedValue::Integer(i) => i.to_string(),
        DecodedValue::Float(f) => f.to_string(),
        DecodedValue::Text(s) => s.clone(),
        DecodedValue::Bytes(b) => format!("0x{}", b.iter().map(|x| format!("{x:02x}")).collect::<String>()),
        DecodedValue::Compound(fields) => {
            let inner: Vec<String> = fields.iter().map(|(k, v)| format!("{k}={}", value_text(v))).collect();
            format!("{{{}}}", inner.join(", "))
        }
    }
}

/// Multi-line rendition: a header line, then one indented line per item
/// field, then an error line if the record is `Partial`.
pub fn encode(record: &DecodedRecord) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "CAT{} len={}{}",
        record.category,
        record.bytes_consumed,
        match record.timestamp {
            Some(ts) => format!(" ts={ts}"),
            None => String::new(),
        }
    );
    for item in &record.items {
        let label = item_label(item.id);
        if item.fields.is_empty() {
            let hex: String = item.raw_bytes.iter().map(|b| format!("{b:02x}")).collect();
            let _ = write!(out, "\n  {label}: raw {hex}");
            continue;
        }
        for (name, value) in &item.fields {
            let _ = write!(out, "\n  {label}.{name} = {}", value_text(value));
        }
    }
    if let Some(err) = &record.error {
        let _ = write!(out, "\n  ERROR: {err}");
    }
    out
}
