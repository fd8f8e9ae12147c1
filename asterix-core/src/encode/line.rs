//! **Line** mode: one `(category, item_id, field_name, value)` tuple per
//! line (`spec.md` §4.7).

use crate::record::{DecodedRecord, DecodedValue, ItemKey};

fn item_label(id: ItemKey) -> String {
    match id {
        ItemKey::Id(n) => n.to_string(),
        ItemKey::Rfs => "RFS".to_string(),
        ItemKey::Spf => "SPF".to_string(),
    }
}

fn value_text(value: &DecodedValue) -> String {
    match value {
        DecodedValue::Integer(i) => i.to_string(),
        DecodedValue::Float(f) => f.to_string(),
        DecodedValue::Text(s) => s.clone(),
        DecodedValue::Bytes(b) => b.iter().map(|x| format!("{x:02x}")).collect(),
        DecodedValue::Compound(_) => "<compound>".to_string(),
    }
}

/// Renders `record` as one line per scalar field. An item with no fields
/// (opaque items, or `Partial` records with nothing decoded yet) still
/// produces one line carrying its raw bytes as hex.
pub fn encode(record: &DecodedRecord) -> String {
    let mut lines = Vec::new();
    for item in &record.items {
        let label = item_label(item.id);
        if item.fields.is_empty() {
            let hex: String = item.raw_bytes.iter().map(|b| format!("{b:02x}")).collect();
            lines.push(format!("{} {} raw {}", record.category, label, hex));
            continue;
        }
        for (name, value) in &item.fields {
            lines.push(format!("{} {} {} {}", record.category, label, name, value_text(value)));
        }
    }
    if record.is_partial() {
        lines.push(format!(
            "{} error {}",
            record.category,
            record.error.as_ref().unwrap()
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn one_line_per_field() {
        let mut fields = BTreeMap::new();
        fields.insert("SAC".to_string(), DecodedValue::Integer(128));
        let record = DecodedRecord {
            category: 48,
            bytes_consumed: 3,
            timestamp: None,
            items: vec![crate::record::DecodedItem {
                id: ItemKey::Id(10),
                raw_bytes: vec![0x80],
                fields,
            }],
            error: None,
        };
        assert_eq!(encode(&record), "48 10 SAC 128");
    }
}
