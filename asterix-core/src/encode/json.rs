//! JSON encoders: compact / human / extensive (`spec.md` §4.7).
//!
//! The extensive variant additionally looks up each item's human name from
//! the description library; compact and human omit it (human differs from
//! compact only in pretty-printing).

use serde_json::{json, Value};

use crate::model::DescriptionLibrary;
use crate::record::{DecodedItem, DecodedRecord, DecodedValue, ItemKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonMode {
    Compact,
    Human,
    Extensive,
}

fn value_to_json(value: &DecodedValue) -> Value {
    match value {
        DecodedValue::Integer(i) => json!(i),
        DecodedValue::Float(f) => json!(f),
        DecodedValue::Text(s) => json!(s),
        DecodedValue::Bytes(b) => json!(b.iter().map(|x| format!("{x:02x}")).collect::<String>()),
        DecodedValue::Compound(fields) => {
            let map: serde_json::Map<String, Value> = fields
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect();
            Value::Object(map)
        }
    }
}

fn item_key_json(id: ItemKey) -> String {
    match id {
        ItemKey::Id(n) => n.to_string(),
        ItemKey::Rfs => "RFS".to_string(),
        ItemKey::Spf => "SPF".to_string(),
    }
}

fn item_to_json(item: &DecodedItem, category: u8, mode: JsonMode, library: Option<&DescriptionLibrary>) -> Value {
    let mut obj = serde_json::Map::new();
    if item.fields.is_empty() {
        obj.insert(
            "raw".into(),
            json!(item.raw_bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()),
        );
    } else {
        let fields: serde_json::Map<String, Value> = item
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), value_to_json(v)))
            .collect();
        obj.insert("fields".into(), Value::Object(fields));
    }
    if mode == JsonMode::Extensive {
        if let (ItemKey::Id(id), Some(lib)) = (item.id, library) {
            if let Some(name) = lib.category(category).and_then(|c| c.item(id)).map(|d| d.name.clone()) {
                obj.insert("name".into(), json!(name));
            }
        }
    }
    Value::Object(obj)
}

/// Encodes one record. `library` is consulted only in [`JsonMode::Extensive`].
pub fn encode(record: &DecodedRecord, mode: JsonMode, library: Option<&DescriptionLibrary>) -> String {
    let mut items = serde_json::Map::new();
    for item in &record.items {
        items.insert(item_key_json(item.id), item_to_json(item, record.category, mode, library));
    }
    let mut root = serde_json::Map::new();
    root.insert("category".into(), json!(record.category));
    root.insert("bytes_consumed".into(), json!(record.bytes_consumed));
    if let Some(ts) = record.timestamp {
        root.insert("timestamp".into(), json!(ts));
    }
    root.insert("items".into(), Value::Object(items));
    if let Some(err) = &record.error {
        root.insert("error".into(), json!(err.to_string()));
    }
    let value = Value::Object(root);
    match mode {
        JsonMode::Compact => value.to_string(),
        JsonMode::Human | JsonMode::Extensive => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
        }
    }
}
