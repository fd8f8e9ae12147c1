//! XML encoders: compact / human (`spec.md` §4.7), built with
//! `quick_xml::Writer` the same way the loader side of this crate reads
//! with `quick_xml`.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::record::{DecodedItem, DecodedRecord, DecodedValue, ItemKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlMode {
    Compact,
    Human,
}

fn item_tag(id: ItemKey) -> String {
    match id {
        ItemKey::Id(n) => format!("I{n}"),
        ItemKey::Rfs => "RFS".to_string(),
        ItemKey::Spf => "SPF".to_string(),
    }
}

fn write_value(writer: &mut Writer<Vec<u8>>, name: &str, value: &DecodedValue) -> quick_xml::Result<()> {
    let start = BytesStart::new(name);
    match value {
        DecodedValue::Compound(fields) => {
            writer.write_event(Event::Start(start))?;
            for (k, v) in fields {
                write_value(writer, k, v)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        other => {
            let text = match other {
                DecodedValue::Integer(i) => i.to_string(),
                DecodedValue::Float(f) => f.to_string(),
                DecodedValue::Text(s) => s.clone(),
                DecodedValue::Bytes(b) => b.iter().map(|x| format!("{x:02x}")).collect(),
                DecodedValue::Compound(_) => unreachable!(),
            };
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(&text)))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
    }
    Ok(())
}

fn write_item(writer: &mut Writer<Vec<u8>>, item: &DecodedItem) -> quick_xml::Result<()> {
    let tag = item_tag(item.id);
    let mut start = BytesStart::new(&tag);
    if item.fields.is_empty() {
        let hex: String = item.raw_bytes.iter().map(|b| format!("{b:02x}")).collect();
        start.push_attribute(("raw", hex.as_str()));
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    for (name, value) in &item.fields {
        write_value(writer, name, value)?;
    }
    writer.write_event(Event::End(BytesEnd::new(&tag)))?;
    Ok(())
}

/// Encodes one record as `<Record>`; `mode` controls indentation only
/// (`Human` pretty-prints, `Compact` does not — `spec.md` §4.7 describes
/// these as analogous to the JSON compact/human split).
pub fn encode(record: &DecodedRecord, mode: XmlMode) -> String {
    let mut raw_writer = Vec::new();
    {
        let mut writer = match mode {
            XmlMode::Compact => Writer::new(&mut raw_writer),
            XmlMode::Human => Writer::new_with_indent(&mut raw_writer, b' ', 2),
        };

        let mut start = BytesStart::new("Record");
        start.push_attribute(("category", record.category.to_string().as_str()));
        start.push_attribute(("bytesConsumed", record.bytes_consumed.to_string().as_str()));
        if let Some(ts) = record.timestamp {
            start.push_attribute(("timestamp", ts.to_string().as_str()));
        }
        if record.is_partial() {
            start.push_attribute(("error", record.error.as_ref().unwrap().to_string().as_str()));
        }

        if record.items.is_empty() {
            let _ = writer.write_event(Event::Empty(start));
        } else {
            let _ = writer.write_event(Event::Start(start));
            for item in &record.items {
                let _ = write_item(&mut writer, item);
            }
            let _ = writer.write_event(Event::End(BytesEnd::new("Record")));
        }
    }
    String::from_utf8(raw_writer).unwrap_or_default()
}
