//! The seven item-format length/decode implementations (`spec.md` §4.5,
//! §9): one exhaustive `match` per polymorphic operation instead of
//! virtual dispatch.

use std::collections::BTreeMap;

use crate::cursor::ByteCursor;
use crate::model::{BitField, Encoding, FixedSegment, ItemFormat};

use super::decoded::{DecodedItem, DecodedValue, ItemKey};

/// Guards `Repetitive`'s `REP * element_len` (`spec.md` §4.5, §8 property 4).
pub const MAX_ITEM_SIZE: usize = 64 * 1024;

/// Computes how many bytes of `data` this format occupies, without reading
/// past that length. `data` may extend beyond the item (it is the
/// record's remaining bytes); never past it.
pub fn length_of(format: &ItemFormat, data: &[u8]) -> Result<usize, &'static str> {
    match format {
        ItemFormat::Fixed { length, .. } => {
            if data.len() < *length {
                return Err("truncated Fixed item");
            }
            Ok(*length)
        }

        ItemFormat::Extensible { base, extensions } => {
            if data.len() < base.length {
                return Err("truncated Extensible base segment");
            }
            let mut total = base.length;
            let mut next = extensions.iter();
            loop {
                let fx = data[total - 1] & 1;
                if fx == 0 {
                    break;
                }
                let seg = next.next().ok_or("Extensible FX bit set with no further segment")?;
                total += seg.length;
                if data.len() < total {
                    return Err("truncated Extensible extension segment");
                }
            }
            Ok(total)
        }

        ItemFormat::Repetitive { element } => {
            if data.is_empty() {
                return Err("truncated Repetitive count byte");
            }
            let rep = data[0] as usize;
            let element_len = fixed_length(element)?;
            let payload = rep
                .checked_mul(element_len)
                .ok_or("Repetitive REP * element length overflowed")?;
            if payload > MAX_ITEM_SIZE {
                return Err("Repetitive item exceeds MAX_ITEM_SIZE");
            }
            let total = 1usize
                .checked_add(payload)
                .ok_or("Repetitive total length overflowed")?;
            if data.len() < total {
                return Err("truncated Repetitive item");
            }
            Ok(total)
        }

        ItemFormat::Compound { sub_items } => {
            let mut fspec_len = 0usize;
            loop {
                let b = *data.get(fspec_len).ok_or("truncated Compound FSPEC")?;
                fspec_len += 1;
                if b & 1 == 0 {
                    break;
                }
            }
            let mut total = fspec_len;
            let mut slot = 0usize;
            for byte in &data[..fspec_len] {
                for bit in (1..=7).rev() {
                    let mask = 1u8 << bit;
                    if byte & mask != 0 {
                        let sub = sub_items
                            .get(slot)
                            .ok_or("Compound FSPEC bit set with no corresponding sub-item")?;
                        total += length_of(sub, &data[total..])?;
                    }
                    slot += 1;
                }
            }
            Ok(total)
        }

        ItemFormat::Explicit | ItemFormat::SpecialPurpose => {
            let len = *data.first().ok_or("truncated Explicit/SpecialPurpose length byte")? as usize;
            if len == 0 {
                return Err("Explicit/SpecialPurpose length byte is zero");
            }
            if data.len() < len {
                return Err("truncated Explicit/SpecialPurpose item");
            }
            Ok(len)
        }

        ItemFormat::BDSRegister => {
            if data.len() < 8 {
                return Err("truncated BDSRegister item");
            }
            Ok(8)
        }
    }
}

fn fixed_length(format: &ItemFormat) -> Result<usize, &'static str> {
    match format {
        ItemFormat::Fixed { length, .. } => Ok(*length),
        ItemFormat::BDSRegister => Ok(8),
        _ => Err("Repetitive element must itself be fixed-width"),
    }
}

/// Decodes `data` (already sliced to exactly `length_of(format, data)`
/// bytes) into a [`DecodedItem`].
pub fn decode(format: &ItemFormat, id: ItemKey, data: &[u8]) -> DecodedItem {
    let mut fields = BTreeMap::new();
    collect_fields(format, data, &mut fields);
    DecodedItem {
        id,
        raw_bytes: data.to_vec(),
        fields,
    }
}

fn collect_fields(format: &ItemFormat, data: &[u8], fields: &mut BTreeMap<String, DecodedValue>) {
    match format {
        ItemFormat::Fixed { bits, .. } => decode_bits(bits, data, fields),

        ItemFormat::Extensible { base, extensions } => {
            let mut offset = 0;
            decode_segment(base, &data[offset..offset + base.length], fields);
            offset += base.length;
            for seg in extensions {
                if offset + seg.length > data.len() {
                    break;
                }
                decode_segment(seg, &data[offset..offset + seg.length], fields);
                offset += seg.length;
            }
        }

        ItemFormat::Repetitive { element } => {
            let rep = data[0] as usize;
            let elem_len = fixed_length(element).unwrap_or(0);
            let mut offset = 1;
            for i in 0..rep {
                if offset + elem_len > data.len() {
                    break;
                }
                let mut sub_fields = BTreeMap::new();
                collect_fields(element, &data[offset..offset + elem_len], &mut sub_fields);
                fields.insert(i.to_string(), DecodedValue::Compound(sub_fields));
                offset += elem_len;
            }
        }

        ItemFormat::Compound { sub_items } => {
            let mut fspec_len = 0usize;
            while data.get(fspec_len).is_some_and(|b| {
                fspec_len += 1;
                data[fspec_len - 1] & 1 != 0
            }) {}
            let mut offset = fspec_len;
            let mut slot = 0usize;
            'bytes: for byte in &data[..fspec_len] {
                for bit in (1..=7).rev() {
                    let mask = 1u8 << bit;
                    if byte & mask != 0 {
                        let Some(sub) = sub_items.get(slot) else {
                            break 'bytes;
                        };
                        let Ok(sub_len) = length_of(sub, &data[offset..]) else {
                            break 'bytes;
                        };
                        let mut sub_fields = BTreeMap::new();
                        collect_fields(sub, &data[offset..offset + sub_len], &mut sub_fields);
                        fields.insert(format!("sub{slot}"), DecodedValue::Compound(sub_fields));
                        offset += sub_len;
                    }
                    slot += 1;
                }
            }
        }

        // Opaque by design (`spec.md` §4.5, §9): no field-level interpretation.
        ItemFormat::Explicit | ItemFormat::SpecialPurpose | ItemFormat::BDSRegister => {}
    }
}

fn decode_segment(seg: &FixedSegment, slab: &[u8], fields: &mut BTreeMap<String, DecodedValue>) {
    decode_bits(&seg.bits, slab, fields);
}

fn decode_bits(bits: &[BitField], slab: &[u8], fields: &mut BTreeMap<String, DecodedValue>) {
    for bf in bits {
        if bf.name.is_empty() {
            continue;
        }
        let raw = ByteCursor::take_bits(slab, bf.from_bit, bf.to_bit);
        let value = match &bf.encoding {
            Encoding::Unsigned => scaled_numeric(raw as i64, bf),
            Encoding::Signed => scaled_numeric(ByteCursor::signed_from_unsigned(raw, bf.width()), bf),
            Encoding::Hex => DecodedValue::Text(format!("{raw:X}")),
            Encoding::Octal => DecodedValue::Text(format!("{raw:o}")),
            Encoding::Ascii => DecodedValue::Text(ia5_string(raw, bf.width())),
            Encoding::Enumerated(values) => match values.iter().find(|(v, _)| *v == raw) {
                Some((_, label)) => DecodedValue::Text(label.clone()),
                None => DecodedValue::Integer(raw as i64),
            },
        };
        fields.insert(bf.name.clone(), value);
    }
}

fn scaled_numeric(raw: i64, bf: &BitField) -> DecodedValue {
    if bf.scale_is_integral() {
        DecodedValue::Integer((raw as f64 * bf.scale) as i64)
    } else {
        DecodedValue::Float(raw as f64 * bf.scale)
    }
}

/// Six-bit IA-5 character set used by ASTERIX callsign/identifier fields.
fn ia5_char(v: u64) -> char {
    match v {
        0 => ' ',
        1..=26 => (b'A' + (v - 1) as u8) as char,
        48..=57 => (b'0' + (v - 48) as u8) as char,
        _ => '?',
    }
}

fn ia5_string(raw: u64, width: u32) -> String {
    let n_chars = width / 6;
    (0..n_chars)
        .rev()
        .map(|i| ia5_char((raw >> (i * 6)) & 0x3F))
        .collect()
}
