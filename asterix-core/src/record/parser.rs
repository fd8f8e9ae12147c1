//! The FSPEC + UAP + item-dispatch state machine (`spec.md` §4.6) — the
//! hardest part of the decoder.

use crate::error::DecodeErrorKind;
use crate::model::{CategoryDescription, UapSlot};

use super::decoded::{DecodedItem, DecodedRecord, ItemKey};
use super::format;

/// Headroom added to the UAP-derived bound on FSPEC octet count, so a
/// category with a couple of trailing spare bits doesn't spuriously trip
/// the "FSPEC too long" guard.
const FSPEC_SAFETY_MARGIN: usize = 4;

/// Decodes every record in one data block's body, in wire order
/// (`spec.md` §4.6 states 2–5).
pub fn parse_records(
    category: &CategoryDescription,
    mut body: &[u8],
    timestamp: Option<f64>,
) -> Vec<DecodedRecord> {
    let mut records = Vec::new();
    while !body.is_empty() {
        let (record, consumed) = parse_one_record(category, body, timestamp);
        let consumed = consumed.max(1).min(body.len());
        records.push(record);
        body = &body[consumed..];
    }
    records
}

fn parse_one_record(
    cat_desc: &CategoryDescription,
    data: &[u8],
    timestamp: Option<f64>,
) -> (DecodedRecord, usize) {
    let max_fspec_octets = cat_desc.uap.len().div_ceil(7) + FSPEC_SAFETY_MARGIN;

    let mut fspec = Vec::new();
    let mut offset = 0usize;
    loop {
        let Some(&b) = data.get(offset) else {
            let err = DecodeErrorKind::MalformedFspec {
                reason: "FX bit never cleared before input ran out",
            };
            err.log(cat_desc.id, offset);
            return malformed(cat_desc.id, timestamp, err, data.len());
        };
        fspec.push(b);
        offset += 1;
        if b & 1 == 0 {
            break;
        }
        if fspec.len() > max_fspec_octets {
            let err = DecodeErrorKind::MalformedFspec {
                reason: "FSPEC length exceeds UAP capacity",
            };
            err.log(cat_desc.id, offset);
            return malformed(cat_desc.id, timestamp, err, data.len());
        }
    }

    let mut items = Vec::new();
    let mut cursor = offset;
    let mut bit_index = 0usize;

    for byte in &fspec {
        for bit in (1..=7).rev() {
            bit_index += 1;
            if byte & (1 << bit) == 0 {
                continue;
            }
            match cat_desc.uap.slot(bit_index) {
                None => {
                    let err = DecodeErrorKind::UnknownItem {
                        category: cat_desc.id,
                        frn: bit_index,
                    };
                    err.log(cat_desc.id, cursor);
                    return partial(cat_desc.id, timestamp, items, err, cursor);
                }
                Some(UapSlot::Spare) => {}
                Some(UapSlot::Rfs) => {
                    match take_length_prefixed(data, cursor) {
                        Ok((raw, len)) => {
                            items.push(DecodedItem::opaque(ItemKey::Rfs, raw.to_vec()));
                            cursor += len;
                        }
                        Err(reason) => {
                            let err = DecodeErrorKind::MalformedItem {
                                category: cat_desc.id,
                                item_id: 0,
                                reason,
                            };
                            err.log(cat_desc.id, cursor);
                            return partial(cat_desc.id, timestamp, items, err, cursor);
                        }
                    }
                }
                Some(UapSlot::Spf) => match take_length_prefixed(data, cursor) {
                    Ok((raw, len)) => {
                        items.push(DecodedItem::opaque(ItemKey::Spf, raw.to_vec()));
                        cursor += len;
                    }
                    Err(reason) => {
                        let err = DecodeErrorKind::MalformedItem {
                            category: cat_desc.id,
                            item_id: 0,
                            reason,
                        };
                        err.log(cat_desc.id, cursor);
                        return partial(cat_desc.id, timestamp, items, err, cursor);
                    }
                },
                Some(UapSlot::Item(id)) => {
                    let id = *id;
                    let Some(item_desc) = cat_desc.item(id) else {
                        let err = DecodeErrorKind::UnknownItem {
                            category: cat_desc.id,
                            frn: bit_index,
                        };
                        err.log(cat_desc.id, cursor);
                        return partial(cat_desc.id, timestamp, items, err, cursor);
                    };
                    let remaining = &data[cursor..];
                    match format::length_of(&item_desc.format, remaining) {
                        Ok(len) => {
                            items.push(format::decode(&item_desc.format, ItemKey::Id(id), &remaining[..len]));
                            cursor += len;
                        }
                        Err(reason) => {
                            let err = DecodeErrorKind::MalformedItem {
                                category: cat_desc.id,
                                item_id: id,
                                reason,
                            };
                            err.log(cat_desc.id, cursor);
                            return partial(cat_desc.id, timestamp, items, err, cursor);
                        }
                    }
                }
            }
        }
    }

    (
        DecodedRecord {
            category: cat_desc.id,
            bytes_consumed: cursor,
            timestamp,
            items,
            error: None,
        },
        cursor,
    )
}

/// RFS and SPF slots are both "one length-prefixed opaque blob" at the
/// wire level (`spec.md` §4.6 state 4); the byte includes itself in the
/// count, matching the `Explicit`/`SpecialPurpose` item convention.
fn take_length_prefixed(data: &[u8], at: usize) -> Result<(&[u8], usize), &'static str> {
    let len = *data.get(at).ok_or("truncated length-prefixed field")? as usize;
    if len == 0 {
        return Err("length-prefixed field declares zero length");
    }
    if at + len > data.len() {
        return Err("length-prefixed field exceeds record remainder");
    }
    Ok((&data[at..at + len], len))
}

/// A record dropped entirely (FSPEC-level failure): `spec.md` §7 policy for
/// `MalformedFSPEC` is "best-effort re-sync (advance past the block's
/// remaining bytes)", so `consumed` is the whole remaining block.
fn malformed(
    category: u8,
    timestamp: Option<f64>,
    error: DecodeErrorKind,
    remaining_len: usize,
) -> (DecodedRecord, usize) {
    (
        DecodedRecord {
            category,
            bytes_consumed: remaining_len,
            timestamp,
            items: Vec::new(),
            error: Some(error),
        },
        remaining_len,
    )
}

/// A record marked `Partial`: items decoded so far are retained, and only
/// the bytes actually consumed are accounted for — the next record is
/// attempted right after (`spec.md` §4.6 state 4, §7 `MalformedItem`
/// policy).
fn partial(
    category: u8,
    timestamp: Option<f64>,
    items: Vec<DecodedItem>,
    error: DecodeErrorKind,
    consumed: usize,
) -> (DecodedRecord, usize) {
    (
        DecodedRecord {
            category,
            bytes_consumed: consumed,
            timestamp,
            items,
            error: Some(error),
        },
        consumed,
    )
}
