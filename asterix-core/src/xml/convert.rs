//! Schema → description-model conversion, with the semantic validation the
//! DTD cannot express (`spec.md` §4.3, §6.2).

use std::collections::BTreeMap;

use crate::error::LoadError;
use crate::model::{
    BitField, CategoryDescription, Encoding, FixedSegment, ItemDescription, ItemFormat, Uap,
    UapSlot,
};

use super::schema::{
    XmlBits, XmlCategory, XmlFixed, XmlFormatContent, XmlUapItem,
};

pub fn to_category(xml: XmlCategory, path: &str) -> Result<CategoryDescription, LoadError> {
    let mut items = BTreeMap::new();
    for data_item in xml.data_items {
        let format = to_format(data_item.format.content, path)?;
        let desc = ItemDescription {
            id: data_item.id,
            name: data_item.name.unwrap_or_default(),
            format,
        };
        if items.insert(desc.id, desc).is_some() {
            return Err(LoadError::InvalidXml {
                path: path.to_string(),
                reason: format!("duplicate DataItem id {}", data_item.id),
            });
        }
    }

    let uap = to_uap(&xml.uap.items, &items, path)?;

    Ok(CategoryDescription {
        id: xml.id,
        version: xml.ver,
        items,
        uap,
    })
}

fn to_uap(
    entries: &[XmlUapItem],
    items: &BTreeMap<u16, ItemDescription>,
    path: &str,
) -> Result<Uap, LoadError> {
    if entries.is_empty() {
        return Err(LoadError::InvalidXml {
            path: path.to_string(),
            reason: "UAP declares no items".into(),
        });
    }

    let n = entries.len();
    let mut by_frn: BTreeMap<usize, &XmlUapItem> = BTreeMap::new();
    for entry in entries {
        if by_frn.insert(entry.frn, entry).is_some() {
            return Err(LoadError::InvalidXml {
                path: path.to_string(),
                reason: format!("duplicate UAP frn {}", entry.frn),
            });
        }
    }
    for frn in 1..=n {
        if !by_frn.contains_key(&frn) {
            return Err(LoadError::InvalidXml {
                path: path.to_string(),
                reason: format!("UAP missing frn {frn}"),
            });
        }
    }

    let mut slots = Vec::with_capacity(n);
    for frn in 1..=n {
        let entry = by_frn[&frn];
        let slot = match entry.item_ref.trim() {
            "-" => UapSlot::Spare,
            "RFS" => UapSlot::Rfs,
            "SPF" => UapSlot::Spf,
            other => {
                let id: u16 = other.parse().map_err(|_| LoadError::InvalidXml {
                    path: path.to_string(),
                    reason: format!("UAP frn {frn} references non-numeric item id {other:?}"),
                })?;
                if !items.contains_key(&id) {
                    return Err(LoadError::InvalidXml {
                        path: path.to_string(),
                        reason: format!("UAP frn {frn} references undefined item id {id}"),
                    });
                }
                UapSlot::Item(id)
            }
        };
        slots.push(slot);
    }

    Ok(Uap::new(slots))
}

fn to_format(content: XmlFormatContent, path: &str) -> Result<ItemFormat, LoadError> {
    match content {
        XmlFormatContent::Fixed(f) => Ok(ItemFormat::Fixed {
            length: f.length,
            bits: to_bits(&f.bits, f.length, path)?,
        }),
        XmlFormatContent::Variable(v) => {
            let mut segments = v.segments.into_iter();
            let base = segments.next().ok_or_else(|| LoadError::InvalidXml {
                path: path.to_string(),
                reason: "Variable (Extensible) format has no Fixed segments".into(),
            })?;
            let base = to_segment(base, path)?;
            let extensions = segments
                .map(|s| to_segment(s, path))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ItemFormat::Extensible { base, extensions })
        }
        XmlFormatContent::Repetitive(r) => Ok(ItemFormat::Repetitive {
            element: Box::new(ItemFormat::Fixed {
                length: r.element.length,
                bits: to_bits(&r.element.bits, r.element.length, path)?,
            }),
        }),
        XmlFormatContent::Compound(c) => {
            let sub_items = c
                .sub_items
                .into_iter()
                .map(|s| to_format(s, path))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ItemFormat::Compound { sub_items })
        }
        XmlFormatContent::Explicit(_) => Ok(ItemFormat::Explicit),
        XmlFormatContent::ExplicitSP(_) => Ok(ItemFormat::SpecialPurpose),
        XmlFormatContent::BDS(_) => Ok(ItemFormat::BDSRegister),
    }
}

fn to_segment(f: XmlFixed, path: &str) -> Result<FixedSegment, LoadError> {
    Ok(FixedSegment {
        length: f.length,
        bits: to_bits(&f.bits, f.length, path)?,
    })
}

/// `length` is the enclosing Fixed/Repetitive-element segment's byte
/// width; every `Bits` range must fit inside it (`spec.md` §4.3: "failure
/// to validate is a fatal initialization error", not a decode-time panic).
fn to_bits(bits: &[XmlBits], length: usize, path: &str) -> Result<Vec<BitField>, LoadError> {
    let width_bits = length as u32 * 8;
    bits.iter()
        .map(|b| {
            if b.from < b.to {
                return Err(LoadError::InvalidXml {
                    path: path.to_string(),
                    reason: format!("Bits from={} < to={}", b.from, b.to),
                });
            }
            if b.from > width_bits {
                return Err(LoadError::InvalidXml {
                    path: path.to_string(),
                    reason: format!(
                        "Bits from={} exceeds the segment's width of {width_bits} bit(s)",
                        b.from
                    ),
                });
            }

            // A `<BitsValue>` table always means the field is enumerated,
            // regardless of what (or whether) `encoding` names a scalar
            // type — the common ASTERIX shape for a status/mode field is
            // `<Bits encoding="Unsigned">` wrapping a `<BitsValue>` label
            // table.
            let encoding = if !b.values.is_empty() {
                Encoding::Enumerated(
                    b.values
                        .iter()
                        .map(|v| {
                            let val: u64 = v.val.parse().map_err(|_| LoadError::InvalidXml {
                                path: path.to_string(),
                                reason: format!("BitsValue val={:?} is not numeric", v.val),
                            })?;
                            Ok::<_, LoadError>((val, v.label.clone()))
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                )
            } else {
                match b.encoding.as_deref() {
                    None | Some("Unsigned") => Encoding::Unsigned,
                    Some("Signed") => Encoding::Signed,
                    Some("Hex") => Encoding::Hex,
                    Some("Octal") => Encoding::Octal,
                    Some("Ascii") => Encoding::Ascii,
                    Some("Enumerated") => Encoding::Enumerated(Vec::new()),
                    Some(other) => {
                        return Err(LoadError::InvalidXml {
                            path: path.to_string(),
                            reason: format!("unknown Bits encoding {other:?}"),
                        });
                    }
                }
            };
            let scale = match &b.scale {
                Some(s) => s.parse().map_err(|_| LoadError::InvalidXml {
                    path: path.to_string(),
                    reason: format!("Bits scale {s:?} is not a number"),
                })?,
                None => 1.0,
            };
            Ok(BitField {
                name: b.short_name.clone().unwrap_or_default(),
                from_bit: b.from,
                to_bit: b.to,
                encoding,
                scale,
                unit: None,
            })
        })
        .collect()
}
