//! End-to-end scenarios adapted from the canonical decoder test matrix:
//! minimal record, FX-extended FSPEC, truncation, repetitive overflow,
//! PCAP with a malformed middle packet, and an HDLC CRC mismatch.
//!
//! The minimal/FX-extension/truncation/overflow scenarios use a synthetic
//! category built in-process (via `DescriptionLibrary::from_categories`)
//! rather than the published CAT 048 grammar — that grammar isn't part of
//! this workspace, and reproducing it from memory risks silently getting
//! the real wire layout wrong. The scenarios preserve the same shape:
//! FSPEC with all bits set, an FX-extended FSPEC, an incomplete block, and
//! a `Repetitive` count that would overflow the guard.

use std::collections::BTreeMap;

use asterix::model::{
    BitField, CategoryDescription, DescriptionLibrary, Encoding, ItemDescription, ItemFormat, Uap,
    UapSlot,
};
use asterix::record::{DecodedValue, ItemKey};
use asterix::{Options, Parser};

fn one_byte_item(id: u16) -> ItemDescription {
    ItemDescription {
        id,
        name: format!("item{id}"),
        format: ItemFormat::Fixed {
            length: 1,
            bits: vec![BitField {
                name: "V".into(),
                from_bit: 8,
                to_bit: 1,
                encoding: Encoding::Unsigned,
                scale: 1.0,
                unit: None,
            }],
        },
    }
}

fn sac_sic_item() -> ItemDescription {
    ItemDescription {
        id: 10,
        name: "Data Source Identifier".into(),
        format: ItemFormat::Fixed {
            length: 2,
            bits: vec![
                BitField {
                    name: "SAC".into(),
                    from_bit: 16,
                    to_bit: 9,
                    encoding: Encoding::Unsigned,
                    scale: 1.0,
                    unit: None,
                },
                BitField {
                    name: "SIC".into(),
                    from_bit: 8,
                    to_bit: 1,
                    encoding: Encoding::Unsigned,
                    scale: 1.0,
                    unit: None,
                },
            ],
        },
    }
}

fn seven_item_category() -> CategoryDescription {
    let mut items = BTreeMap::new();
    items.insert(10, sac_sic_item());
    for id in 2..=7u16 {
        items.insert(id, one_byte_item(id));
    }
    CategoryDescription {
        id: 48,
        version: "test".into(),
        items,
        uap: Uap::new(vec![
            UapSlot::Item(10),
            UapSlot::Item(2),
            UapSlot::Item(3),
            UapSlot::Item(4),
            UapSlot::Item(5),
            UapSlot::Item(6),
            UapSlot::Item(7),
        ]),
    }
}

#[test]
fn s1_minimal_record_with_all_fspec_bits_set() {
    let lib = DescriptionLibrary::from_categories([seven_item_category()]);
    let mut parser = Parser::new(lib, Options::default());

    // Body = FSPEC(1) + item10(2 bytes: SAC,SIC) + six one-byte items = 9
    // bytes; CAT(1) + LEN(2) + body(9) = 12 bytes total.
    // CAT=48 LEN=12 FSPEC=0xFE(items1..7) SAC=0x80 SIC=0x01 item2..7=02..07
    let frame = [
        0x30, 0x00, 0x0c, 0xFE, 0x80, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
    ];
    let records = parser.feed(&frame);
    assert_eq!(records.len(), 1);
    let rec = &records[0];
    assert_eq!(rec.category, 48);
    assert!(!rec.is_partial());
    assert_eq!(rec.bytes_consumed, 9);
    assert_eq!(rec.items.len(), 7);
    let item10 = rec.item(ItemKey::Id(10)).unwrap();
    assert_eq!(item10.fields["SAC"], DecodedValue::Integer(0x80));
    assert_eq!(item10.fields["SIC"], DecodedValue::Integer(0x01));
}

#[test]
fn s2_fspec_with_fx_extension() {
    let mut items = BTreeMap::new();
    items.insert(1, one_byte_item(1));
    items.insert(8, one_byte_item(8));
    let category = CategoryDescription {
        id: 1,
        version: "test".into(),
        items,
        uap: Uap::new(vec![
            UapSlot::Item(1),
            UapSlot::Spare,
            UapSlot::Spare,
            UapSlot::Spare,
            UapSlot::Spare,
            UapSlot::Spare,
            UapSlot::Spare,
            UapSlot::Item(8),
        ]),
    };
    let lib = DescriptionLibrary::from_categories([category]);
    let mut parser = Parser::new(lib, Options::default());

    // FSPEC byte 1: 0xFF (FX set, bit 8 = item1 present); FSPEC byte 2:
    // bit 8 (item8, FSPEC-bit-index 8) set, FX clear = 0x80.
    let frame = [0x01, 0x00, 0x07, 0xFF, 0x80, 0xAA, 0xBB];
    let records = parser.feed(&frame);
    assert_eq!(records.len(), 1);
    assert!(!records[0].is_partial());
    assert_eq!(records[0].items.len(), 2);
}

#[test]
fn s3_truncated_block_yields_no_clean_record() {
    let lib = DescriptionLibrary::from_categories([seven_item_category()]);
    let mut parser = Parser::new(lib, Options::default());

    // Same well-formed 12-byte block as S1 (CAT=48 LEN=12
    // FSPEC=0xFE(items1..7) SAC=0x80 SIC=0x01 item2..7=02..07), but
    // delivered in two chunks so its LEN hasn't fully arrived on the
    // first `feed` call.
    let frame = [
        0x30, 0x00, 0x0c, 0xFE, 0x80, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
    ];
    let (first_chunk, rest) = frame.split_at(5);

    let records = parser.feed(first_chunk);
    // The de-muxer withholds a block whose LEN hasn't fully arrived yet,
    // so nothing is emitted; the bytes are retained rather than dropped
    // or reported as a malformed block.
    assert!(records.is_empty());

    // Feeding the remainder completes the block and yields the record
    // that was withheld, proving the first chunk's bytes were retained.
    let records = parser.feed(rest);
    assert_eq!(records.len(), 1);
    assert!(!records[0].is_partial());
    assert_eq!(records[0].items.len(), 7);
}

#[test]
fn s4_repetitive_overflow_is_marked_partial_not_panicking() {
    let mut items = BTreeMap::new();
    items.insert(
        1,
        ItemDescription {
            id: 1,
            name: "rep".into(),
            format: ItemFormat::Repetitive {
                element: Box::new(ItemFormat::Fixed {
                    length: 300,
                    bits: vec![],
                }),
            },
        },
    );
    let category = CategoryDescription {
        id: 2,
        version: "test".into(),
        items,
        uap: Uap::new(vec![UapSlot::Item(1)]),
    };
    let lib = DescriptionLibrary::from_categories([category]);
    let mut parser = Parser::new(lib, Options::default());

    // FSPEC=0x80 (item1 present), REP=255 -> 255*300 > MAX_ITEM_SIZE.
    let mut frame = vec![0x02, 0x00, 0x00, 0x80, 0xFF];
    let total_len = (frame.len() - 3) as u16 + 3;
    frame[1] = (total_len >> 8) as u8;
    frame[2] = total_len as u8;

    let records = parser.feed(&frame);
    assert_eq!(records.len(), 1);
    assert!(records[0].is_partial());
}

#[test]
fn s5_pcap_with_malformed_middle_packet_skips_only_that_packet() {
    use asterix_core::demux::pcap;

    // Fixture: three packets, the second declares `incl_len` larger than
    // the capture's `snaplen` (spec.md §8 S5) — only packets 1 and 3
    // should come back as frames.
    let buf = test_utils::load_fixture_bytes("fixtures", "sample_malformed_middle.pcap");
    let result = pcap::demux(&buf);
    assert_eq!(result.frames.len(), 2);
    assert_eq!(result.frames[0].payload, vec![0x30, 0x00, 0x06, 0x80, 0x01, 0x02]);
    assert_eq!(result.frames[1].payload, vec![0x30, 0x00, 0x06, 0x80, 0x05, 0x06]);
    assert_eq!(result.consumed, buf.len());
}

#[test]
fn s6_hdlc_crc_mismatch_drops_frame_not_stream() {
    use asterix_core::demux::hdlc;

    let good_payload = [0x30u8, 0x00, 0x03];
    let crc = {
        const ALG: crc::Algorithm<u16> = crc::Algorithm {
            width: 16,
            poly: 0x1021,
            init: 0xFFFF,
            refin: true,
            refout: true,
            xorout: 0xFFFF,
            check: 0x906E,
            residue: 0xF0B8,
        };
        crc::Crc::<u16>::new(&ALG).checksum(&good_payload)
    };
    let mut good_frame = vec![0x7E];
    good_frame.extend_from_slice(&good_payload);
    good_frame.extend_from_slice(&crc.to_le_bytes());
    good_frame.push(0x7E);

    let mut corrupt_frame = good_frame.clone();
    let last = corrupt_frame.len() - 2;
    corrupt_frame[last] ^= 0xFF;

    let mut buf = corrupt_frame;
    buf.extend(good_frame);

    let result = hdlc::demux(&buf);
    assert_eq!(result.frames.len(), 1);
    assert_eq!(result.frames[0].payload, good_payload);
}
