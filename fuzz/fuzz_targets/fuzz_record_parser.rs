#![no_main]

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use asterix_core::model::{
    BitField, CategoryDescription, DescriptionLibrary, Encoding, FixedSegment, ItemDescription,
    ItemFormat, Uap, UapSlot,
};
use asterix_core::{Options, Parser};
use libfuzzer_sys::fuzz_target;

fn one_byte(id: u16) -> ItemDescription {
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

/// A category exercising every `ItemFormat` variant, so the fuzzer's
/// mutated FSPEC bits reach `Extensible`/`Repetitive`/`Compound`/`Explicit`
/// /`SpecialPurpose`/`BDSRegister` dispatch, not just `Fixed`.
fn library() -> Arc<DescriptionLibrary> {
    static LIB: OnceLock<Arc<DescriptionLibrary>> = OnceLock::new();
    LIB.get_or_init(|| {
        let mut items = BTreeMap::new();
        items.insert(1, one_byte(1));
        items.insert(
            2,
            ItemDescription {
                id: 2,
                name: "extensible".into(),
                format: ItemFormat::Extensible {
                    base: FixedSegment { length: 1, bits: vec![] },
                    extensions: vec![FixedSegment { length: 1, bits: vec![] }],
                },
            },
        );
        items.insert(
            3,
            ItemDescription {
                id: 3,
                name: "repetitive".into(),
                format: ItemFormat::Repetitive {
                    element: Box::new(ItemFormat::Fixed { length: 2, bits: vec![] }),
                },
            },
        );
        items.insert(
            4,
            ItemDescription {
                id: 4,
                name: "compound".into(),
                format: ItemFormat::Compound {
                    sub_items: vec![
                        ItemFormat::Fixed { length: 1, bits: vec![] },
                        ItemFormat::Fixed { length: 2, bits: vec![] },
                    ],
                },
            },
        );
        items.insert(5, ItemDescription { id: 5, name: "explicit".into(), format: ItemFormat::Explicit });
        items.insert(6, ItemDescription { id: 6, name: "special".into(), format: ItemFormat::SpecialPurpose });
        items.insert(7, ItemDescription { id: 7, name: "bds".into(), format: ItemFormat::BDSRegister });

        let category = CategoryDescription {
            id: 1,
            version: "fuzz".into(),
            items,
            uap: Uap::new(vec![
                UapSlot::Item(1),
                UapSlot::Item(2),
                UapSlot::Item(3),
                UapSlot::Item(4),
                UapSlot::Item(5),
                UapSlot::Item(6),
                UapSlot::Item(7),
                UapSlot::Rfs,
                UapSlot::Spf,
            ]),
        };
        let mut lib = DescriptionLibrary::from_categories([category]);
        lib.freeze();
        Arc::new(lib)
    })
    .clone()
}

// No-infinite-loops and bounded-reads properties (spec.md §8(2)(3)): for
// any input of any length, `Parser::feed` must terminate and never read
// outside `data`, regardless of how malformed the FSPEC/item lengths are.
fuzz_target!(|data: &[u8]| {
    let mut parser = Parser::with_shared_library(library(), Options::default());
    let _ = parser.feed(data);
});
