//! Generic, description-driven decoding of the EUROCONTROL ASTERIX
//! surveillance data exchange format.
//!
//! An untrusted byte stream, once de-multiplexed from its encapsulation
//! ([`demux`]) and split into data blocks ([`block`]), is decoded against
//! a runtime-loaded [`model::DescriptionLibrary`] record by record
//! ([`record`]) and rendered through one of the stateless [`encode`]
//! visitors. [`Parser`] ties the pipeline together; [`io::InputSource`] is
//! the only contract this crate expects of whatever supplies it bytes.

pub mod block;
pub mod cursor;
pub mod demux;
pub mod encode;
pub mod error;
pub mod io;
pub mod model;
pub mod record;
mod xml;

pub use io::InputSource;

use std::sync::Arc;

use model::DescriptionLibrary;
use record::DecodedRecord;

/// Which encapsulation [`Parser::feed`] expects its input to be wrapped in
/// (`spec.md` §6.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encapsulation {
    #[default]
    Raw,
    Pcap,
    Hdlc,
    Final,
    Gps,
}

/// Tunables for a [`Parser`] instance (`spec.md` §6.4).
#[derive(Debug, Clone)]
pub struct Options {
    pub encapsulation: Encapsulation,
    /// Upper bound on a single decoded item's byte size, shared with
    /// [`record::format::MAX_ITEM_SIZE`]'s `Repetitive` guard.
    pub max_message_size: usize,
    pub max_blocks_per_call: usize,
    pub verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            encapsulation: Encapsulation::Raw,
            max_message_size: 65536,
            max_blocks_per_call: 10000,
            verbose: false,
        }
    }
}

/// Owns a parsing pipeline's cursor, scratch buffer, and frozen view of the
/// description library (`spec.md` §5: "a parser instance is not safe to
/// use from multiple threads concurrently").
pub struct Parser {
    library: Arc<DescriptionLibrary>,
    options: Options,
    /// Bytes handed to `feed` but not yet resolved into complete frames;
    /// carried across calls so a de-muxer never needs its own resumable
    /// state (`spec.md` §5: "retains enough state to resume").
    buffer: Vec<u8>,
}

impl Parser {
    /// Freezes `library` and takes ownership of it. Concurrent parsers
    /// share the same catalogue by holding their own `Arc` (construct one
    /// `DescriptionLibrary`, then `Parser::new` is only called once per
    /// stream — share the frozen library across streams by cloning the
    /// `Arc` obtained from [`Self::library`] of a first instance, or by
    /// freezing it externally before constructing further parsers).
    pub fn new(mut library: DescriptionLibrary, options: Options) -> Self {
        library.freeze();
        Self {
            library: Arc::new(library),
            options,
            buffer: Vec::new(),
        }
    }

    /// Constructs a `Parser` sharing an already-frozen library with other
    /// parser instances.
    pub fn with_shared_library(library: Arc<DescriptionLibrary>, options: Options) -> Self {
        Self {
            library,
            options,
            buffer: Vec::new(),
        }
    }

    pub fn library(&self) -> &Arc<DescriptionLibrary> {
        &self.library
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Appends `bytes` to the internal buffer and decodes as many complete
    /// records as the buffer currently allows; undecodable trailing bytes
    /// are retained for the next call (`spec.md` §6.4).
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<DecodedRecord> {
        self.buffer.extend_from_slice(bytes);
        let mut out = Vec::new();

        loop {
            let result = match self.options.encapsulation {
                Encapsulation::Raw => demux::raw::demux(&self.buffer),
                Encapsulation::Pcap => demux::pcap::demux(&self.buffer),
                Encapsulation::Hdlc => demux::hdlc::demux(&self.buffer),
                Encapsulation::Final => demux::final_format::demux(&self.buffer),
                Encapsulation::Gps => demux::gps::demux(&self.buffer),
            };

            if result.consumed == 0 {
                break;
            }

            for frame in &result.frames {
                for raw_block in block::BlockSplitter::new(&frame.payload) {
                    match raw_block {
                        Ok(b) => match self.library.category(b.category) {
                            Some(cat_desc) => {
                                out.extend(record::parse_records(cat_desc, b.body, frame.timestamp));
                            }
                            None => {
                                error::DecodeErrorKind::UnknownCategory { category: b.category }
                                    .log(b.category, 0);
                            }
                        },
                        Err(_) => { /* already logged by BlockSplitter */ }
                    }
                }
            }

            self.buffer.drain(..result.consumed);
            if self.buffer.is_empty() {
                break;
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BitField, CategoryDescription, Encoding, ItemDescription, ItemFormat, Uap, UapSlot};
    use std::collections::BTreeMap;

    fn cat048_single_item() -> CategoryDescription {
        let mut items = BTreeMap::new();
        items.insert(
            10,
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
            },
        );
        CategoryDescription {
            id: 48,
            version: "1.21".into(),
            items,
            uap: Uap::new(vec![UapSlot::Item(10)]),
        }
    }

    #[test]
    fn feed_decodes_one_block_against_library() {
        let lib = DescriptionLibrary::from_categories([cat048_single_item()]);
        let mut parser = Parser::new(lib, Options::default());
        assert!(parser.library().is_frozen());

        // CAT=48 LEN=6 FSPEC=0x80 (item 10 present) SAC=0x80 SIC=0x01.
        let frame = [0x30u8, 0x00, 0x06, 0x80, 0x80, 0x01];
        let records = parser.feed(&frame);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, 48);
        assert!(!records[0].is_partial());
        assert_eq!(records[0].bytes_consumed, 3);
    }

    #[test]
    fn feed_logs_and_skips_unknown_category() {
        let lib = DescriptionLibrary::from_categories([]);
        let mut parser = Parser::new(lib, Options::default());
        let frame = [0x30u8, 0x00, 0x06, 0x80, 0x80, 0x01];
        let records = parser.feed(&frame);
        assert!(records.is_empty());
    }

    #[test]
    fn options_default_matches_spec() {
        let opts = Options::default();
        assert_eq!(opts.max_message_size, 65536);
        assert_eq!(opts.max_blocks_per_call, 10000);
        assert_eq!(opts.encapsulation, Encapsulation::Raw);
    }
}
