//! DataBlock splitting: `CAT(1B) | LEN(2B, big-endian) | RECORDS`
//! (`spec.md` §3, §4.6 state 1).

use crate::cursor::ByteCursor;
use crate::error::DecodeErrorKind;

/// One data block's category and record payload (the bytes after `CAT` and
/// `LEN`, i.e. `LEN - 3` bytes).
pub struct RawBlock<'a> {
    pub category: u8,
    pub body: &'a [u8],
}

/// Splits a frame (one or more back-to-back data blocks, as produced by an
/// encapsulation de-multiplexer) into its constituent blocks.
///
/// A malformed block header consumes the rest of the frame and yields one
/// `Err` (`spec.md` §4.6 state 1: "consume `LEN` bytes if `LEN ≤ remaining`
/// else consume everything, do not emit a record") — the iterator then
/// ends, since nothing in the frame can be trusted to realign after a
/// broken length field.
pub struct BlockSplitter<'a> {
    cursor: ByteCursor<'a>,
    done: bool,
}

impl<'a> BlockSplitter<'a> {
    pub fn new(frame: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(frame),
            done: false,
        }
    }
}

impl<'a> Iterator for BlockSplitter<'a> {
    type Item = Result<RawBlock<'a>, DecodeErrorKind>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.cursor.is_empty() {
            return None;
        }

        let category = match self.cursor.take_u8() {
            Ok(b) => b,
            Err(_) => {
                self.done = true;
                return None;
            }
        };

        let len = match self.cursor.take_u16_be() {
            Ok(l) => l as usize,
            Err(_) => {
                self.done = true;
                let err = DecodeErrorKind::MalformedBlock {
                    reason: "truncated LEN field",
                };
                err.log(category, self.cursor.offset());
                return Some(Err(err));
            }
        };

        if len < 3 {
            self.done = true;
            let err = DecodeErrorKind::MalformedBlock { reason: "LEN < 3" };
            err.log(category, self.cursor.offset());
            return Some(Err(err));
        }

        let body_len = len - 3;
        if body_len > self.cursor.remaining() {
            self.done = true;
            let err = DecodeErrorKind::MalformedBlock {
                reason: "LEN exceeds remaining buffer",
            };
            err.log(category, self.cursor.offset());
            return Some(Err(err));
        }

        let body = self
            .cursor
            .take_slice(body_len)
            .expect("body_len already checked against remaining");

        if category == 0 {
            let err = DecodeErrorKind::MalformedBlock { reason: "CAT == 0" };
            err.log(category, self.cursor.offset());
            return Some(Err(err));
        }

        Some(Ok(RawBlock { category, body }))
    }
}
