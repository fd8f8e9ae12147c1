//! **FINAL** encapsulation: a length-and-timestamp header precedes each
//! payload (`spec.md` §4.4, §6.3).
//!
//! The wire header isn't pinned down by the distilled spec beyond "a
//! header carrying a length and timestamp precedes each payload"; no
//! original-language reference implementation survived retrieval either.
//! This module fixes a concrete 8-byte header — `length: u32 BE` (payload
//! length, not including this header) followed by `seconds: u32 BE` (Unix
//! timestamp) — documented as a resolved open question rather than a
//! silently invented one.

use super::{DemuxResult, Frame};

const HEADER_LEN: usize = 8;

pub fn demux(buf: &[u8]) -> DemuxResult {
    let mut frames = Vec::new();
    let mut offset = 0usize;

    while buf.len() - offset >= HEADER_LEN {
        let length = u32::from_be_bytes(buf[offset..offset + 4].try_into().unwrap()) as usize;
        let seconds = u32::from_be_bytes(buf[offset + 4..offset + 8].try_into().unwrap());
        let body_start = offset + HEADER_LEN;
        if buf.len() - body_start < length {
            break; // trailing payload not fully arrived yet
        }
        frames.push(Frame {
            timestamp: Some(seconds as f64),
            payload: buf[body_start..body_start + length].to_vec(),
        });
        offset = body_start + length;
    }

    DemuxResult { frames, consumed: offset }
}
