//! **GPS** encapsulation: like FINAL, but with a GPS-formatted timestamp
//! (`spec.md` §4.4, §6.3).
//!
//! Same caveat as [`super::final_format`]: no original-language reference
//! survived retrieval, so the exact header is a documented resolution of
//! an open question, not a recovered fact. Header: `seconds: u32 BE`,
//! `nanos: u32 BE`, `length: u32 BE`, then the payload.

use super::{DemuxResult, Frame};

const HEADER_LEN: usize = 12;

pub fn demux(buf: &[u8]) -> DemuxResult {
    let mut frames = Vec::new();
    let mut offset = 0usize;

    while buf.len() - offset >= HEADER_LEN {
        let seconds = u32::from_be_bytes(buf[offset..offset + 4].try_into().unwrap());
        let nanos = u32::from_be_bytes(buf[offset + 4..offset + 8].try_into().unwrap());
        let length = u32::from_be_bytes(buf[offset + 8..offset + 12].try_into().unwrap()) as usize;
        let body_start = offset + HEADER_LEN;
        if buf.len() - body_start < length {
            break;
        }
        frames.push(Frame {
            timestamp: Some(seconds as f64 + nanos as f64 * 1e-9),
            payload: buf[body_start..body_start + length].to_vec(),
        });
        offset = body_start + length;
    }

    DemuxResult { frames, consumed: offset }
}
