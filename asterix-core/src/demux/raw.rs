//! **Raw** encapsulation: passthrough, no timestamp (`spec.md` §4.4).

use super::{DemuxResult, Frame};

/// Demultiplexes a complete (or complete-blocks-prefix) Raw buffer: one or
/// more back-to-back `CAT|LEN|body` data blocks. Stops cleanly at the
/// first block whose declared `LEN` hasn't fully arrived yet, leaving it
/// unconsumed for the next call, mirroring `pcap::demux`'s handling of a
/// trailing partial packet.
///
/// A `LEN < 3` can never be completed by more bytes — it's not a
/// truncation, it's already invalid — so that block and everything after
/// it is handed off as-is; the block splitter reports it as malformed.
pub fn demux(buf: &[u8]) -> DemuxResult {
    if buf.is_empty() {
        return DemuxResult::default();
    }

    let mut consumed = 0;
    loop {
        let remaining = &buf[consumed..];
        if remaining.len() < 3 {
            break;
        }
        let len = u16::from_be_bytes([remaining[1], remaining[2]]) as usize;
        if len < 3 {
            consumed = buf.len();
            break;
        }
        if len > remaining.len() {
            break;
        }
        consumed += len;
    }

    if consumed == 0 {
        return DemuxResult::default();
    }

    DemuxResult {
        frames: vec![Frame {
            timestamp: None,
            payload: buf[..consumed].to_vec(),
        }],
        consumed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumes_one_complete_block() {
        let buf = [0x30u8, 0x00, 0x05, 0xAA, 0xBB];
        let result = demux(&buf);
        assert_eq!(result.consumed, 5);
        assert_eq!(result.frames[0].payload, buf.to_vec());
        assert_eq!(result.frames[0].timestamp, None);
    }

    #[test]
    fn consumes_two_back_to_back_blocks_as_one_frame() {
        let buf = [0x01u8, 0x00, 0x05, 0x11, 0x22, 0x07, 0x00, 0x04, 0x33];
        let result = demux(&buf);
        assert_eq!(result.consumed, buf.len());
        assert_eq!(result.frames[0].payload, buf.to_vec());
    }

    #[test]
    fn retains_an_incomplete_block_entirely() {
        // Claims LEN=11 but only 5 bytes are present.
        let buf = [0x30u8, 0x00, 0x0b, 0xFE, 0x80];
        let result = demux(&buf);
        assert_eq!(result.consumed, 0);
        assert!(result.frames.is_empty());
    }

    #[test]
    fn retains_only_the_incomplete_tail_after_a_complete_leading_block() {
        let mut buf = vec![0x01u8, 0x00, 0x05, 0x11, 0x22]; // complete, len 5
        buf.extend_from_slice(&[0x02, 0x00, 0x0a, 0x80]); // claims 10, has 4
        let result = demux(&buf);
        assert_eq!(result.consumed, 5);
        assert_eq!(result.frames[0].payload, vec![0x01, 0x00, 0x05, 0x11, 0x22]);
    }

    #[test]
    fn a_len_below_three_can_never_complete_so_the_rest_is_handed_off() {
        let buf = [0x30u8, 0x00, 0x02, 0xAA, 0xBB];
        let result = demux(&buf);
        assert_eq!(result.consumed, buf.len());
        assert_eq!(result.frames[0].payload, buf.to_vec());
    }

    #[test]
    fn empty_buffer_yields_no_frames() {
        let result = demux(&[]);
        assert!(result.frames.is_empty());
        assert_eq!(result.consumed, 0);
    }
}
