//! **HDLC** encapsulation: `0x7E`-delimited frames with RFC-1662-style
//! byte-stuffing and a CRC-16/X-25 trailer (`spec.md` §4.4, §6.3).

use crate::error::DecodeErrorKind;

use super::{DemuxResult, Frame};

const FLAG: u8 = 0x7E;
const ESC: u8 = 0x7D;
const ESC_XOR: u8 = 0x20;

const CRC_X25: crc::Algorithm<u16> = crc::Algorithm {
    width: 16,
    poly: 0x1021,
    init: 0xFFFF,
    refin: true,
    refout: true,
    xorout: 0xFFFF,
    check: 0x906E,
    residue: 0xF0B8,
};

fn crc16_x25(data: &[u8]) -> u16 {
    crc::Crc::<u16>::new(&CRC_X25).checksum(data)
}

fn unstuff(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        if data[i] == ESC && i + 1 < data.len() {
            out.push(data[i + 1] ^ ESC_XOR);
            i += 2;
        } else {
            out.push(data[i]);
            i += 1;
        }
    }
    out
}

/// Scans `buf` for `0x7E`-delimited frames. A frame whose CRC does not
/// match is dropped and the next frame is attempted (`spec.md` §4.4).
/// Bytes after the last recognized flag are left unconsumed in case the
/// terminating flag hasn't arrived yet.
pub fn demux(buf: &[u8]) -> DemuxResult {
    let flag_positions: Vec<usize> = buf
        .iter()
        .enumerate()
        .filter(|(_, &b)| b == FLAG)
        .map(|(i, _)| i)
        .collect();

    let mut frames = Vec::new();
    let mut consumed = 0usize;

    for pair in flag_positions.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        consumed = end;

        if end <= start + 1 {
            continue; // two adjacent flags: no frame between them
        }
        let unstuffed = unstuff(&buf[start + 1..end]);
        if unstuffed.len() < 2 {
            let err = DecodeErrorKind::BadEncapsulation {
                reason: "HDLC frame shorter than its CRC trailer",
            };
            err.log(0, start);
            continue;
        }
        let (payload, crc_bytes) = unstuffed.split_at(unstuffed.len() - 2);
        let expected = u16::from_le_bytes([crc_bytes[0], crc_bytes[1]]);
        if crc16_x25(payload) != expected {
            let err = DecodeErrorKind::BadEncapsulation {
                reason: "HDLC CRC-16 mismatch",
            };
            err.log(0, start);
            continue;
        }
        frames.push(Frame {
            timestamp: None,
            payload: payload.to_vec(),
        });
    }

    DemuxResult { frames, consumed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framed(payload: &[u8]) -> Vec<u8> {
        let crc = crc16_x25(payload).to_le_bytes();
        let mut stuffed = Vec::new();
        for &b in payload.iter().chain(crc.iter()) {
            if b == FLAG || b == ESC {
                stuffed.push(ESC);
                stuffed.push(b ^ ESC_XOR);
            } else {
                stuffed.push(b);
            }
        }
        let mut out = vec![FLAG];
        out.extend(stuffed);
        out.push(FLAG);
        out
    }

    #[test]
    fn valid_frame_round_trips() {
        let payload = [0x30u8, 0x00, 0x03];
        let buf = framed(&payload);
        let result = demux(&buf);
        assert_eq!(result.frames.len(), 1);
        assert_eq!(result.frames[0].payload, payload);
        assert_eq!(result.consumed, buf.len());
    }

    #[test]
    fn crc_mismatch_drops_frame_and_continues() {
        let payload = [0x30u8, 0x00, 0x03];
        let mut buf = framed(&payload);
        let next = framed(&[0x01u8, 0x00, 0x03]);
        let corrupt_idx = buf.len() - 2;
        buf[corrupt_idx] ^= 0xFF;
        buf.extend(next);
        let result = demux(&buf);
        assert_eq!(result.frames.len(), 1);
        assert_eq!(result.frames[0].payload, vec![0x01, 0x00, 0x03]);
    }

    #[test]
    fn byte_stuffing_is_reversed() {
        let payload = [0x7Eu8, 0x7D, 0x01];
        let buf = framed(&payload);
        let result = demux(&buf);
        assert_eq!(result.frames[0].payload, payload);
    }
}
