//! **PCAP** encapsulation: libpcap global header, then per-packet
//! Ethernet/IPv4/UDP stripping (`spec.md` §4.4, §6.3).

use crate::error::DecodeErrorKind;

use super::{DemuxResult, Frame};

const GLOBAL_HEADER_LEN: usize = 24;
const PACKET_HEADER_LEN: usize = 16;
const ETHERNET_HEADER_LEN: usize = 14;
const ETHERTYPE_IPV4: u16 = 0x0800;
const LINKTYPE_ETHERNET: u32 = 1;

struct GlobalHeader {
    little_endian: bool,
    snaplen: u32,
    link_type: u32,
}

fn u32_at(buf: &[u8], offset: usize, le: bool) -> u32 {
    let b: [u8; 4] = buf[offset..offset + 4].try_into().unwrap();
    if le { u32::from_le_bytes(b) } else { u32::from_be_bytes(b) }
}

fn u16_at(buf: &[u8], offset: usize, le: bool) -> u16 {
    let b: [u8; 2] = buf[offset..offset + 2].try_into().unwrap();
    if le { u16::from_le_bytes(b) } else { u16::from_be_bytes(b) }
}

fn parse_global_header(buf: &[u8]) -> Option<GlobalHeader> {
    if buf.len() < GLOBAL_HEADER_LEN {
        return None;
    }
    let magic_le = u32::from_le_bytes(buf[0..4].try_into().unwrap());
    let magic_be = u32::from_be_bytes(buf[0..4].try_into().unwrap());
    let little_endian = if magic_le == 0xA1B2C3D4 {
        true
    } else if magic_be == 0xA1B2C3D4 {
        false
    } else {
        return None;
    };
    Some(GlobalHeader {
        little_endian,
        snaplen: u32_at(buf, 16, little_endian),
        link_type: u32_at(buf, 20, little_endian),
    })
}

/// Strips Ethernet/IPv4/UDP headers from one packet's captured bytes,
/// returning the UDP payload. `None` on any defensive check failure —
/// the caller logs and skips the packet, never aborts the capture
/// (`spec.md` §4.4).
fn strip_link_headers(link_type: u32, packet: &[u8]) -> Option<&[u8]> {
    if link_type != LINKTYPE_ETHERNET {
        return Some(packet);
    }
    if packet.len() < ETHERNET_HEADER_LEN {
        return None;
    }
    let ethertype = u16_at(packet, 12, false);
    if ethertype != ETHERTYPE_IPV4 {
        return None;
    }
    let ip = &packet[ETHERNET_HEADER_LEN..];
    if ip.is_empty() {
        return None;
    }
    let version = ip[0] >> 4;
    if version != 4 {
        return None;
    }
    let ihl = (ip[0] & 0x0F) as usize * 4;
    if ihl < 20 || ip.len() < ihl {
        return None;
    }
    let protocol = ip[9];
    const PROTO_UDP: u8 = 17;
    if protocol != PROTO_UDP {
        return None;
    }
    let udp = &ip[ihl..];
    if udp.len() < 8 {
        return None;
    }
    Some(&udp[8..])
}

/// Demultiplexes a complete (or header-and-whole-packets-prefix) PCAP
/// buffer. Stops cleanly at the first incomplete trailing packet, leaving
/// it unconsumed for the next call.
pub fn demux(buf: &[u8]) -> DemuxResult {
    let Some(header) = parse_global_header(buf) else {
        return DemuxResult::default();
    };

    let mut frames = Vec::new();
    let mut offset = GLOBAL_HEADER_LEN;

    loop {
        if buf.len() - offset < PACKET_HEADER_LEN {
            break;
        }
        let ts_sec = u32_at(buf, offset, header.little_endian);
        let ts_usec = u32_at(buf, offset + 4, header.little_endian);
        let incl_len = u32_at(buf, offset + 8, header.little_endian) as usize;
        let record_start = offset;
        offset += PACKET_HEADER_LEN;

        if buf.len() - offset < incl_len {
            // trailing packet not fully captured yet
            offset = record_start;
            break;
        }
        let packet = &buf[offset..offset + incl_len];
        offset += incl_len;

        if incl_len as u32 > header.snaplen {
            let err = DecodeErrorKind::BadEncapsulation {
                reason: "PCAP packet incl_len exceeds snaplen",
            };
            err.log(0, record_start);
            continue;
        }

        let Some(payload) = strip_link_headers(header.link_type, packet) else {
            let err = DecodeErrorKind::BadEncapsulation {
                reason: "PCAP packet failed Ethernet/IPv4/UDP strip",
            };
            err.log(0, record_start);
            continue;
        };

        frames.push(Frame {
            timestamp: Some(ts_sec as f64 + ts_usec as f64 * 1e-6),
            payload: payload.to_vec(),
        });
    }

    DemuxResult { frames, consumed: offset }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn le_global_header(snaplen: u32, link_type: u32) -> Vec<u8> {
        let mut h = Vec::new();
        h.extend_from_slice(&0xA1B2C3D4u32.to_le_bytes());
        h.extend_from_slice(&2u16.to_le_bytes()); // version_major
        h.extend_from_slice(&4u16.to_le_bytes()); // version_minor
        h.extend_from_slice(&0i32.to_le_bytes()); // thiszone
        h.extend_from_slice(&0u32.to_le_bytes()); // sigfigs
        h.extend_from_slice(&snaplen.to_le_bytes());
        h.extend_from_slice(&link_type.to_le_bytes());
        h
    }

    fn packet_record(ts_sec: u32, ts_usec: u32, data: &[u8]) -> Vec<u8> {
        let mut r = Vec::new();
        r.extend_from_slice(&ts_sec.to_le_bytes());
        r.extend_from_slice(&ts_usec.to_le_bytes());
        r.extend_from_slice(&(data.len() as u32).to_le_bytes());
        r.extend_from_slice(&(data.len() as u32).to_le_bytes());
        r.extend_from_slice(data);
        r
    }

    #[test]
    fn raw_linktype_passes_payload_through() {
        let mut buf = le_global_header(65535, 0); // LINKTYPE_NULL, no strip
        buf.extend(packet_record(1, 500_000, &[0x30, 0x00, 0x03]));
        let result = demux(&buf);
        assert_eq!(result.frames.len(), 1);
        assert_eq!(result.frames[0].payload, vec![0x30, 0x00, 0x03]);
        assert_eq!(result.frames[0].timestamp, Some(1.5));
        assert_eq!(result.consumed, buf.len());
    }

    #[test]
    fn ethernet_ipv4_udp_is_stripped() {
        let mut eth = vec![0u8; 14];
        eth[12] = 0x08;
        eth[13] = 0x00; // IPv4 ethertype
        let mut ip = vec![0u8; 20];
        ip[0] = 0x45; // version 4, IHL 5
        ip[9] = 17; // UDP
        let udp = vec![0u8; 8];
        let asterix = [0x30u8, 0x00, 0x03];
        let mut packet = eth;
        packet.extend(ip);
        packet.extend(udp);
        packet.extend(asterix);

        let mut buf = le_global_header(65535, LINKTYPE_ETHERNET);
        buf.extend(packet_record(0, 0, &packet));
        let result = demux(&buf);
        assert_eq!(result.frames.len(), 1);
        assert_eq!(result.frames[0].payload, vec![0x30, 0x00, 0x03]);
    }

    #[test]
    fn incl_len_over_snaplen_is_skipped_not_fatal() {
        let mut buf = le_global_header(4, 0); // snaplen smaller than packet
        buf.extend(packet_record(0, 0, &[0x30, 0x00, 0x03, 0x01, 0x02]));
        buf.extend(packet_record(0, 0, &[0x01, 0x00, 0x03]));
        let result = demux(&buf);
        assert_eq!(result.frames.len(), 1);
        assert_eq!(result.frames[0].payload, vec![0x01, 0x00, 0x03]);
    }

    #[test]
    fn truncated_trailing_packet_is_left_unconsumed() {
        let mut buf = le_global_header(65535, 0);
        buf.extend(packet_record(0, 0, &[0x30, 0x00, 0x03]));
        let full_len = buf.len();
        buf.extend_from_slice(&[0u8; 10]); // partial next record header
        let result = demux(&buf);
        assert_eq!(result.consumed, full_len);
        assert_eq!(result.frames.len(), 1);
    }
}
