//! The narrow "input source" contract transport-layer I/O is expected to
//! implement (`spec.md` §1, §6.4). File/stdin/UDP/TCP/serial delivery is an
//! external collaborator; this trait is all the demultiplexing layer needs
//! from it.

/// Supplies raw bytes to a [`crate::Parser`].
///
/// By contract (`spec.md` §5) the caller arranges how `read_chunk` behaves
/// — synchronous blocking I/O, non-blocking with readiness, or chunked
/// calls — the parser itself never blocks or suspends.
pub trait InputSource {
    /// Fills as much of `buf` as is currently available, returning the
    /// number of bytes written. `Ok(0)` signals end of stream.
    fn read_chunk(&mut self, buf: &mut [u8]) -> std::io::Result<usize>;
}

/// Drains `source` to exhaustion into one buffer. Encapsulations that are
/// naturally whole-capture (PCAP in particular) use this rather than
/// `Parser`'s incremental `feed`.
pub fn read_all(source: &mut dyn InputSource) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut chunk = [0u8; 64 * 1024];
    loop {
        let n = source.read_chunk(&mut chunk)?;
        if n == 0 {
            break;
        }
        out.extend_from_slice(&chunk[..n]);
    }
    Ok(out)
}
