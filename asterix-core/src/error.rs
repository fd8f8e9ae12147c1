//! Unified error taxonomy for ASTERIX decoding.
//!
//! `spec.md` §7 defines error *kinds*, not types: every parse-time failure is
//! recovered locally (the stream keeps going) and only initialization errors
//! ever propagate to the caller. [`DecodeErrorKind`] enumerates the kinds;
//! [`LoadError`] is the narrower type returned by the XML loader, which is
//! the one path that *does* surface to the caller (§4.3: "failure to
//! validate is a fatal initialization error").

/// A parse-time error kind, paired with enough context to log and recover.
///
/// These are never returned to the top-level caller of [`crate::Parser`] —
/// they are recorded on the record/item they interrupted (see
/// [`crate::record::decoded::DecodedRecord::error`]) and logged via
/// `tracing`. See `spec.md` §7 for the full policy table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeErrorKind {
    /// The cursor ran past its bound before the requested read completed.
    #[error("truncated: needed {needed} more byte(s), {available} available")]
    Truncated { needed: usize, available: usize },

    /// `LEN` was out of range, or `CAT == 0`.
    #[error("malformed block: {reason}")]
    MalformedBlock { reason: &'static str },

    /// The FSPEC octet chain exceeded the UAP's capacity, or never cleared
    /// its FX bit before the block ran out.
    #[error("malformed FSPEC: {reason}")]
    MalformedFspec { reason: &'static str },

    /// `CAT` has no entry in the [`crate::model::DescriptionLibrary`].
    #[error("unknown category {category}")]
    UnknownCategory { category: u8 },

    /// An FSPEC bit was set whose UAP slot has no item definition.
    #[error("unknown item: category {category} frn {frn}")]
    UnknownItem { category: u8, frn: usize },

    /// `length_of` returned `0`, the item's declared length exceeds the
    /// record's remaining bytes, or an overflow guard (e.g. `Repetitive`'s
    /// `REP * element_len`) tripped.
    #[error("malformed item {item_id} in category {category}: {reason}")]
    MalformedItem {
        category: u8,
        item_id: u16,
        reason: &'static str,
    },

    /// Invalid PCAP magic, HDLC CRC mismatch, truncated FINAL/GPS header,
    /// etc.
    #[error("bad encapsulation: {reason}")]
    BadEncapsulation { reason: &'static str },
}

impl DecodeErrorKind {
    /// Emits this error at `tracing::warn!` with the category id, the
    /// offset within the block where it was detected, and the reason —
    /// exactly the three fields `spec.md` §7 requires every recovered
    /// error to carry.
    pub fn log(&self, category: u8, offset: usize) {
        tracing::warn!(category, offset, error = %self, "recovered ASTERIX decode error");
    }
}

/// Errors from [`crate::model::DescriptionLibrary`] initialization.
///
/// Unlike [`DecodeErrorKind`], these *do* propagate to the caller: `spec.md`
/// §4.3 and §5 require that a failed load leaves the library untouched and
/// reports the failure, and that loading after parsing has begun is a
/// programming error rather than a silent no-op.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The XML document violated the category DTD, referenced an undefined
    /// item id from its UAP, declared a duplicate item id, or left an `frn`
    /// slot unfilled or repeated.
    #[error("invalid category XML ({path}): {reason}")]
    InvalidXml { path: String, reason: String },

    /// Reading the XML file or walking the description directory failed.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// `load_category`/`load_from_dir` was called after the library had
    /// already been handed to a [`crate::Parser`] (or, in this
    /// single-process model, after the first successful load — see
    /// `spec.md` §5 and §7).
    #[error("description library already initialized")]
    AlreadyInitialized,
}
