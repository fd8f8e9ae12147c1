//! Thin facade over [`asterix_core`]. External collaborators — the
//! command-line front-end, language-binding wrappers — depend on this
//! crate rather than on `asterix-core` directly, so the core's module
//! layout can change without breaking them.

pub use asterix_core::*;

/// Re-export under an explicit path too, for callers that prefer
/// `asterix::core::Parser` over the flattened root re-export.
pub mod core {
    pub use asterix_core::*;
}
