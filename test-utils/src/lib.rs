//! Shared test fixture helpers for the asterix workspace.
//!
//! Fixtures live under the workspace-root `testdata/` directory: valid and
//! invalid category description XML under `valid/`/`invalid/`, and raw /
//! PCAP byte captures under `fixtures/`. Every crate's tests resolve this
//! directory relative to its own `CARGO_MANIFEST_DIR` rather than assuming
//! a fixed depth, so the helper works the same whether it's called from
//! `asterix-core`'s own `tests/` or from the `asterix` facade's.

use std::fs;
use std::path::PathBuf;

/// Locates the workspace-level `testdata/` directory from whichever
/// crate's `tests/` is currently running.
pub fn testdata_dir() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        manifest_dir.join("testdata"),
        manifest_dir.join("../testdata"),
        manifest_dir.join("../../testdata"),
    ];
    for candidate in &candidates {
        if candidate.exists() {
            return candidate.canonicalize().unwrap_or_else(|_| candidate.clone());
        }
    }
    manifest_dir.join("../testdata")
}

/// Path to one fixture file. `category` is `"valid"`, `"invalid"`, or
/// `"fixtures"`.
pub fn fixture_path(category: &str, filename: &str) -> PathBuf {
    testdata_dir().join(category).join(filename)
}

/// Reads a text fixture (category description XML) to a `String`.
pub fn load_fixture(category: &str, filename: &str) -> String {
    let path = fixture_path(category, filename);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

/// Reads a binary fixture (`.raw` or `.pcap` capture) to bytes.
pub fn load_fixture_bytes(category: &str, filename: &str) -> Vec<u8> {
    let path = fixture_path(category, filename);
    fs::read(&path).unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

/// Every `*.xml` file directly under `testdata/valid` or `testdata/invalid`.
pub fn list_xml_fixtures(category: &str) -> Vec<PathBuf> {
    let dir = testdata_dir().join(category);
    let Ok(entries) = fs::read_dir(&dir) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("xml"))
        .collect();
    paths.sort();
    paths
}
