//! Hashing helpers for checking that generation output is reproducible.
//!
//! A run's output is captured as the BLAKE3 hash of every file beneath a
//! directory, keyed by relative path. Two runs are byte-identical exactly
//! when their [`TreeHashes`] are equal.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Relative path ('/'-separated) -> BLAKE3 hex digest.
pub type TreeHashes = BTreeMap<String, String>;

/// Compute the BLAKE3 hash of data as a hex string.
pub fn compute_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Hash every regular file beneath `root`.
///
/// A missing root yields an empty map.
pub fn hash_tree(root: &Path) -> TreeHashes {
    let mut hashes = TreeHashes::new();
    if !root.exists() {
        return hashes;
    }
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.expect("Failed to walk output tree");
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .expect("walked path is under root")
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let content = fs::read(entry.path()).expect("Failed to read output file");
        hashes.insert(relative, compute_hash(&content));
    }
    hashes
}
