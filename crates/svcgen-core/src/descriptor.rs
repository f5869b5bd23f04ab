//! Service descriptor output.

use std::fs;
use std::path::{Component, Path};

use serde::Serialize;

use crate::error::GenerateError;
use crate::log::LogSink;
use crate::selection::Selection;

/// What the writer did with a descriptor path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    /// The descriptor was created.
    Written,
    /// Something already existed at the path and was left untouched.
    AlreadyPresent,
}

/// Writes the selected implementation name to `path`.
///
/// An existing file is never overwritten, and a symbolic link at `path` counts
/// as existing even when its target is missing. The parent directory is created
/// when missing. The file content is exactly the implementation name, UTF-8,
/// with no trailing newline. On success one line is logged, naming the
/// descriptor relative to `output_dir`.
pub fn write_descriptor(
    selection: &Selection,
    path: &Path,
    output_dir: &Path,
    log: &mut dyn LogSink,
) -> Result<WriteOutcome, GenerateError> {
    if path.symlink_metadata().is_ok() {
        return Ok(WriteOutcome::AlreadyPresent);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory(parent)?;
    }

    fs::write(path, selection.implementation.as_bytes()).map_err(|source| {
        GenerateError::DescriptorWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;

    log.info(&format!(
        "Wrote {} with {}",
        display_relative(path, output_dir),
        selection.implementation
    ));
    Ok(WriteOutcome::Written)
}

fn ensure_directory(dir: &Path) -> Result<(), GenerateError> {
    if dir.is_dir() {
        return Ok(());
    }
    let created = fs::create_dir_all(dir);
    if !dir.is_dir() {
        return Err(GenerateError::DirectoryCreation {
            path: dir.to_path_buf(),
            source: created.err(),
        });
    }
    Ok(())
}

/// Renders `path` relative to `base` with '/' separators, falling back to
/// the full path when it lies outside `base`.
pub fn display_relative(path: &Path, base: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(relative) => relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.display().to_string(),
    }
}
