//! Enumeration of compiled classes in the module output directory.

use std::path::Path;

use walkdir::WalkDir;

use crate::error::GenerateError;

/// Suffix of compiled class files.
pub const CLASS_SUFFIX: &str = ".class";

/// Lists the fully-qualified name of every class file beneath `classes_dir`.
///
/// Names are derived from relative paths (`its/BasicPlugin.class` becomes
/// `its.BasicPlugin`). The walk is sorted by file name so the result is
/// stable across runs, and follows symbolic links to both files and
/// package directories. A missing or empty directory yields an empty list;
/// a link loop is a scan error.
pub fn enumerate_classes(classes_dir: &Path) -> Result<Vec<String>, GenerateError> {
    if !classes_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    let walker = WalkDir::new(classes_dir)
        .follow_links(true)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|source| GenerateError::Scan {
            path: classes_dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(classes_dir) else {
            continue;
        };
        if let Some(name) = class_name_for(relative) {
            names.push(name);
        }
    }
    Ok(names)
}

/// Converts a relative class file path into a dotted class name.
fn class_name_for(relative: &Path) -> Option<String> {
    let segments: Vec<String> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    let (file_name, packages) = segments.split_last()?;
    let simple_name = file_name.strip_suffix(CLASS_SUFFIX)?;
    if simple_name.is_empty() {
        return None;
    }

    let mut name = String::new();
    for package in packages {
        name.push_str(package);
        name.push('.');
    }
    name.push_str(simple_name);
    Some(name)
}
