//! Synthetic class files and jars for tests.
//!
//! Enabled for this crate's own tests and, through the `test-fixtures`
//! feature, for downstream test crates.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::classfile::CLASS_MAGIC;

const ACC_PUBLIC: u16 = 0x0001;
const ACC_SUPER: u16 = 0x0020;
const ACC_INTERFACE: u16 = 0x0200;
const ACC_ABSTRACT: u16 = 0x0400;

/// Builder for the bytes of a minimal, header-only class file.
#[derive(Debug, Clone)]
pub struct ClassBytes {
    name: String,
    super_class: Option<String>,
    interfaces: Vec<String>,
    access_flags: u16,
    major_version: u16,
    long_constant: bool,
}

impl ClassBytes {
    /// A public class extending `java.lang.Object`.
    pub fn class(name: &str) -> Self {
        Self {
            name: name.to_string(),
            super_class: Some("java.lang.Object".to_string()),
            interfaces: Vec::new(),
            access_flags: ACC_PUBLIC | ACC_SUPER,
            major_version: 52,
            long_constant: false,
        }
    }

    /// A public interface.
    pub fn interface(name: &str) -> Self {
        Self {
            access_flags: ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT,
            ..Self::class(name)
        }
    }

    /// Sets the direct superclass.
    pub fn extends(mut self, super_class: &str) -> Self {
        self.super_class = Some(super_class.to_string());
        self
    }

    /// Removes the superclass entry (only valid for root types).
    pub fn no_super(mut self) -> Self {
        self.super_class = None;
        self
    }

    /// Adds a directly implemented interface.
    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    /// Puts a two-slot long constant at the front of the pool.
    pub fn with_long_constant(mut self) -> Self {
        self.long_constant = true;
        self
    }

    /// The dotted name this class declares.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encodes the class file.
    pub fn build(&self) -> Vec<u8> {
        let mut pool = Vec::new();
        let mut next_index: u16 = 1;

        if self.long_constant {
            pool.push(5);
            pool.extend_from_slice(&42u64.to_be_bytes());
            next_index += 2;
        }

        let this_index = push_class(&mut pool, &mut next_index, &self.name);
        let super_index = match &self.super_class {
            Some(name) => push_class(&mut pool, &mut next_index, name),
            None => 0,
        };
        let interface_indices: Vec<u16> = self
            .interfaces
            .iter()
            .map(|name| push_class(&mut pool, &mut next_index, name))
            .collect();

        let mut out = Vec::new();
        out.extend_from_slice(&CLASS_MAGIC.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&self.major_version.to_be_bytes());
        out.extend_from_slice(&next_index.to_be_bytes());
        out.extend_from_slice(&pool);
        out.extend_from_slice(&self.access_flags.to_be_bytes());
        out.extend_from_slice(&this_index.to_be_bytes());
        out.extend_from_slice(&super_index.to_be_bytes());
        out.extend_from_slice(&(interface_indices.len() as u16).to_be_bytes());
        for index in interface_indices {
            out.extend_from_slice(&index.to_be_bytes());
        }
        // fields, methods, attributes
        out.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
        out
    }

    /// Path of this class relative to a classpath root.
    pub fn relative_path(&self) -> PathBuf {
        class_relative_path(&self.name)
    }

    /// Writes the class file beneath a compiled-classes directory.
    pub fn write_to(&self, classes_dir: &Path) -> io::Result<PathBuf> {
        let path = classes_dir.join(self.relative_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, self.build())?;
        Ok(path)
    }
}

fn push_class(pool: &mut Vec<u8>, next_index: &mut u16, name: &str) -> u16 {
    let internal = name.replace('.', "/");
    pool.push(1);
    pool.extend_from_slice(&(internal.len() as u16).to_be_bytes());
    pool.extend_from_slice(internal.as_bytes());
    pool.push(7);
    pool.extend_from_slice(&next_index.to_be_bytes());
    let class_index = *next_index + 1;
    *next_index += 2;
    class_index
}

/// Relative path of a dotted class name (`a.b.C` -> `a/b/C.class`).
pub fn class_relative_path(name: &str) -> PathBuf {
    let mut path: PathBuf = name.split('.').collect();
    path.set_extension("class");
    path
}

/// Writes a jar containing the given classes plus any extra raw entries.
pub fn write_jar(path: &Path, classes: &[ClassBytes], extra: &[(&str, &[u8])]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = ZipWriter::new(File::create(path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for class in classes {
        let entry = format!("{}.class", class.name().replace('.', "/"));
        writer.start_file(entry, options).map_err(io::Error::other)?;
        writer.write_all(&class.build())?;
    }
    for (name, bytes) in extra {
        writer.start_file(*name, options).map_err(io::Error::other)?;
        writer.write_all(bytes)?;
    }
    writer.finish().map_err(io::Error::other)?;
    Ok(())
}
