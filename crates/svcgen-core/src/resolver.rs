//! Isolated type resolution over an assembled classpath.
//!
//! A [`TypeResolver`] answers "is type A assignable to type B" from the
//! point of view of the target module: both names are looked up in the
//! module's own classpath, in classpath order, and the supertype graph is
//! walked by reading class file headers. Nothing from the generator's own
//! process leaks into the answer.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use zip::result::ZipError;
use zip::ZipArchive;

use crate::classfile::ClassHeader;
use crate::classpath::{Classpath, ClasspathEntry};
use crate::enumerate::CLASS_SUFFIX;
use crate::error::ResolveError;

/// Packages supplied by the platform's bootstrap loader.
///
/// Types in these packages that are absent from the classpath resolve to
/// terminal types without supertypes.
pub const PLATFORM_PACKAGES: &[&str] = &["java.", "javax.", "jdk.", "sun.", "com.sun."];

/// Largest buffer reserved up front for an archived class file.
const MAX_PREALLOCATED_CLASS_BYTES: usize = 1 << 20;

/// Where a resolved type was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeOrigin {
    /// Read from this classpath entry.
    Classpath(PathBuf),
    /// Platform type not present on the classpath.
    Platform,
}

/// A type resolved within one resolution scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Fully-qualified name.
    pub name: String,
    /// Direct superclass.
    pub super_class: Option<String>,
    /// Direct interfaces.
    pub interfaces: Vec<String>,
    /// Whether the type is an interface.
    pub is_interface: bool,
    /// Where the definition came from.
    pub origin: TypeOrigin,
}

impl ResolvedType {
    fn platform(name: &str) -> Self {
        Self {
            name: name.to_string(),
            super_class: None,
            interfaces: Vec::new(),
            is_interface: false,
            origin: TypeOrigin::Platform,
        }
    }

    /// Direct supertypes: superclass first, then interfaces in declaration order.
    pub fn direct_supertypes(&self) -> impl Iterator<Item = &str> {
        self.super_class
            .iter()
            .chain(self.interfaces.iter())
            .map(String::as_str)
    }
}

/// Returns true if `name` lives in a platform package.
pub fn is_platform_type(name: &str) -> bool {
    PLATFORM_PACKAGES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

enum EntrySource {
    Directory(PathBuf),
    Archive {
        path: PathBuf,
        state: ArchiveState,
    },
}

enum ArchiveState {
    Unopened,
    Open(ZipArchive<File>),
    /// The file does not exist; nothing can be found in it.
    Absent,
}

impl EntrySource {
    fn new(entry: &ClasspathEntry) -> Self {
        match entry {
            ClasspathEntry::Directory(path) => EntrySource::Directory(path.clone()),
            ClasspathEntry::Archive(path) => EntrySource::Archive {
                path: path.clone(),
                state: ArchiveState::Unopened,
            },
        }
    }

    fn path(&self) -> &Path {
        match self {
            EntrySource::Directory(path) | EntrySource::Archive { path, .. } => path,
        }
    }

    /// Reads the class file for `name`, or `None` if this entry lacks it.
    fn read_class(&mut self, name: &str) -> Result<Option<Vec<u8>>, ResolveError> {
        match self {
            EntrySource::Directory(dir) => {
                let mut file_path = dir.clone();
                for segment in name.split('.') {
                    file_path.push(segment);
                }
                file_path.set_extension(&CLASS_SUFFIX[1..]);
                match fs::read(&file_path) {
                    Ok(bytes) => Ok(Some(bytes)),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                    Err(source) => Err(ResolveError::Io {
                        name: name.to_string(),
                        location: dir.clone(),
                        source,
                    }),
                }
            }
            EntrySource::Archive { path, state } => {
                if let ArchiveState::Unopened = state {
                    *state = open_archive(path)?;
                }
                let ArchiveState::Open(archive) = state else {
                    return Ok(None);
                };
                let entry_name = format!("{}{}", name.replace('.', "/"), CLASS_SUFFIX);
                let mut file = match archive.by_name(&entry_name) {
                    Ok(file) => file,
                    Err(ZipError::FileNotFound) => return Ok(None),
                    Err(source) => {
                        return Err(ResolveError::Archive {
                            location: path.clone(),
                            source,
                        })
                    }
                };
                let mut bytes = Vec::with_capacity(capacity_hint(file.size()));
                file.read_to_end(&mut bytes)
                    .map_err(|e| ResolveError::Archive {
                        location: path.clone(),
                        source: ZipError::Io(e),
                    })?;
                Ok(Some(bytes))
            }
        }
    }
}

fn open_archive(path: &Path) -> Result<ArchiveState, ResolveError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ArchiveState::Absent),
        Err(e) => {
            return Err(ResolveError::Archive {
                location: path.to_path_buf(),
                source: ZipError::Io(e),
            })
        }
    };
    let archive = ZipArchive::new(file).map_err(|source| ResolveError::Archive {
        location: path.to_path_buf(),
        source,
    })?;
    Ok(ArchiveState::Open(archive))
}

/// A resolution scope built over one classpath.
///
/// Resolved types and supertype closures are cached for the lifetime of the
/// resolver, which is one generation run.
pub struct TypeResolver {
    entries: Vec<EntrySource>,
    types: HashMap<String, ResolvedType>,
    closures: HashMap<String, Rc<BTreeSet<String>>>,
}

impl TypeResolver {
    /// Creates a resolver over the given classpath. Archives are opened lazily.
    pub fn new(classpath: &Classpath) -> Self {
        Self {
            entries: classpath.entries().iter().map(EntrySource::new).collect(),
            types: HashMap::new(),
            closures: HashMap::new(),
        }
    }

    /// Resolves a type by fully-qualified name.
    ///
    /// The first classpath entry containing the class wins. Fails if the
    /// type is nowhere on the classpath (and is not a platform type), if the
    /// class file is malformed, or if it declares a different name.
    pub fn resolve(&mut self, name: &str) -> Result<&ResolvedType, ResolveError> {
        if !self.types.contains_key(name) {
            let resolved = self.load(name)?;
            self.types.insert(name.to_string(), resolved);
        }
        Ok(&self.types[name])
    }

    fn load(&mut self, name: &str) -> Result<ResolvedType, ResolveError> {
        for entry in &mut self.entries {
            let Some(bytes) = entry.read_class(name)? else {
                continue;
            };
            let location = entry.path().to_path_buf();
            let header = ClassHeader::parse(&bytes).map_err(|source| ResolveError::Malformed {
                name: name.to_string(),
                location: location.clone(),
                source,
            })?;
            if header.this_class != name {
                return Err(ResolveError::NameMismatch {
                    requested: name.to_string(),
                    declared: header.this_class,
                    location,
                });
            }
            let is_interface = header.is_interface();
            return Ok(ResolvedType {
                name: header.this_class,
                super_class: header.super_class,
                interfaces: header.interfaces,
                is_interface,
                origin: TypeOrigin::Classpath(location),
            });
        }

        if is_platform_type(name) {
            return Ok(ResolvedType::platform(name));
        }
        Err(ResolveError::NotFound {
            name: name.to_string(),
        })
    }

    /// All proper supertypes of `name` (transitive superclasses and interfaces).
    pub fn supertypes(&mut self, name: &str) -> Result<Rc<BTreeSet<String>>, ResolveError> {
        self.closure(name, &mut HashSet::new())
    }

    fn closure(
        &mut self,
        name: &str,
        visiting: &mut HashSet<String>,
    ) -> Result<Rc<BTreeSet<String>>, ResolveError> {
        if let Some(cached) = self.closures.get(name) {
            return Ok(Rc::clone(cached));
        }
        if !visiting.insert(name.to_string()) {
            return Err(ResolveError::CyclicHierarchy {
                name: name.to_string(),
            });
        }

        let direct: Vec<String> = self
            .resolve(name)?
            .direct_supertypes()
            .map(str::to_string)
            .collect();

        let mut all = BTreeSet::new();
        for parent in direct {
            let inherited = self.closure(&parent, visiting)?;
            all.extend(inherited.iter().cloned());
            all.insert(parent);
        }

        visiting.remove(name);
        let all = Rc::new(all);
        self.closures.insert(name.to_string(), Rc::clone(&all));
        Ok(all)
    }

    /// Returns true if `candidate` is `target` or one of its subtypes.
    pub fn is_assignable(&mut self, candidate: &str, target: &str) -> Result<bool, ResolveError> {
        if candidate == target {
            self.resolve(candidate)?;
            return Ok(true);
        }
        Ok(self.supertypes(candidate)?.contains(target))
    }
}

/// Buffer size to reserve for an archive entry whose header claims `declared`
/// uncompressed bytes. The header is untrusted, so the hint is capped.
fn capacity_hint(declared: u64) -> usize {
    usize::try_from(declared)
        .unwrap_or(usize::MAX)
        .min(MAX_PREALLOCATED_CLASS_BYTES)
}
