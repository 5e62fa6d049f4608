//! Access to compiled artifacts.
//!
//! The shaker never decides where artifacts live. Callers hand it an
//! [`ArtifactStore`] and a unit handle; the store turns the pair into a fresh
//! readable stream each time it is asked, which lets the driver read the
//! input once for parsing and once more for reconstruction.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Handle of one compiled unit, e.g. `app` for `out/app.js`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Source of artifact streams keyed by unit and extension.
///
/// Every call to [`open`](ArtifactStore::open) must return a stream
/// positioned at the start of the artifact.
pub trait ArtifactStore {
    /// Open the artifact of `unit` with the given extension (without dot).
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error, [`io::ErrorKind::NotFound`] when the
    /// artifact does not exist.
    fn open(&self, unit: &UnitId, extension: &str) -> io::Result<Box<dyn Read + '_>>;
}

/// Artifacts stored as `<root>/<unit>.<extension>` files.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Split a file path into the store, unit and extension that address it.
    ///
    /// Returns `None` when the path has no usable file stem.
    pub fn locate(path: &Path) -> Option<(Self, UnitId, String)> {
        let unit = path.file_stem()?.to_str()?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Some((Self::new(root), UnitId::new(unit), extension.to_string()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, unit: &UnitId, extension: &str) -> PathBuf {
        if extension.is_empty() {
            self.root.join(unit.as_str())
        } else {
            self.root.join(format!("{unit}.{extension}"))
        }
    }
}

impl ArtifactStore for FsArtifactStore {
    fn open(&self, unit: &UnitId, extension: &str) -> io::Result<Box<dyn Read + '_>> {
        let file = File::open(self.path_for(unit, extension))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// In-memory artifacts, for embedding and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryArtifactStore {
    artifacts: FxHashMap<(UnitId, String), Vec<u8>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit: UnitId, extension: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.artifacts
            .insert((unit, extension.into()), contents.into());
    }

    pub fn with_artifact(
        mut self,
        unit: impl Into<UnitId>,
        extension: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        self.insert(unit.into(), extension, contents);
        self
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn open(&self, unit: &UnitId, extension: &str) -> io::Result<Box<dyn Read + '_>> {
        self.artifacts
            .get(&(unit.clone(), extension.to_string()))
            .map(|bytes| Box::new(Cursor::new(bytes.as_slice())) as Box<dyn Read + '_>)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no artifact {unit}.{extension}"),
                )
            })
    }
}
