//! File-system abstraction for include resolution and file loading.
//!
//! Only the include expander and the top-level loading entry points touch
//! the file system, and they do so through the [`FileSystem`] trait so test
//! harnesses (and embedded asset sources) can serve in-memory fixtures.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// The capability set the engine needs from a file system.
pub trait FileSystem {
    /// Read a file as text.
    fn read_to_string(&self, path: &str) -> Result<String>;

    /// Read a file as raw bytes.
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Check whether a file exists.
    fn exists(&self, path: &str) -> bool;

    /// Resolve the parent directory of a path. Empty string if the path has
    /// no parent.
    fn parent(&self, path: &str) -> String;
}

/// The default [`FileSystem`]: reads the real on-disk file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFileSystem;

impl FileSystem for DiskFileSystem {
    fn read_to_string(&self, path: &str) -> Result<String> {
        fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_string(),
            source,
        })
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        fs::read(path).map_err(|source| Error::Io {
            path: path.to_string(),
            source,
        })
    }

    fn exists(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }

    fn parent(&self, path: &str) -> String {
        Path::new(path)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// An in-memory [`FileSystem`] backed by a path → contents map.
///
/// # Examples
///
/// ```
/// use sii_formats::fs::{FileSystem, MemoryFileSystem};
///
/// let mut fs = MemoryFileSystem::new();
/// fs.insert("/def/city.sii", "city_data : .city.berlin { }");
/// assert!(fs.exists("/def/city.sii"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFileSystem {
    /// Create an empty in-memory file system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &str) -> Result<String> {
        // same strictness as the disk implementation: invalid UTF-8 is an
        // I/O error, not a lossy decode
        String::from_utf8(self.read(path)?).map_err(|source| Error::Io {
            path: path.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, source),
        })
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| Error::Io {
            path: path.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such fixture"),
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn parent(&self, path: &str) -> String {
        Path::new(path)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
