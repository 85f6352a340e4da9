//! File-system access used by the node tree and the include scanner.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// Read-only view of the file system.
///
/// The engine only ever asks whether a candidate file exists and reads
/// sources to scan their includes.
pub trait FileSystem: Send + Sync {
    /// Returns `true` if `path` names an existing regular file.
    fn exists(&self, path: &Path) -> bool;

    /// Reads the whole file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// The real file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFs;

impl FileSystem for DiskFs {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// An in-memory file system keyed by absolute path.
#[derive(Debug, Default, Clone)]
pub struct MemoryFs {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryFs {
    /// Creates an empty in-memory file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, replacing any previous content.
    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Returns the number of files held.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no files are held.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileSystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not in memory file system", path.display()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_fs_roundtrip() {
        let fs = MemoryFs::new().with_file("/p/main.cpp", "int main() {}");
        assert!(fs.exists(Path::new("/p/main.cpp")));
        assert!(!fs.exists(Path::new("/p/util.cpp")));
        assert_eq!(fs.read_to_string(Path::new("/p/main.cpp")).unwrap(), "int main() {}");
    }

    #[test]
    fn memory_fs_missing_is_not_found() {
        let fs = MemoryFs::new();
        let err = fs.read_to_string(Path::new("/p/x.h")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(fs.is_empty());
    }

    #[test]
    fn disk_fs_sees_real_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("util.h");
        std::fs::write(&file, "#pragma once").unwrap();
        assert!(DiskFs.exists(&file));
        assert!(!DiskFs.exists(dir.path()));
        assert_eq!(DiskFs.read_to_string(&file).unwrap(), "#pragma once");
    }
}
