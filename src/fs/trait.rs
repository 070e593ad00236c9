//! FileSystem trait definition

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Type of file system entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    File,
    Directory,
    Symlink,
}

/// A directory entry returned by read_dir
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub file_type: FileType,
}

impl DirEntry {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.name
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn is_file(&self) -> bool {
        self.file_type == FileType::File
    }

    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }
}

/// Abstraction over file system operations for testability
pub trait FileSystem: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Check if path is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Read file contents as string
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Read the whole file as bytes
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>>;

    /// List directory contents (unordered)
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;

    /// Create or truncate a file with the given contents
    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    /// Append to a file, creating it if needed
    fn append(&self, path: &Path, contents: &str) -> Result<()>;

    /// Move a file
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Copy a file, replacing the target
    fn copy(&self, from: &Path, to: &Path) -> Result<()>;

    /// Delete a file
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Canonicalize a path
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Join paths
    fn join(&self, base: &Path, path: &str) -> PathBuf {
        base.join(path)
    }
}
