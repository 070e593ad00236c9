//! FileSystem abstraction for testable file operations

mod mock;
mod real;
mod r#trait;
pub mod walk;

pub use mock::MockFileSystem;
pub use r#trait::{DirEntry, FileSystem, FileType};
pub use real::RealFileSystem;
pub use walk::{find_files, find_files_excluding, walk, Visit, Visitor, WalkOutcome};

use anyhow::Result;
use std::path::{Component, Path, PathBuf};

/// Reads an optional text file; an absent file reads as the empty string
pub fn read_optional(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    if fs.is_file(path) {
        fs.read_to_string(path)
    } else {
        Ok(String::new())
    }
}

/// Resolves `.` and `..` components without touching the file system
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
