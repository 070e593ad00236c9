use super::{DirEntry, FileSystem, FileType};
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).context(format!("Failed to read file {:?}", path))
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).context(format!("Failed to read bytes from {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let entries = fs::read_dir(path).context(format!("Failed to read directory {:?}", path))?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            // symlinks are reported as such and never followed by the walkers
            let file_type = match entry.file_type() {
                Ok(t) if t.is_symlink() => FileType::Symlink,
                Ok(t) if t.is_dir() => FileType::Directory,
                _ => FileType::File,
            };

            result.push(DirEntry {
                path,
                name,
                file_type,
            });
        }

        Ok(result)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        fs::write(path, contents).context(format!("Failed to write file {:?}", path))
    }

    fn append(&self, path: &Path, contents: &str) -> Result<()> {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .context(format!("Failed to open file {:?} for appending", path))?;
        file.write_all(contents.as_bytes())
            .context(format!("Failed to append to file {:?}", path))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).context(format!("Failed to rename {:?} to {:?}", from, to))
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        fs::copy(from, to)
            .map(|_| ())
            .context(format!("Failed to copy {:?} to {:?}", from, to))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).context(format!("Failed to delete file {:?}", path))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        path.canonicalize()
            .context(format!("Failed to canonicalize path {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        fs::create_dir(base.join("subdir")).unwrap();
        fs::write(base.join("BUILD"), "hello world").unwrap();
        fs::write(base.join("subdir/pom.xml"), "<project/>").unwrap();

        dir
    }

    #[test]
    fn test_exists_and_kinds() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        assert!(fs.exists(temp.path()));
        assert!(fs.is_dir(&temp.path().join("subdir")));
        assert!(fs.is_file(&temp.path().join("BUILD")));
        assert!(!fs.exists(&temp.path().join("nonexistent")));
    }

    #[test]
    fn test_read_dir() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        let entries = fs.read_dir(temp.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.file_name()).collect();

        assert!(names.contains(&"BUILD"));
        assert!(names.contains(&"subdir"));
        let subdir = entries.iter().find(|e| e.name == "subdir").unwrap();
        assert!(subdir.is_dir());
    }

    #[test]
    fn test_write_append_and_read() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();
        let path = temp.path().join("WORKSPACE");

        fs.write(&path, "a\n").unwrap();
        fs.append(&path, "b\n").unwrap();

        assert_eq!(fs.read_to_string(&path).unwrap(), "a\nb\n");
        assert_eq!(fs.read_bytes(&path).unwrap(), b"a\nb\n");
    }

    #[test]
    fn test_rename_and_copy() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();
        let original = temp.path().join("BUILD");
        let copied = temp.path().join("BUILD_copy");
        let moved = temp.path().join("BUILD_moved");

        fs.copy(&original, &copied).unwrap();
        assert!(fs.exists(&original));
        assert_eq!(fs.read_to_string(&copied).unwrap(), "hello world");

        fs.rename(&original, &moved).unwrap();
        assert!(!fs.exists(&original));
        assert!(fs.exists(&moved));

        fs.remove_file(&moved).unwrap();
        assert!(!fs.exists(&moved));
    }

    #[test]
    fn test_read_missing_file_fails() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        let err = fs.read_to_string(&temp.path().join("missing")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_canonicalize() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        let canonical = fs.canonicalize(temp.path()).unwrap();
        assert!(canonical.is_absolute());
    }
}
