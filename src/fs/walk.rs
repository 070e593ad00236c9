//! Deterministic depth-first traversal over a [`FileSystem`]
//!
//! Entries of a directory are visited in lexicographic name order, files
//! before subdirectories. Symlinks are never followed. Every visitor
//! decision is one of three outcomes, so a walk can prune a subtree or stop
//! altogether without unwinding through shared mutable state.

use super::{DirEntry, FileSystem, FileType};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Per-entry decision returned by a [`Visitor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Descend,
    SkipSubtree,
    Abort,
}

/// How a walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    Completed,
    Aborted,
}

pub trait Visitor {
    /// Called before the entries of `dir` are listed; the root included
    fn enter_dir(&mut self, _dir: &Path) -> Visit {
        Visit::Descend
    }

    /// Called for every regular file. `SkipSubtree` skips the remaining
    /// entries of the file's directory.
    fn visit_file(&mut self, entry: &DirEntry) -> Visit;
}

/// Lists a directory in walk order: files sorted by name, then directories
/// sorted by name. Symlinks are dropped.
pub fn sorted_entries(fs: &dyn FileSystem, dir: &Path) -> Result<(Vec<DirEntry>, Vec<DirEntry>)> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in fs.read_dir(dir)? {
        match entry.file_type {
            FileType::File => files.push(entry),
            FileType::Directory => dirs.push(entry),
            FileType::Symlink => {}
        }
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    dirs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok((files, dirs))
}

/// Walks `root` depth-first. Failing to list the root is an error; failing
/// to list a subdirectory is logged and that subtree is skipped.
pub fn walk<V: Visitor + ?Sized>(
    fs: &dyn FileSystem,
    root: &Path,
    visitor: &mut V,
) -> Result<WalkOutcome> {
    match visitor.enter_dir(root) {
        Visit::Descend => {}
        Visit::SkipSubtree => return Ok(WalkOutcome::Completed),
        Visit::Abort => return Ok(WalkOutcome::Aborted),
    }

    let (files, dirs) = sorted_entries(fs, root)?;
    if walk_entries(fs, files, dirs, visitor) == Visit::Abort {
        return Ok(WalkOutcome::Aborted);
    }
    Ok(WalkOutcome::Completed)
}

fn walk_dir<V: Visitor + ?Sized>(fs: &dyn FileSystem, dir: &Path, visitor: &mut V) -> Visit {
    match visitor.enter_dir(dir) {
        Visit::Descend => {}
        other => return other,
    }

    match sorted_entries(fs, dir) {
        Ok((files, dirs)) => walk_entries(fs, files, dirs, visitor),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
            Visit::SkipSubtree
        }
    }
}

fn walk_entries<V: Visitor + ?Sized>(
    fs: &dyn FileSystem,
    files: Vec<DirEntry>,
    dirs: Vec<DirEntry>,
    visitor: &mut V,
) -> Visit {
    for file in &files {
        match visitor.visit_file(file) {
            Visit::Descend => {}
            Visit::SkipSubtree => return Visit::Descend,
            Visit::Abort => return Visit::Abort,
        }
    }

    for dir in &dirs {
        if walk_dir(fs, &dir.path, visitor) == Visit::Abort {
            return Visit::Abort;
        }
    }
    Visit::Descend
}

struct FileCollector<'a, F> {
    root: &'a Path,
    excluded: &'a [&'a str],
    predicate: F,
    found: Vec<PathBuf>,
}

impl<F: FnMut(&DirEntry) -> bool> Visitor for FileCollector<'_, F> {
    fn enter_dir(&mut self, dir: &Path) -> Visit {
        let excluded = dir != self.root
            && dir
                .file_name()
                .is_some_and(|name| self.excluded.iter().any(|e| name == *e));
        if excluded {
            Visit::SkipSubtree
        } else {
            Visit::Descend
        }
    }

    fn visit_file(&mut self, entry: &DirEntry) -> Visit {
        if (self.predicate)(entry) {
            self.found.push(entry.path.clone());
        }
        Visit::Descend
    }
}

/// Collects every file under `root` accepted by `predicate`, in walk order
pub fn find_files<F>(fs: &dyn FileSystem, root: &Path, predicate: F) -> Result<Vec<PathBuf>>
where
    F: FnMut(&DirEntry) -> bool,
{
    find_files_excluding(fs, root, &[], predicate)
}

/// Like [`find_files`], but never descends into a directory below `root`
/// whose name is in `excluded`
pub fn find_files_excluding<F>(
    fs: &dyn FileSystem,
    root: &Path,
    excluded: &[&str],
    predicate: F,
) -> Result<Vec<PathBuf>>
where
    F: FnMut(&DirEntry) -> bool,
{
    let mut collector = FileCollector {
        root,
        excluded,
        predicate,
        found: Vec::new(),
    };
    walk(fs, root, &mut collector)?;
    Ok(collector.found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    fn tree() -> MockFileSystem {
        let fs = MockFileSystem::new();
        fs.add_file("b/BUILD", "");
        fs.add_file("a/z/BUILD", "");
        fs.add_file("a/BUILD", "");
        fs.add_file("BUILD", "");
        fs.add_file("README", "");
        fs
    }

    #[test]
    fn test_find_files_is_lexicographic_files_first() {
        let fs = tree();
        let found = find_files(&fs, Path::new("/mock"), |e| e.name == "BUILD").unwrap();

        assert_eq!(
            found,
            vec![
                PathBuf::from("/mock/BUILD"),
                PathBuf::from("/mock/a/BUILD"),
                PathBuf::from("/mock/a/z/BUILD"),
                PathBuf::from("/mock/b/BUILD"),
            ]
        );
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let fs = MockFileSystem::new();
        assert!(find_files(&fs, Path::new("/mock/nope"), |_| true).is_err());
    }

    #[test]
    fn test_find_files_excluding_prunes_named_dirs() {
        let fs = tree();
        fs.add_file("target/BUILD", "");
        fs.add_file("a/node_modules/BUILD", "");

        let found = find_files_excluding(
            &fs,
            Path::new("/mock"),
            &["target", "node_modules"],
            |e| e.name == "BUILD",
        )
        .unwrap();

        assert_eq!(found.len(), 4);
        assert!(found
            .iter()
            .all(|p| !p.starts_with("/mock/target") && !p.starts_with("/mock/a/node_modules")));
    }

    #[test]
    fn test_excluded_name_on_the_root_still_walks() {
        let fs = MockFileSystem::new();
        fs.add_file("target/BUILD", "");

        let found =
            find_files_excluding(&fs, Path::new("/mock/target"), &["target"], |_| true).unwrap();

        assert_eq!(found, vec![PathBuf::from("/mock/target/BUILD")]);
    }

    struct SkipA(Vec<PathBuf>);

    impl Visitor for SkipA {
        fn enter_dir(&mut self, dir: &Path) -> Visit {
            if dir.ends_with("a") {
                Visit::SkipSubtree
            } else {
                Visit::Descend
            }
        }

        fn visit_file(&mut self, entry: &DirEntry) -> Visit {
            self.0.push(entry.path.clone());
            Visit::Descend
        }
    }

    #[test]
    fn test_skip_subtree() {
        let fs = tree();
        let mut visitor = SkipA(Vec::new());

        let outcome = walk(&fs, Path::new("/mock"), &mut visitor).unwrap();

        assert_eq!(outcome, WalkOutcome::Completed);
        assert!(visitor.0.iter().all(|p| !p.starts_with("/mock/a")));
        assert!(visitor.0.contains(&PathBuf::from("/mock/b/BUILD")));
    }

    struct StopAtSecond(usize);

    impl Visitor for StopAtSecond {
        fn visit_file(&mut self, entry: &DirEntry) -> Visit {
            if entry.name == "BUILD" {
                self.0 += 1;
                if self.0 == 2 {
                    return Visit::Abort;
                }
            }
            Visit::Descend
        }
    }

    #[test]
    fn test_abort_stops_the_walk() {
        let fs = tree();
        let mut visitor = StopAtSecond(0);

        let outcome = walk(&fs, Path::new("/mock"), &mut visitor).unwrap();

        assert_eq!(outcome, WalkOutcome::Aborted);
        assert_eq!(visitor.0, 2);
    }
}
