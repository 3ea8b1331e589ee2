//! In-memory filesystem adapter.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::ports::filesystem::FileSystem;

#[derive(Default)]
struct Tree {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    symlinks: BTreeSet<PathBuf>,
}

impl Tree {
    fn add_dir_chain(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path) || self.files.keys().any(|k| k.starts_with(path) && k != path)
    }
}

/// Filesystem held entirely in memory.
///
/// Directories are implied by the files beneath them and can also be created
/// empty. Used to exercise the relocation engine without touching disk.
#[derive(Default)]
pub struct MemoryFileSystem {
    tree: Mutex<Tree>,
}

impl MemoryFileSystem {
    /// Creates an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filesystem pre-populated with `(path, contents)` pairs.
    #[must_use]
    pub fn with_files<P: AsRef<Path>>(files: &[(P, &str)]) -> Self {
        let fs = Self::new();
        {
            let mut tree = fs.lock();
            for (path, contents) in files {
                let path = path.as_ref();
                if let Some(parent) = path.parent() {
                    tree.add_dir_chain(parent);
                }
                tree.files.insert(path.to_path_buf(), (*contents).to_string());
            }
        }
        fs
    }

    /// Marks `path` as a symbolic link to a directory.
    ///
    /// Nothing is resolved: whatever files are held beneath `path` stand in
    /// for what the link would show.
    pub fn link_dir(&self, path: &Path) {
        let mut tree = self.lock();
        tree.add_dir_chain(path);
        tree.symlinks.insert(path.to_path_buf());
    }

    /// Returns every file path currently held, sorted.
    #[must_use]
    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.lock().files.keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, Tree> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.lock()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut tree = self.lock();
        if let Some(parent) = path.parent() {
            tree.add_dir_chain(parent);
        }
        tree.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let tree = self.lock();
        tree.files.contains_key(path) || tree.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.lock().is_dir(path)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        self.lock().symlinks.contains(path)
    }

    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let tree = self.lock();
        if !tree.is_dir(path) {
            return Err(format!("Not a directory: {}", path.display()).into());
        }
        let names: BTreeSet<String> = tree
            .files
            .keys()
            .chain(tree.dirs.iter())
            .filter(|k| k.parent() == Some(path))
            .filter_map(|k| k.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        Ok(names.into_iter().collect())
    }

    fn create_dir_all(
        &self,
        path: &Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut tree = self.lock();
        if tree.files.contains_key(path) {
            return Err(format!("File exists: {}", path.display()).into());
        }
        tree.add_dir_chain(path);
        Ok(())
    }

    fn rename(
        &self,
        from: &Path,
        to: &Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut tree = self.lock();
        let parent_missing =
            to.parent().is_some_and(|p| !p.as_os_str().is_empty() && !tree.is_dir(p));
        if parent_missing {
            return Err(format!("No such directory for {}", to.display()).into());
        }
        let contents = tree
            .files
            .remove(from)
            .ok_or_else(|| format!("File not found: {}", from.display()))?;
        tree.files.insert(to.to_path_buf(), contents);
        Ok(())
    }
}
