//! The managed document tree: a root directory and the document extension.

use std::path::{Path, PathBuf};

use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::links::classify::has_extension;

/// Extension of managed documents when none is configured.
pub const DEFAULT_EXTENSION: &str = "md";

/// A document tree rooted at a directory on the filesystem port.
///
/// Document paths handed out by the tree are relative to [`DocTree::root`];
/// join them with [`DocTree::absolute`] only at the filesystem boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTree {
    root: PathBuf,
    extension: String,
}

impl DocTree {
    /// Opens the tree at `root`, managing files ending in `.<extension>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RootNotFound`] if `root` is not an existing directory.
    pub fn open(ctx: &ServiceContext, root: &Path, extension: &str) -> Result<Self> {
        if !ctx.fs.is_dir(root) {
            return Err(Error::RootNotFound(root.to_path_buf()));
        }
        Ok(Self::new(root, extension))
    }

    /// Builds a tree without checking that the root exists.
    #[must_use]
    pub fn new(root: &Path, extension: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The managed extension, without the leading dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Joins a root-relative path onto the root.
    #[must_use]
    pub fn absolute(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Returns `true` if `name` ends in `.<extension>` (case-sensitive).
    #[must_use]
    pub fn is_document_name(&self, name: &str) -> bool {
        has_extension(name, &self.extension, false)
    }

    /// Lists every document under the root, relative to it, in
    /// lexicographic path order.
    ///
    /// Symbolically linked directories are not descended into; a link back
    /// to an ancestor would otherwise list the same documents forever.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if a directory cannot be listed.
    pub fn documents(&self, ctx: &ServiceContext) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        self.walk(ctx, Path::new(""), &mut found)?;
        found.sort();
        Ok(found)
    }

    fn walk(&self, ctx: &ServiceContext, relative: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
        let dir = self.absolute(relative);
        let names =
            ctx.fs.list_dir(&dir).map_err(|e| Error::io("list", dir.clone(), e.as_ref()))?;
        for name in names {
            let child = relative.join(&name);
            let path = self.absolute(&child);
            if ctx.fs.is_dir(&path) {
                if ctx.fs.is_symlink(&path) {
                    tracing::debug!(dir = %display_path(&child), "skipping symlinked directory");
                    continue;
                }
                self.walk(ctx, &child, found)?;
            } else if self.is_document_name(&name) {
                found.push(child);
            }
        }
        Ok(())
    }
}

/// Renders a root-relative path with forward slashes for reporting.
#[must_use]
pub fn display_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
