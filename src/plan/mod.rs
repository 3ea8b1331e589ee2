//! Relocation planning: which document ends up where.
//!
//! A [`RelocationMap`] is keyed by a document's identity, its base filename.
//! Looking a document up by name instead of by directory means its future
//! path is the same whether it is asked before or after the move, which is
//! what lets every link be rewritten before any file is touched.
//!
//! Identities must be unique across the tree for the lookup to be sound;
//! [`RelocationMap::check_unique`] enforces that for the names the map
//! relocates.

pub mod file;

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

pub use file::{load, PlanFile};

/// One move: the document called `identity` at the root goes to `destination`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelocationEntry {
    /// Base filename of the document, e.g. `guide.md`.
    pub identity: String,
    /// Destination relative to the document root, e.g. `manuals/guide.md`.
    pub destination: PathBuf,
}

impl RelocationEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(identity: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self { identity: identity.into(), destination: destination.into() }
    }

    /// Where the relocator expects to find the document before the move.
    #[must_use]
    pub fn source(&self) -> PathBuf {
        PathBuf::from(&self.identity)
    }
}

/// Immutable identity → destination mapping for one run.
///
/// Entries keep their configured order so reports are deterministic.
#[derive(Debug, Clone, Default)]
pub struct RelocationMap {
    entries: Vec<RelocationEntry>,
    index: HashMap<String, usize>,
}

impl RelocationMap {
    /// Builds a map, validating every entry.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found: an identity that is
    /// empty or not a bare filename, a destination that is not a plain
    /// relative file path, a repeated identity, or two identities sharing a
    /// destination.
    pub fn new(entries: Vec<RelocationEntry>) -> Result<Self, String> {
        let mut index = HashMap::with_capacity(entries.len());
        let mut claimed: HashMap<&Path, &str> = HashMap::with_capacity(entries.len());

        for (position, entry) in entries.iter().enumerate() {
            validate_identity(&entry.identity)?;
            validate_destination(&entry.identity, &entry.destination)?;

            if index.insert(entry.identity.clone(), position).is_some() {
                return Err(format!("identity `{}` is listed more than once", entry.identity));
            }
            if let Some(other) = claimed.insert(entry.destination.as_path(), &entry.identity) {
                return Err(format!(
                    "`{other}` and `{}` both move to `{}`",
                    entry.identity,
                    entry.destination.display()
                ));
            }
        }

        Ok(Self { entries, index })
    }

    /// Entries in configured order.
    #[must_use]
    pub fn entries(&self) -> &[RelocationEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is relocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Destination for an identity, if the map relocates it.
    #[must_use]
    pub fn destination_of(&self, identity: &str) -> Option<&Path> {
        self.index.get(identity).map(|&i| self.entries[i].destination.as_path())
    }

    /// Path a document will occupy once the plan is applied.
    ///
    /// `document` is relative to the root and may be given before or after
    /// the move; documents the map does not relocate keep their path.
    #[must_use]
    pub fn future_path_of(&self, document: &Path) -> PathBuf {
        document
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| self.destination_of(name))
            .map_or_else(|| document.to_path_buf(), Path::to_path_buf)
    }

    /// Entries whose destination file name is also relocated by another
    /// entry, in map order.
    ///
    /// Such a plan is only meaningful for a single run.
    #[must_use]
    pub fn reused_names(&self) -> Vec<&RelocationEntry> {
        self.entries
            .iter()
            .filter(|entry| {
                entry
                    .destination
                    .file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| self.index.get(name))
                    .is_some_and(|&i| self.entries[i].identity != entry.identity)
            })
            .collect()
    }

    /// Verifies that no relocated identity is shared by several documents.
    ///
    /// `documents` are root-relative paths of every document in the tree.
    ///
    /// A destination whose file name is another entry's identity (a rename
    /// chain such as `b.md: c.md` then `a.md: b.md`) passes this check and
    /// relocates correctly once. Afterwards the name belongs to a different
    /// document, so running the same plan again is not a no-op; see
    /// [`RelocationMap::reused_names`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousIdentity`] for the first relocated identity
    /// (in map order) carried by more than one document.
    pub fn check_unique(&self, documents: &[PathBuf]) -> Result<()> {
        let mut by_name: HashMap<&str, Vec<&PathBuf>> = HashMap::new();
        for doc in documents {
            if let Some(name) = doc.file_name().and_then(|n| n.to_str()) {
                if self.index.contains_key(name) {
                    by_name.entry(name).or_default().push(doc);
                }
            }
        }

        for entry in &self.entries {
            if let Some(paths) = by_name.get(entry.identity.as_str()) {
                if paths.len() > 1 {
                    return Err(Error::AmbiguousIdentity {
                        identity: entry.identity.clone(),
                        paths: paths.iter().map(|p| (*p).clone()).collect(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn validate_identity(identity: &str) -> Result<(), String> {
    if identity.trim().is_empty() {
        return Err("identity must not be empty".to_string());
    }
    if identity.contains(['/', '\\']) || identity == "." || identity == ".." {
        return Err(format!("identity `{identity}` must be a bare file name"));
    }
    Ok(())
}

fn validate_destination(identity: &str, destination: &Path) -> Result<(), String> {
    if destination.as_os_str().is_empty() {
        return Err(format!("destination for `{identity}` is empty"));
    }
    let plain = destination.components().all(|c| matches!(c, Component::Normal(_)));
    if !plain {
        return Err(format!(
            "destination `{}` for `{identity}` must be relative to the root without `.` or `..`",
            destination.display()
        ));
    }
    Ok(())
}
