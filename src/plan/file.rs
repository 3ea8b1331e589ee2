//! YAML plan files.
//!
//! ```yaml
//! root: docs        # optional, relative to the plan file
//! extension: md     # optional
//! moves:
//!   B.md: sub/B.md
//!   guide.md: 01-guide.md
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{RelocationEntry, RelocationMap};
use crate::context::ServiceContext;
use crate::error::{Error, Result};

/// Raw contents of a plan file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanFile {
    /// Document root, relative to the plan file's directory when not absolute.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Managed document extension.
    #[serde(default)]
    pub extension: Option<String>,
    /// Ordered `identity: destination` pairs.
    #[serde(default)]
    pub moves: serde_yaml::Mapping,
}

impl PlanFile {
    /// Parses plan YAML.
    ///
    /// # Errors
    ///
    /// Returns the YAML error text when the document is malformed or has
    /// unknown keys.
    pub fn parse(text: &str) -> Result<Self, String> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    }

    /// Converts `moves` into a validated [`RelocationMap`], keeping order.
    ///
    /// # Errors
    ///
    /// Returns a description of a non-string key or value, or of any entry
    /// [`RelocationMap::new`] rejects.
    pub fn relocation_map(&self) -> Result<RelocationMap, String> {
        let mut entries = Vec::with_capacity(self.moves.len());
        for (key, value) in &self.moves {
            let identity =
                key.as_str().ok_or_else(|| format!("move key {key:?} is not a string"))?;
            let destination = value
                .as_str()
                .ok_or_else(|| format!("destination for `{identity}` is not a string"))?;
            entries.push(RelocationEntry::new(identity, destination));
        }
        RelocationMap::new(entries)
    }
}

/// A plan file resolved against its location on disk.
#[derive(Debug, Clone)]
pub struct LoadedPlan {
    /// The validated moves.
    pub map: RelocationMap,
    /// Root named by the plan, already joined onto the plan's directory.
    pub root: Option<PathBuf>,
    /// Extension named by the plan.
    pub extension: Option<String>,
}

/// Reads and validates the plan at `path`.
///
/// # Errors
///
/// Returns [`Error::InvalidPlan`] if the file cannot be read, parsed, or
/// describes invalid moves.
pub fn load(ctx: &ServiceContext, path: &Path) -> Result<LoadedPlan> {
    let invalid = |reason: String| Error::InvalidPlan { path: path.to_path_buf(), reason };

    let text = ctx.fs.read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let file = PlanFile::parse(&text).map_err(invalid)?;
    let map = file.relocation_map().map_err(invalid)?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let root = file.root.map(|root| if root.is_absolute() { root } else { base.join(root) });

    for entry in map.reused_names() {
        tracing::warn!(
            identity = %entry.identity,
            destination = %entry.destination.display(),
            "destination reuses a relocated name; the plan is not safe to run twice"
        );
    }
    tracing::debug!(plan = %path.display(), moves = map.len(), "loaded relocation plan");
    Ok(LoadedPlan { map, root, extension: file.extension })
}
