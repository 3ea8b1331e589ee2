//! Applying a relocation plan to a document tree.
//!
//! A run is two phases separated by a global barrier:
//!
//! 1. every document is rewritten against the future layout and persisted;
//! 2. destination directories are created and files are moved.
//!
//! Rewriting only needs each document's future path, which the
//! [`RelocationMap`] answers the same way before and after a move, so no file
//! has to move before all links are fixed. Moves are not transactional; a run
//! that stops half way is finished by running it again, since entries whose
//! source is already gone are skipped.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::links::{rewrite, RewrittenLink};
use crate::plan::{RelocationEntry, RelocationMap};
use crate::tree::{display_path, DocTree};

/// Links changed in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRewrite {
    /// Document path relative to the root, as it was before any move.
    pub document: PathBuf,
    /// The links that changed.
    pub links: Vec<RewrittenLink>,
}

/// One file moved (or, in a dry run, to be moved), relative to the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Move {
    /// Where the document was.
    pub from: PathBuf,
    /// Where it went.
    pub to: PathBuf,
}

/// Everything a relocation run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelocationReport {
    /// Documents whose links were rewritten, in tree order.
    pub rewritten: Vec<DocumentRewrite>,
    /// Files moved, in plan order.
    pub moved: Vec<Move>,
    /// Whether the disk was left untouched.
    pub dry_run: bool,
}

impl RelocationReport {
    /// Returns `true` if nothing needed to change.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.rewritten.is_empty() && self.moved.is_empty()
    }

    /// Human-readable listing of changed and moved files.
    #[must_use]
    pub fn format(&self) -> String {
        let (updated, moved) = if self.dry_run {
            ("Would update links in:", "Would move files:")
        } else {
            ("Updated links in:", "Moved files:")
        };

        let mut lines = vec![updated.to_string()];
        for doc in &self.rewritten {
            lines.push(format!("- {}", display_path(&doc.document)));
            for link in &doc.links {
                lines.push(format!("    line {}: {} -> {}", link.line, link.from, link.to));
            }
        }
        lines.push(moved.to_string());
        for m in &self.moved {
            lines.push(format!("- {} -> {}", display_path(&m.from), display_path(&m.to)));
        }
        lines.join("\n")
    }
}

/// Where a plan entry stands on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryStatus {
    /// Source present at the root, destination free.
    Pending,
    /// Source gone, destination present.
    Moved,
    /// Source and destination are the same path.
    InPlace,
    /// Both source and destination exist; relocating would collide.
    Blocked,
    /// Neither exists.
    Missing,
}

/// Reports the state of every plan entry without changing anything.
#[must_use]
pub fn status(
    ctx: &ServiceContext,
    tree: &DocTree,
    map: &RelocationMap,
) -> Vec<(RelocationEntry, EntryStatus)> {
    map.entries()
        .iter()
        .map(|entry| {
            let source = tree.absolute(&entry.source());
            let destination = tree.absolute(&entry.destination);
            let state = match (ctx.fs.exists(&source), ctx.fs.exists(&destination)) {
                _ if source == destination => EntryStatus::InPlace,
                (true, false) => EntryStatus::Pending,
                (false, true) => EntryStatus::Moved,
                (true, true) => EntryStatus::Blocked,
                (false, false) => EntryStatus::Missing,
            };
            (entry.clone(), state)
        })
        .collect()
}

/// Runs the full relocation: rewrite every document, then move files.
///
/// With `dry_run` set nothing is written, created or renamed, but the
/// report lists exactly what a real run would do and collisions are still
/// reported as errors.
///
/// # Errors
///
/// Returns [`Error::AmbiguousIdentity`] before touching anything if a
/// relocated file name is shared, [`Error::DestinationExists`] on the first
/// collision, and [`Error::Io`] on filesystem failures. Rewrites persisted
/// before a failing move stay on disk; they are already correct for the
/// target layout.
pub fn run(
    ctx: &ServiceContext,
    tree: &DocTree,
    map: &RelocationMap,
    dry_run: bool,
) -> Result<RelocationReport> {
    let rewritten = rewrite_all(ctx, tree, map, dry_run)?;
    let moved = if dry_run { plan_moves(ctx, tree, map)? } else { apply(ctx, tree, map)? };
    Ok(RelocationReport { rewritten, moved, dry_run })
}

/// Rewrites the links of every document in the tree for its future path.
///
/// Documents whose text is unchanged are not written.
///
/// # Errors
///
/// Returns [`Error::AmbiguousIdentity`] if a relocated identity is shared by
/// several documents, or [`Error::Io`] if a document cannot be read or
/// written.
pub fn rewrite_all(
    ctx: &ServiceContext,
    tree: &DocTree,
    map: &RelocationMap,
    dry_run: bool,
) -> Result<Vec<DocumentRewrite>> {
    let documents = tree.documents(ctx)?;
    map.check_unique(&documents)?;

    let mut changed = Vec::new();
    for document in documents {
        let path = tree.absolute(&document);
        let original =
            ctx.fs.read_to_string(&path).map_err(|e| Error::io("read", path.clone(), e.as_ref()))?;

        let future = map.future_path_of(&document);
        let result = rewrite(&original, &future, map, tree.extension());
        if !result.changed() {
            continue;
        }

        if !dry_run {
            ctx.fs
                .write(&path, &result.text)
                .map_err(|e| Error::io("write", path.clone(), e.as_ref()))?;
        }
        tracing::info!(
            document = %display_path(&document),
            links = result.links.len(),
            dry_run,
            "rewrote links"
        );
        changed.push(DocumentRewrite { document, links: result.links });
    }
    Ok(changed)
}

/// Creates destination directories and moves every pending entry.
///
/// Entries whose source is no longer at the root are skipped, which makes a
/// second run a no-op.
///
/// # Errors
///
/// Returns [`Error::DestinationExists`] as soon as an entry's destination
/// is occupied, leaving it untouched and moving no further entries, or
/// [`Error::Io`] if a directory cannot be created or a rename fails.
pub fn apply(ctx: &ServiceContext, tree: &DocTree, map: &RelocationMap) -> Result<Vec<Move>> {
    for entry in map.entries() {
        if let Some(parent) = entry.destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            let dir = tree.absolute(parent);
            ctx.fs
                .create_dir_all(&dir)
                .map_err(|e| Error::io("create directory", dir.clone(), e.as_ref()))?;
            tracing::debug!(dir = %display_path(parent), "ensured directory");
        }
    }

    let mut moved = Vec::new();
    for entry in map.entries() {
        let Some(mv) = pending_move(ctx, tree, entry)? else {
            continue;
        };
        let from = tree.absolute(&mv.from);
        let to = tree.absolute(&mv.to);
        ctx.fs.rename(&from, &to).map_err(|e| Error::io("rename", from.clone(), e.as_ref()))?;
        tracing::info!(from = %display_path(&mv.from), to = %display_path(&mv.to), "moved");
        moved.push(mv);
    }
    Ok(moved)
}

/// Lists the moves [`apply`] would perform, without performing them.
///
/// Earlier entries are played forward in memory, so a destination freed by
/// an earlier move counts as free and one filled by it counts as occupied,
/// exactly as [`apply`] would find them.
///
/// # Errors
///
/// Returns [`Error::DestinationExists`] for the first colliding entry.
pub fn plan_moves(ctx: &ServiceContext, tree: &DocTree, map: &RelocationMap) -> Result<Vec<Move>> {
    let mut freed: HashSet<PathBuf> = HashSet::new();
    let mut filled: HashSet<PathBuf> = HashSet::new();
    let present = |path: &Path, freed: &HashSet<PathBuf>, filled: &HashSet<PathBuf>| {
        filled.contains(path) || (!freed.contains(path) && ctx.fs.exists(&tree.absolute(path)))
    };

    let mut moves = Vec::new();
    for entry in map.entries() {
        let from = entry.source();
        if !present(&from, &freed, &filled) {
            tracing::debug!(identity = %entry.identity, "source already gone, skipping");
            continue;
        }
        if same_path(&from, &entry.destination) {
            continue;
        }
        if present(&entry.destination, &freed, &filled) {
            return Err(Error::DestinationExists(tree.absolute(&entry.destination)));
        }

        filled.remove(&from);
        freed.insert(from.clone());
        freed.remove(&entry.destination);
        filled.insert(entry.destination.clone());
        moves.push(Move { from, to: entry.destination.clone() });
    }
    Ok(moves)
}

fn pending_move(
    ctx: &ServiceContext,
    tree: &DocTree,
    entry: &RelocationEntry,
) -> Result<Option<Move>> {
    let from = entry.source();
    let source = tree.absolute(&from);
    let destination = tree.absolute(&entry.destination);

    if !ctx.fs.exists(&source) {
        tracing::debug!(identity = %entry.identity, "source already gone, skipping");
        return Ok(None);
    }
    if same_path(&from, &entry.destination) {
        return Ok(None);
    }
    if ctx.fs.exists(&destination) {
        return Err(Error::DestinationExists(destination));
    }
    Ok(Some(Move { from, to: entry.destination.clone() }))
}

fn same_path(a: &Path, b: &Path) -> bool {
    a.components().eq(b.components())
}
