//! Link integrity checking.
//!
//! Validates the tree as it stands: every internal document link is
//! resolved against the referencing document's actual directory and must
//! name an existing file. Links that leave the tree, point at external
//! resources or at non-document files are outside the checker's concern.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::links::classify::has_extension;
use crate::links::{links, normalize, split_target};
use crate::tree::{display_path, DocTree};

/// An internal link whose target does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    /// Referencing document, relative to the root.
    pub document: PathBuf,
    /// 1-based line of the link.
    pub line: usize,
    /// Target exactly as written.
    pub target: String,
}

/// Outcome of a full scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// The scanned root.
    pub root: PathBuf,
    /// Number of documents scanned.
    pub scanned: usize,
    /// Broken links in document order, then position order.
    pub broken: Vec<BrokenLink>,
}

impl CheckReport {
    /// Returns `true` if no broken link was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.broken.is_empty()
    }

    /// Formats the report for the console.
    #[must_use]
    pub fn format(&self) -> String {
        let mut lines = vec![format!(
            "Scanned {} documents under: {}",
            self.scanned,
            self.root.display()
        )];
        if self.is_clean() {
            lines.push("OK: no broken internal links found.".to_string());
        } else {
            lines.push(format!("Broken internal links ({}):", self.broken.len()));
            for link in &self.broken {
                lines.push(format!(
                    "- {}:{} -> {}",
                    display_path(&link.document),
                    link.line,
                    link.target
                ));
            }
        }
        lines.join("\n")
    }
}

/// Scans every document under the tree's root for broken internal links.
///
/// # Errors
///
/// Returns [`Error::Io`] if a directory or document cannot be read. Broken
/// links are never errors; they are collected into the report.
pub fn scan(ctx: &ServiceContext, tree: &DocTree) -> Result<CheckReport> {
    let documents = tree.documents(ctx)?;
    let mut broken = Vec::new();

    for document in &documents {
        let path = tree.absolute(document);
        let text =
            ctx.fs.read_to_string(&path).map_err(|e| Error::io("read", path.clone(), e.as_ref()))?;

        for link in links(&text) {
            let Some(resolved) = resolve_target(document, link.target, tree.extension()) else {
                continue;
            };
            if ctx.fs.exists(&tree.absolute(&resolved)) {
                continue;
            }
            tracing::warn!(
                document = %display_path(document),
                line = link.line,
                link = link.target,
                "broken link"
            );
            broken.push(BrokenLink {
                document: document.clone(),
                line: link.line,
                target: link.target.to_string(),
            });
        }
    }

    Ok(CheckReport { root: tree.root().to_path_buf(), scanned: documents.len(), broken })
}

/// Resolves a link target to a root-relative path the checker must verify.
///
/// Returns `None` for links outside the checker's jurisdiction: empty or
/// fragment-only targets, URIs (`scheme://`, `mailto:`), targets that are
/// not managed documents (compared case-insensitively), absolute, drive- or
/// UNC-rooted paths, and targets that climb out of the root.
#[must_use]
pub fn resolve_target(document: &Path, target: &str, extension: &str) -> Option<PathBuf> {
    let target = target.trim();
    if target.contains("://") || target.starts_with("mailto:") {
        return None;
    }
    let (file_part, _) = split_target(target);
    if file_part.is_empty() || !has_extension(file_part, extension, true) {
        return None;
    }
    if is_rooted(file_part) {
        return None;
    }

    let dir = document.parent().unwrap_or_else(|| Path::new(""));
    normalize(&dir.join(file_part))
}

fn is_rooted(path: &str) -> bool {
    let bytes = path.as_bytes();
    let drive = bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && matches!(bytes[2], b'\\' | b'/');
    drive || path.starts_with('\\') || path.starts_with('/')
}
