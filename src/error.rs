//! Error taxonomy shared by every command.
//!
//! Broken links and malformed link syntax are not errors; they are reported
//! through [`crate::check::CheckReport`] or passed through untouched.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions that abort a run.
#[derive(Debug, Error)]
pub enum Error {
    /// Command-line arguments could not be parsed (includes `--help`).
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// The document root does not exist or is not a directory.
    #[error("document root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// The relocation plan is unreadable or describes an impossible layout.
    #[error("invalid relocation plan {}: {reason}", path.display())]
    InvalidPlan {
        /// Plan file, or `<inline>` for plans built in code.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// More than one document carries a file name that the plan relocates.
    #[error(
        "identity `{identity}` is ambiguous, it is shared by: {}",
        paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
    )]
    AmbiguousIdentity {
        /// The duplicated base filename.
        identity: String,
        /// Every document path (relative to the root) with that name.
        paths: Vec<PathBuf>,
    },

    /// A relocation destination is already occupied.
    #[error("destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    /// A filesystem operation failed.
    #[error("failed to {action} {}: {reason}", path.display())]
    Io {
        /// The operation that failed, e.g. `read` or `rename`.
        action: &'static str,
        /// The path it was applied to.
        path: PathBuf,
        /// Underlying error text.
        reason: String,
    },
}

impl Error {
    /// Builds an [`Error::Io`] from a filesystem port failure.
    #[must_use]
    pub fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
        err: &(dyn std::error::Error + Send + Sync),
    ) -> Self {
        Self::Io { action, path: path.into(), reason: err.to_string() }
    }
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
