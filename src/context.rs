//! Service context bundling the port trait objects.

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::ports::filesystem::FileSystem;

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations; the engine only
/// ever sees the traits.
pub struct ServiceContext {
    /// Filesystem for reading, rewriting and moving documents.
    pub fs: Box<dyn FileSystem>,
}

impl ServiceContext {
    /// Creates a live context backed by the real disk.
    #[must_use]
    pub fn live() -> Self {
        Self { fs: Box::new(LiveFileSystem) }
    }

    /// Creates a context around the given filesystem adapter.
    #[must_use]
    pub fn with_fs(fs: impl FileSystem + 'static) -> Self {
        Self { fs: Box::new(fs) }
    }
}
