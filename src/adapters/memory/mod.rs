//! In-memory adapters.

pub mod filesystem;

pub use filesystem::MemoryFileSystem;
