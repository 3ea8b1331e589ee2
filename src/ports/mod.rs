//! Port traits defining external boundaries.
//!
//! The engine only reaches the outside world through these traits.
//! Implementations live in `src/adapters/`.

pub mod filesystem;

pub use filesystem::FileSystem;
