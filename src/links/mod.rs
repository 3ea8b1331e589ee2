//! Hyperlink handling: scanning, classification, relative-path arithmetic
//! and rewriting.
//!
//! Links are recognised with a plain `[label](target)` pattern, not a
//! markdown parser. The first `)` after the opening `(` ends the target and
//! labels cannot contain `]`, so nested brackets or parentheses in labels or
//! targets are not supported. Anything the pattern does not match is left
//! exactly as it is.

pub mod classify;
pub mod relative;
pub mod rewrite;
pub mod scan;

pub use classify::{classify, LinkClass};
pub use relative::{normalize, relative_link};
pub use rewrite::{rewrite, Rewrite, RewrittenLink};
pub use scan::{links, split_target, Link};
