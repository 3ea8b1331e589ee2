//! Adapter implementations of the port traits.
//!
//! `live` talks to the real disk; `memory` keeps a whole document tree in
//! memory for tests.

pub mod live;
pub mod memory;
