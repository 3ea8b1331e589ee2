//! Core library entry for the `docshift` CLI.
//!
//! Documents reference each other by relative links. `docshift` moves
//! documents to new locations under a root directory and rewrites every
//! affected link first, so the tree stays navigable; `docshift check`
//! verifies that it did.

pub mod adapters;
pub mod check;
pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod links;
pub mod plan;
pub mod ports;
pub mod relocate;
pub mod tree;

use std::process::ExitCode;

use clap::Parser;

pub use error::{Error, Result};

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command completed and found nothing wrong.
    Success,
    /// The checker found at least one broken internal link.
    BrokenLinks,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::BrokenLinks => ExitCode::from(1),
        }
    }
}

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns [`Error::Usage`] when argument parsing fails (including `--help`
/// and `--version`), or the fatal error raised by the command.
pub fn run<I, T>(args: I) -> Result<Outcome>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args)?;
    commands::dispatch(&cli)
}
