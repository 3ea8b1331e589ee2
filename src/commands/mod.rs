//! Command dispatch and handlers.

pub mod check;
pub mod plan;
pub mod relocate;

use crate::cli::{Cli, Command};
use crate::context::ServiceContext;
use crate::error::Result;
use crate::Outcome;

/// Dispatch a parsed command to its handler against the real disk.
///
/// # Errors
///
/// Returns the fatal error raised by the selected command handler.
pub fn dispatch(cli: &Cli) -> Result<Outcome> {
    dispatch_with_context(cli, &ServiceContext::live())
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns the fatal error raised by the selected command handler.
pub fn dispatch_with_context(cli: &Cli, ctx: &ServiceContext) -> Result<Outcome> {
    match &cli.command {
        Command::Relocate { plan, dry_run } => relocate::run(ctx, &cli.tree, plan, *dry_run),
        Command::Plan { plan } => plan::run(ctx, &cli.tree, plan),
        Command::Check { json } => check::run(ctx, &cli.tree, *json),
    }
}
