//! `docshift check` command.

use crate::cli::TreeArgs;
use crate::context::ServiceContext;
use crate::check::{self, CheckReport};
use crate::error::{Error, Result};
use crate::tree::DocTree;
use crate::Outcome;

/// Execute the `check` command.
///
/// Prints the report (as JSON with `json`) and returns
/// [`Outcome::BrokenLinks`] when any internal link fails to resolve.
///
/// # Errors
///
/// Returns an error if the root is missing, a document cannot be read, or
/// the JSON report cannot be produced.
pub fn run(ctx: &ServiceContext, args: &TreeArgs, json: bool) -> Result<Outcome> {
    let tree = DocTree::open(ctx, &args.resolve_root(None), &args.resolve_extension(None))?;
    let report = check::scan(ctx, &tree)?;

    println!("{}", render(&report, json)?);

    if report.is_clean() {
        Ok(Outcome::Success)
    } else {
        Ok(Outcome::BrokenLinks)
    }
}

fn render(report: &CheckReport, json: bool) -> Result<String> {
    if !json {
        return Ok(report.format());
    }
    serde_json::to_string_pretty(report).map_err(|e| Error::Io {
        action: "serialize report for",
        path: report.root.clone(),
        reason: e.to_string(),
    })
}
