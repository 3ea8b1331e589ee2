//! `docshift plan` command.

use std::path::Path;

use crate::cli::TreeArgs;
use crate::context::ServiceContext;
use crate::error::Result;
use crate::relocate::{status, EntryStatus};
use crate::tree::{display_path, DocTree};
use crate::{plan, Outcome};

/// Execute the `plan` command: list every move and where it stands.
///
/// # Errors
///
/// Returns an error if the plan is invalid or the root is missing.
pub fn run(ctx: &ServiceContext, args: &TreeArgs, plan_path: &Path) -> Result<Outcome> {
    let loaded = plan::load(ctx, plan_path)?;
    let root = args.resolve_root(loaded.root);
    let tree = DocTree::open(ctx, &root, &args.resolve_extension(loaded.extension))?;

    if loaded.map.is_empty() {
        println!("No moves planned.");
        return Ok(Outcome::Success);
    }

    let rows = status(ctx, &tree, &loaded.map);
    let width = rows.iter().map(|(e, _)| e.identity.chars().count()).max().unwrap_or(0);

    println!("Plan for {} ({} moves):", tree.root().display(), rows.len());
    for (entry, state) in &rows {
        println!(
            "  [{:<7}] {:<width$} -> {}",
            label(*state),
            entry.identity,
            display_path(&entry.destination),
        );
    }
    Ok(Outcome::Success)
}

fn label(state: EntryStatus) -> &'static str {
    match state {
        EntryStatus::Pending => "pending",
        EntryStatus::Moved => "moved",
        EntryStatus::InPlace => "in place",
        EntryStatus::Blocked => "BLOCKED",
        EntryStatus::Missing => "missing",
    }
}
