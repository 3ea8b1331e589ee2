//! `docshift relocate` command.

use std::path::Path;

use crate::cli::TreeArgs;
use crate::context::ServiceContext;
use crate::error::Result;
use crate::tree::DocTree;
use crate::{plan, relocate, Outcome};

/// Execute the `relocate` command.
///
/// Loads the plan, rewrites every document's links for the planned layout,
/// then moves the files, printing what changed.
///
/// # Errors
///
/// Returns an error if the plan is invalid, the root is missing, a relocated
/// file name is ambiguous, a destination is occupied, or I/O fails.
pub fn run(
    ctx: &ServiceContext,
    args: &TreeArgs,
    plan_path: &Path,
    dry_run: bool,
) -> Result<Outcome> {
    let loaded = plan::load(ctx, plan_path)?;
    let root = args.resolve_root(loaded.root);
    let tree = DocTree::open(ctx, &root, &args.resolve_extension(loaded.extension))?;

    tracing::info!(root = %tree.root().display(), moves = loaded.map.len(), dry_run, "relocating");
    let report = relocate::run(ctx, &tree, &loaded.map, dry_run)?;

    if report.is_noop() {
        println!("Nothing to do.");
    } else {
        println!("{}", report.format());
    }
    Ok(Outcome::Success)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::adapters::memory::MemoryFileSystem;
    use crate::error::Error;

    fn args(root: Option<&str>) -> TreeArgs {
        TreeArgs { root: root.map(PathBuf::from), extension: None }
    }

    #[test]
    fn relocates_using_root_from_plan() {
        let ctx = ServiceContext::with_fs(MemoryFileSystem::with_files(&[
            ("/p/plan.yaml", "root: docs\nmoves:\n  B.md: sub/B.md\n"),
            ("/p/docs/A.md", "[see B](B.md)"),
            ("/p/docs/B.md", "b"),
        ]));

        let outcome = run(&ctx, &args(None), Path::new("/p/plan.yaml"), false).unwrap();

        assert_eq!(outcome, Outcome::Success);
        assert_eq!(ctx.fs.read_to_string(Path::new("/p/docs/A.md")).unwrap(), "[see B](sub/B.md)");
        assert!(ctx.fs.exists(Path::new("/p/docs/sub/B.md")));
    }

    #[test]
    fn missing_root_is_reported_before_any_change() {
        let ctx = ServiceContext::with_fs(MemoryFileSystem::with_files(&[(
            "/p/plan.yaml",
            "moves:\n  B.md: sub/B.md\n",
        )]));

        let err = run(&ctx, &args(Some("/p/absent")), Path::new("/p/plan.yaml"), false)
            .unwrap_err();

        assert!(matches!(err, Error::RootNotFound(_)));
    }
}
