//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::tree::DEFAULT_EXTENSION;

/// Top-level CLI parser for `docshift`.
#[derive(Debug, Parser)]
#[command(name = "docshift", version, about = "Move documents without breaking their links")]
pub struct Cli {
    /// Options shared by every command.
    #[command(flatten)]
    pub tree: TreeArgs,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Where the document tree lives.
#[derive(Debug, Clone, Args)]
pub struct TreeArgs {
    /// Root directory of the document tree [default: plan's `root`, else ./docs].
    #[arg(long, global = true, env = "DOCSHIFT_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,
    /// Extension of managed documents [default: plan's `extension`, else md].
    #[arg(long, global = true, value_name = "EXT")]
    pub extension: Option<String>,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rewrite links for the planned layout, then move the files.
    Relocate {
        /// YAML plan mapping file names to their destinations.
        #[arg(long, value_name = "FILE")]
        plan: PathBuf,
        /// Report what would change without touching the disk.
        #[arg(long)]
        dry_run: bool,
    },
    /// Show every planned move and whether it is pending or done.
    Plan {
        /// YAML plan mapping file names to their destinations.
        #[arg(long, value_name = "FILE")]
        plan: PathBuf,
    },
    /// Verify that every internal document link resolves.
    Check {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl TreeArgs {
    /// Resolves the root: explicit flag or environment, then the plan's, then `docs`.
    #[must_use]
    pub fn resolve_root(&self, from_plan: Option<PathBuf>) -> PathBuf {
        self.root.clone().or(from_plan).unwrap_or_else(|| PathBuf::from("docs"))
    }

    /// Resolves the extension: explicit flag, then the plan's, then `md`.
    #[must_use]
    pub fn resolve_extension(&self, from_plan: Option<String>) -> String {
        self.extension.clone().or(from_plan).unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, TreeArgs};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn parses_relocate_subcommand() {
        let cli = Cli::parse_from(["docshift", "relocate", "--plan", "moves.yaml", "--dry-run"]);
        assert!(matches!(
            cli.command,
            Command::Relocate { ref plan, dry_run: true } if plan == &PathBuf::from("moves.yaml")
        ));
    }

    #[test]
    fn parses_check_with_global_root() {
        let cli = Cli::parse_from(["docshift", "check", "--root", "handbook", "--json"]);
        assert!(matches!(cli.command, Command::Check { json: true }));
        assert_eq!(cli.tree.root, Some(PathBuf::from("handbook")));
    }

    #[test]
    fn relocate_requires_plan() {
        assert!(Cli::try_parse_from(["docshift", "relocate"]).is_err());
    }

    #[test]
    fn flag_beats_plan_which_beats_default() {
        let cli = Cli::parse_from(["docshift", "--extension", "txt", "--root", "r", "check"]);
        assert_eq!(cli.tree.resolve_extension(Some("md".into())), "txt");
        assert_eq!(cli.tree.resolve_root(Some(PathBuf::from("from-plan"))), PathBuf::from("r"));

        let unset = TreeArgs { root: None, extension: None };
        let from_plan = PathBuf::from("from-plan");
        assert_eq!(unset.resolve_root(Some(from_plan.clone())), from_plan);
        assert_eq!(unset.resolve_root(None), PathBuf::from("docs"));
        assert_eq!(unset.resolve_extension(Some("txt".into())), "txt");
        assert_eq!(unset.resolve_extension(None), "md");
    }
}
