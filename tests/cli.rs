//! Integration tests for top-level CLI behavior.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn run_docshift(dir: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_docshift");
    Command::new(bin)
        .args(args)
        .current_dir(dir)
        .env_remove("DOCSHIFT_ROOT")
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run docshift binary")
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn abc_tree(dir: &Path) {
    let docs = dir.join("docs");
    write(&docs.join("A.md"), "# A\n\n[to B](B.md)\n");
    write(&docs.join("B.md"), "# B\n\n[to C](C.md#intro)\n");
    write(&docs.join("C.md"), "# C\n\n[back](B.md)\n");
    write(&dir.join("plan.yaml"), "moves:\n  B.md: guide/B.md\n  C.md: guide/deep/C.md\n");
}

#[test]
fn relocate_then_check_is_clean() {
    let dir = tempfile::tempdir().unwrap();
    abc_tree(dir.path());
    let docs = dir.path().join("docs");

    let output = run_docshift(dir.path(), &["relocate", "--plan", "plan.yaml"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0), "{stdout}");
    assert!(stdout.contains("Updated links in:"));
    assert!(stdout.contains("- B.md -> guide/B.md"));

    assert_eq!(fs::read_to_string(docs.join("A.md")).unwrap(), "# A\n\n[to B](guide/B.md)\n");
    assert_eq!(
        fs::read_to_string(docs.join("guide/B.md")).unwrap(),
        "# B\n\n[to C](deep/C.md#intro)\n"
    );
    assert_eq!(
        fs::read_to_string(docs.join("guide/deep/C.md")).unwrap(),
        "# C\n\n[back](../B.md)\n"
    );
    assert!(!docs.join("B.md").exists());

    let check = run_docshift(dir.path(), &["check"]);
    let stdout = String::from_utf8_lossy(&check.stdout);
    assert_eq!(check.status.code(), Some(0), "{stdout}");
    assert!(stdout.contains("OK: no broken internal links found."));
}

#[test]
fn second_relocate_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    abc_tree(dir.path());

    assert!(run_docshift(dir.path(), &["relocate", "--plan", "plan.yaml"]).status.success());
    let again = run_docshift(dir.path(), &["relocate", "--plan", "plan.yaml"]);

    assert!(again.status.success());
    assert!(String::from_utf8_lossy(&again.stdout).contains("Nothing to do."));
}

#[test]
fn dry_run_leaves_tree_untouched() {
    let dir = tempfile::tempdir().unwrap();
    abc_tree(dir.path());
    let docs = dir.path().join("docs");

    let output = run_docshift(dir.path(), &["relocate", "--plan", "plan.yaml", "--dry-run"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Would move files:"));
    assert_eq!(fs::read_to_string(docs.join("A.md")).unwrap(), "# A\n\n[to B](B.md)\n");
    assert!(docs.join("B.md").exists());
    assert!(!docs.join("guide").exists());
}

#[test]
fn check_reports_broken_link_with_exit_one() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("docs/sub/X.md"), "# X\n\n[gone](missing.md)\n");

    let output = run_docshift(dir.path(), &["check"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("- sub/X.md:3 -> missing.md"), "{stdout}");
}

#[test]
fn check_json_lists_broken_links() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("handbook/X.md"), "[gone](missing.md)");

    let output = run_docshift(dir.path(), &["check", "--root", "handbook", "--json"]);
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(report["scanned"], 1);
    assert_eq!(report["broken"][0]["target"], "missing.md");
    assert_eq!(report["broken"][0]["line"], 1);
}

#[test]
fn missing_root_exits_two() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_docshift(dir.path(), &["check", "--root", "nowhere"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("document root not found"), "{stderr}");
}

#[test]
fn collision_exits_two_and_keeps_destination() {
    let dir = tempfile::tempdir().unwrap();
    abc_tree(dir.path());
    let docs = dir.path().join("docs");
    write(&docs.join("guide/intro.md"), "occupied");
    write(&dir.path().join("rename.yaml"), "moves:\n  B.md: guide/intro.md\n");

    let output = run_docshift(dir.path(), &["relocate", "--plan", "rename.yaml"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("destination already exists"), "{stderr}");
    assert_eq!(fs::read_to_string(docs.join("guide/intro.md")).unwrap(), "occupied");
    assert!(docs.join("B.md").exists());
}

#[test]
fn plan_lists_entries_without_moving() {
    let dir = tempfile::tempdir().unwrap();
    abc_tree(dir.path());

    let output = run_docshift(dir.path(), &["plan", "--plan", "plan.yaml"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("pending"), "{stdout}");
    assert!(stdout.contains("guide/deep/C.md"));
    assert!(dir.path().join("docs/C.md").exists());
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_docshift(dir.path(), &["unknown"]);

    assert!(!output.status.success());
    assert!(!String::from_utf8_lossy(&output.stderr).is_empty());
}

#[test]
fn help_succeeds() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_docshift(dir.path(), &["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("relocate"));
    assert!(stdout.contains("check"));
}

#[test]
fn dry_run_of_rename_chain_matches_real_run() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("docs/a.md"), "a");
    write(&dir.path().join("docs/b.md"), "b");
    write(&dir.path().join("plan.yaml"), "moves:\n  b.md: c.md\n  a.md: b.md\n");

    let dry = run_docshift(dir.path(), &["relocate", "--plan", "plan.yaml", "--dry-run"]);
    let dry_out = String::from_utf8_lossy(&dry.stdout);
    assert_eq!(dry.status.code(), Some(0), "{}", String::from_utf8_lossy(&dry.stderr));
    assert!(dry_out.contains("- b.md -> c.md\n- a.md -> b.md"), "{dry_out}");

    let real = run_docshift(dir.path(), &["relocate", "--plan", "plan.yaml"]);
    assert_eq!(real.status.code(), Some(0));
    assert_eq!(fs::read_to_string(dir.path().join("docs/b.md")).unwrap(), "a");
    assert_eq!(fs::read_to_string(dir.path().join("docs/c.md")).unwrap(), "b");
}

#[cfg(unix)]
#[test]
fn symlink_loop_does_not_multiply_documents() {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("docs");
    write(&docs.join("A.md"), "[gone](missing.md)");
    write(&docs.join("B.md"), "b");
    std::os::unix::fs::symlink(".", docs.join("self")).unwrap();

    let check = run_docshift(dir.path(), &["check"]);
    let stdout = String::from_utf8_lossy(&check.stdout);
    assert_eq!(check.status.code(), Some(1));
    assert!(stdout.contains("Scanned 2 documents"), "{stdout}");
    assert_eq!(stdout.matches("missing.md").count(), 1);

    write(&dir.path().join("plan.yaml"), "moves:\n  B.md: sub/B.md\n");
    let relocate = run_docshift(dir.path(), &["relocate", "--plan", "plan.yaml"]);
    assert_eq!(relocate.status.code(), Some(0), "{}", String::from_utf8_lossy(&relocate.stderr));
    assert!(docs.join("sub/B.md").exists());
}
