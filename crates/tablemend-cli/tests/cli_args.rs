use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("tablemend").unwrap()
}

#[test]
fn help_flag_prints_usage_with_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("index"))
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("fix"))
        .stdout(predicate::str::contains("inject"))
        .stdout(predicate::str::contains("batch"));
}

#[test]
fn scan_subcommand_help() {
    cmd()
        .args(["scan", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TEXT"))
        .stdout(predicate::str::contains("--judge"))
        .stdout(predicate::str::contains("--format"));
}

#[test]
fn fix_subcommand_help() {
    cmd()
        .args(["fix", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TABLES"))
        .stdout(predicate::str::contains("TEXT"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--index"));
}

#[test]
fn extract_subcommand_help() {
    cmd()
        .args(["extract", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TABLES"))
        .stdout(predicate::str::contains("--pages"))
        .stdout(predicate::str::contains("--id"));
}

#[test]
fn batch_subcommand_help() {
    cmd()
        .args(["batch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--mode"))
        .stdout(predicate::str::contains("--sources"))
        .stdout(predicate::str::contains("--report"));
}

#[test]
fn no_args_shows_usage() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn scan_requires_text_argument() {
    cmd()
        .arg("scan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TEXT"));
}

#[test]
fn scan_missing_file_exits_nonzero() {
    cmd()
        .args(["scan", "/nonexistent/converted.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn index_requires_meta_or_from_source() {
    cmd().arg("index").assert().failure();
}

#[test]
fn extract_rejects_bad_page_span() {
    cmd()
        .args(["extract", "tables.json", "--pages", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid page number"));
}
