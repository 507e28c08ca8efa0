//! End-to-end tests for the sgmlt binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command isolated from any user or system configuration.
fn sgmlt(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sgmlt").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .env_remove("SGMLT_CONFIG")
        .env_remove("SGMLT_VERBOSE");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_tokenize_text_output() {
    let dir = TempDir::new().unwrap();
    write(&dir, "doc.sgm", "<p   >hi</p>");

    sgmlt(&dir)
        .args(["tokenize", "doc.sgm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1:1\tcontent\tstago\t\"<\""))
        .stdout(predicate::str::contains("1:3\ttag\ts_tagc\t\"   >\""))
        .stdout(predicate::str::contains("content\t#data\t\"hi\""))
        .stdout(predicate::str::contains("etago"));
}

#[test]
fn test_tokenize_json_output() {
    let dir = TempDir::new().unwrap();
    write(&dir, "doc.sgm", "<a>");

    let output = sgmlt(&dir)
        .args(["tokenize", "--format", "json", "doc.sgm"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tokens = reports[0]["tokens"].as_array().unwrap();
    let names: Vec<_> = tokens.iter().map(|t| t["token"].as_str().unwrap()).collect();
    assert_eq!(names, ["stago", "name_start", "tagc"]);
    assert_eq!(reports[0]["syntax"], "reference");
}

#[test]
fn test_tokenize_multiple_files_keeps_order() {
    let dir = TempDir::new().unwrap();
    write(&dir, "one.sgm", "<x>");
    write(&dir, "two.sgm", "</y>");

    sgmlt(&dir)
        .args(["tokenize", "-j", "2", "one.sgm", "two.sgm"])
        .assert()
        .success()
        .stdout(predicate::str::is_match("(?s)== one.sgm ==.*stago.*== two.sgm ==.*etago").unwrap());
}

#[test]
fn test_tokenize_reports_non_sgml_characters() {
    let dir = TempDir::new().unwrap();
    write(&dir, "bad.sgm", "ok\u{1}\n");

    sgmlt(&dir)
        .args(["tokenize", "bad.sgm"])
        .assert()
        .success()
        .stderr(predicate::str::contains("error[E1001]: non-SGML character U+0001"))
        .stderr(predicate::str::contains("^"));
}

#[test]
fn test_tokenize_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    write(&dir, "ok.sgm", "text");

    sgmlt(&dir)
        .args(["tokenize", "ok.sgm", "missing.sgm"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("#data"))
        .stderr(predicate::str::contains("missing.sgm"));
}

#[test]
fn test_tokenize_unknown_mode_fails() {
    let dir = TempDir::new().unwrap();
    write(&dir, "doc.sgm", "x");

    sgmlt(&dir)
        .args(["tokenize", "--mode", "nowhere", "doc.sgm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown mode: nowhere"));
}

#[test]
fn test_custom_syntax_from_config() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "brackets.toml",
        r#"
name = "brackets"

[[tokens]]
name = "open"
pattern = ["["]
modes = ["main"]

[[modes]]
name = "main"
"#,
    );
    write(&dir, "sgmlt.toml", "syntax = \"brackets.toml\"\nshow_data = false\n");
    write(&dir, "doc.txt", "a[b[");

    sgmlt(&dir)
        .args(["tokenize", "doc.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1:2\tmain\topen"))
        .stdout(predicate::str::contains("1:4\tmain\topen"))
        .stdout(predicate::str::contains("#data").not());
}

#[test]
fn test_invalid_syntax_file_fails() {
    let dir = TempDir::new().unwrap();
    write(&dir, "broken.toml", "name = \"broken\"\n[[tokens]]\nname = 3\n");
    write(&dir, "doc.txt", "x");

    sgmlt(&dir)
        .args(["tokenize", "--syntax", "broken.toml", "doc.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Syntax error"));
}

#[test]
fn test_classes_command() {
    let dir = TempDir::new().unwrap();

    sgmlt(&dir)
        .args(["classes", "a 1", "--eof"])
        .assert()
        .success()
        .stdout(predicate::str::contains("U+0061\t\"a\""))
        .stdout(predicate::str::contains("namestart"))
        .stdout(predicate::str::contains("blank"))
        .stdout(predicate::str::contains("digit"))
        .stdout(predicate::str::contains("EOF\t-"));
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = TempDir::new().unwrap();

    sgmlt(&dir)
        .args(["--config", "nope.toml", "classes", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}
