use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const BUMP: &str = r#"{
    "name": "bump",
    "about": "Bump a semantic version",
    "version": "1.0.0",
    "args": {
        "bump": {
            "flags": ["b", "bump"],
            "possible": ["major", "minor", "patch"],
            "ignore-case": true,
            "required": true,
            "help": "Part to bump"
        },
        "ver": { "required": true, "pattern": "^\\d+\\.\\d+\\.\\d+$", "help": "Current version" }
    }
}"#;

const SNAKE: &str = r#"{
    "name": "snake",
    "args": {
        "sep": { "flags": ["s", "sep"], "default": "-" },
        "words": { "multi": true, "required": true }
    }
}"#;

fn write_schema(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).expect("failed to write schema fixture");
    path
}

fn argsmith(args: &[&str], schema: &Path) -> Output {
    let (sub, rest) = args.split_first().expect("subcommand required");
    Command::new(env!("CARGO_BIN_EXE_argsmith"))
        .arg(sub)
        .arg(schema)
        .args(rest)
        .output()
        .expect("failed to run argsmith")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn assert_success(out: &Output, what: &str) {
    assert!(
        out.status.success(),
        "{what} failed:\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        out.status,
        stdout(out),
        String::from_utf8_lossy(&out.stderr),
    );
}

#[test]
fn help_works() {
    let out = Command::new(env!("CARGO_BIN_EXE_argsmith"))
        .arg("--help")
        .output()
        .expect("failed to run argsmith --help");
    assert_success(&out, "argsmith --help");
    let text = stdout(&out);
    assert!(
        text.contains("parse") && text.contains("usage") && text.contains("check"),
        "unexpected help output:\n{text}"
    );
}

#[test]
fn parse_prints_matches_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(&dir, "bump.json", BUMP);

    let out = argsmith(&["parse", "--", "-bMiNoR", "0.1.0"], &schema);
    assert_success(&out, "argsmith parse");
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json, serde_json::json!({ "bump": "MiNoR", "ver": "0.1.0" }));
}

#[test]
fn parse_passes_literal_tokens_after_double_dash() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(&dir, "snake.json", SNAKE);

    let out = argsmith(&["parse", "--", "--", "--notaflag", "is", "not"], &schema);
    assert_success(&out, "argsmith parse");
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "sep": "-", "words": ["--notaflag", "is", "not"] })
    );
}

#[test]
fn parse_error_goes_to_stdout_with_status_one() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(&dir, "bump.json", BUMP);

    let out = argsmith(&["parse", "--", "-b", "major", "1.2"], &schema);
    assert_eq!(out.status.code(), Some(1));
    let text = stdout(&out);
    assert!(
        text.starts_with("error: failed to validate the '1.2' value of <ver>: value does not match /"),
        "unexpected output:\n{text}"
    );
    assert!(text.contains("Usage: bump [options] <ver>"), "{text}");
}

#[test]
fn parse_help_and_version_exit_zero() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(&dir, "bump.json", BUMP);

    let out = argsmith(&["parse", "--", "--help"], &schema);
    assert_success(&out, "argsmith parse --help");
    let text = stdout(&out);
    assert!(text.starts_with("bump - Bump a semantic version\n"), "{text}");
    assert!(text.contains("[possible: major, minor, patch]"), "{text}");

    let out = argsmith(&["parse", "--", "-V"], &schema);
    assert_success(&out, "argsmith parse -V");
    assert_eq!(stdout(&out), "bump 1.0.0\n");
}

#[test]
fn usage_prints_help_text() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(&dir, "snake.json", SNAKE);

    let out = argsmith(&["usage"], &schema);
    assert_success(&out, "argsmith usage");
    let text = stdout(&out);
    assert!(text.contains("Usage: snake [options] <words...>"), "{text}");
    assert!(text.contains("-s --sep <sep>"), "{text}");
    assert!(text.contains("[default: -]"), "{text}");
}

#[test]
fn check_reports_ok_or_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(&dir, "snake.json", SNAKE);
    let out = argsmith(&["check"], &schema);
    assert_success(&out, "argsmith check");
    assert_eq!(stdout(&out), "OK: 2 arguments\n");

    let broken = write_schema(
        &dir,
        "broken.json",
        r#"{"name":"x","args":{"a":{"flags":["a"],"conflicts":["a"]}}}"#,
    );
    let out = argsmith(&["check"], &broken);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("failed to build parser"), "{stderr}");
}
