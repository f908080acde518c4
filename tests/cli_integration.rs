// CLI integration tests for save/load/check flows and error envelopes.
use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::{Value, json};

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_jsonmap");
    Command::new(exe)
}

fn parse_json(bytes: &[u8]) -> Value {
    let text = std::str::from_utf8(bytes).expect("utf8");
    serde_json::from_str(text.trim()).expect("valid json")
}

#[test]
fn save_load_check_flow() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("out.json");
    let path_arg = path.to_str().unwrap();

    let save = cmd()
        .args(["save", path_arg, r#"{"a": 1, "b": [1, 2, 3], "c": {"d": null}}"#])
        .output()
        .expect("save");
    assert!(save.status.success());
    let saved = parse_json(&save.stdout);
    assert_eq!(saved["saved"]["keys"], 3);
    assert_eq!(saved["saved"]["path"], path_arg);

    let file_text = std::fs::read_to_string(&path).expect("read");
    assert!(file_text.starts_with("{\n  \"a\": 1,"));

    let load = cmd().args(["load", path_arg]).output().expect("load");
    assert!(load.status.success());
    assert_eq!(
        parse_json(&load.stdout),
        json!({"a": 1, "b": [1, 2, 3], "c": {"d": null}})
    );

    let check = cmd().args(["check", path_arg]).output().expect("check");
    assert!(check.status.success());
    let report = parse_json(&check.stdout);
    assert_eq!(report["ok"], true);
    assert_eq!(report["keys"], 3);
}

#[test]
fn save_reads_stdin_and_honors_flags() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("sorted.json");

    let mut child = cmd()
        .args([
            "save",
            "--sort-keys",
            "--indent",
            "0",
            "--trailing-newline",
            path.to_str().unwrap(),
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(br#"{"z": 1, "a": {"y": 2, "b": 3}}"#)
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");
    assert!(output.status.success());

    let text = std::fs::read_to_string(&path).expect("read");
    assert_eq!(text, "{\"a\":{\"b\":3,\"y\":2},\"z\":1}\n");
}

#[test]
fn missing_file_exits_not_found_with_json_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("missing.json");

    let load = cmd()
        .args(["load", path.to_str().unwrap()])
        .output()
        .expect("load");
    assert_eq!(load.status.code(), Some(3));
    assert!(load.stdout.is_empty());
    let err = parse_json(&load.stderr);
    assert_eq!(err["error"]["kind"], "NotFound");
    assert!(err["error"]["path"].as_str().unwrap().ends_with("missing.json"));
}

#[test]
fn malformed_file_exits_parse() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("bad.json");
    std::fs::write(&path, "not valid json").expect("write");

    let check = cmd()
        .args(["check", path.to_str().unwrap()])
        .output()
        .expect("check");
    assert_eq!(check.status.code(), Some(6));
    let err = parse_json(&check.stderr);
    assert_eq!(err["error"]["kind"], "Parse");
    assert_eq!(err["error"]["line"], 1);
    assert!(err["error"]["hint"].as_str().unwrap().contains("syntax"));
}

#[test]
fn non_object_input_is_rejected_before_writing() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("list.json");

    let save = cmd()
        .args(["save", path.to_str().unwrap(), "[1, 2, 3]"])
        .output()
        .expect("save");
    assert_eq!(save.status.code(), Some(6));
    assert!(!path.exists());
}

#[test]
fn unknown_flag_is_usage_error() {
    let output = cmd()
        .args(["load", "--frobnicate", "x.json"])
        .output()
        .expect("load");
    assert_eq!(output.status.code(), Some(2));
    let err = parse_json(&output.stderr);
    assert_eq!(err["error"]["kind"], "Usage");
}
