#![cfg(feature = "cli")]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const SCHEMA: &str = r#"{
    "title": { "type": "string" },
    "age": { "type": "number" },
    "types": { "type": ["string"] }
}"#;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "schemy-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("fixture should be writable");
    path
}

fn schemy(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_schemy"))
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("schemy should run")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

#[test]
fn check_reports_errors_in_order_and_exits_60() {
    let dir = unique_temp_dir("invalid");
    let schema = write(&dir, "schema.json", SCHEMA);
    let input = write(
        &dir,
        "input.json",
        r#"{"title":1,"age":"21","types":[1],"something":true}"#,
    );

    let output = schemy(&["--format", "json", "check", path_str(&schema), path_str(&input)]);

    assert_eq!(output.status.code(), Some(60));
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(report["valid"], false);
    assert_eq!(
        report["errors"],
        serde_json::json!([
            "Property something not valid in schema",
            "Property title is number, expected string",
            "Property age is string, expected number",
            "An item in array of property types is not valid. All items must be of type string"
        ])
    );
    assert_eq!(report["violations"][0]["kind"], "not_in_schema");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn check_non_strict_with_body_succeeds() {
    let dir = unique_temp_dir("body");
    let schema = write(&dir, "schema.json", SCHEMA);
    let input = write(&dir, "input.json", r#"{"title":"something","extra":21}"#);

    let output = schemy(&[
        "--format",
        "json",
        "check",
        path_str(&schema),
        path_str(&input),
        "--non-strict",
        "--body",
    ]);

    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(report["valid"], true);
    assert_eq!(report["body"], serde_json::json!({ "title": "something" }));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn malformed_schema_exits_64() {
    let dir = unique_temp_dir("malformed");
    let schema = write(&dir, "schema.json", r#"{"title":{"required":true}}"#);
    let input = write(&dir, "input.json", "{}");

    let output = schemy(&["check", path_str(&schema), path_str(&input)]);

    assert_eq!(output.status.code(), Some(64));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing `type`"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_input_exits_66() {
    let dir = unique_temp_dir("missing");
    let schema = write(&dir, "schema.json", SCHEMA);
    let missing = dir.join("absent.json");

    let output = schemy(&["check", path_str(&schema), path_str(&missing)]);

    assert_eq!(output.status.code(), Some(66));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn inspect_lists_rules_in_definition_order() {
    let dir = unique_temp_dir("inspect");
    let schema = write(
        &dir,
        "schema.json",
        r#"{"b":{"type":"number","required":true},"a":["string"],"strict":false}"#,
    );

    let output = schemy(&["--format", "json", "inspect", path_str(&schema)]);

    assert!(output.status.success());
    let info: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(info["strict"], false);
    assert_eq!(
        info["properties"],
        serde_json::json!([
            { "name": "b", "type": "number", "required": true },
            { "name": "a", "type": "[string]", "required": false }
        ])
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_prints_package_version() {
    let output = schemy(&["version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("schemy {}", env!("CARGO_PKG_VERSION")));
}
