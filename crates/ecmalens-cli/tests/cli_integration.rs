//! Integration tests for the ecmalens binary.

use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;

fn run(project: &Path, args: &[&str]) -> Value {
    let output = Command::new(env!("CARGO_BIN_EXE_ecmalens"))
        .arg("--project")
        .arg(project)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "ecmalens failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn items(value: &Value) -> &Vec<Value> {
    value[0]["items"].as_array().unwrap()
}

#[test]
fn test_exports_of_file() {
    let tmpdir = tempfile::tempdir().unwrap();
    let file = tmpdir.path().join("lib.js");
    fs::write(&file, "export const twoFer = () => 'x'\nexport default twoFer\n").unwrap();

    let value = run(tmpdir.path(), &["exports", file.to_str().unwrap()]);
    let exports = items(&value);
    assert_eq!(exports.len(), 2);
    assert_eq!(exports[0]["local"], "twoFer");
    assert_eq!(exports[0]["kind"], "function");
    assert_eq!(exports[1]["exported"], "default");
    assert_eq!(exports[1]["line"], 2);
}

#[test]
fn test_directory_uses_slug_file() {
    let tmpdir = tempfile::tempdir().unwrap();
    let dir = tmpdir.path().join("leap");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("leap.js"), "function isLeap(year) {}").unwrap();
    fs::write(dir.join("helper.js"), "function helper() {}").unwrap();
    fs::write(dir.join("leap.spec.js"), "test('x', () => {})").unwrap();

    let value = run(tmpdir.path(), &["functions", dir.to_str().unwrap()]);
    assert_eq!(value.as_array().unwrap().len(), 1);
    assert!(value[0]["file"].as_str().unwrap().ends_with("leap.js"));
    assert_eq!(items(&value)[0]["name"], "isLeap");
    assert_eq!(items(&value)[0]["kind"], "declaration");
}

#[test]
fn test_meta_config_wins_over_slug_file() {
    let tmpdir = tempfile::tempdir().unwrap();
    let dir = tmpdir.path().join("leap");
    fs::create_dir_all(dir.join(".meta")).unwrap();
    fs::write(
        dir.join(".meta").join("config.json"),
        r#"{ "files": { "solution": ["solution.js"], "test": ["leap.spec.js"] } }"#,
    )
    .unwrap();
    fs::write(dir.join("leap.js"), "function isLeap(year) {}").unwrap();
    fs::write(dir.join("solution.js"), "function fromConfig() {}").unwrap();

    let value = run(tmpdir.path(), &["functions", dir.to_str().unwrap()]);
    assert_eq!(value.as_array().unwrap().len(), 1);
    assert!(value[0]["file"].as_str().unwrap().ends_with("solution.js"));
    assert_eq!(items(&value)[0]["name"], "fromConfig");
}

#[test]
fn test_tests_use_configured_separator() {
    let tmpdir = tempfile::tempdir().unwrap();
    let config_dir = tmpdir.path().join(".ecmalens");
    fs::create_dir(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "[tests]\nname_separator = \" / \"\n").unwrap();
    let file = tmpdir.path().join("math.spec.js");
    fs::write(
        &file,
        "describe('math', () => {\n  it('adds', () => {\n    expect(add(1, 1)).toBe(2)\n  })\n})\n",
    )
    .unwrap();

    let value = run(tmpdir.path(), &["tests", file.to_str().unwrap()]);
    let tests = items(&value);
    assert_eq!(tests[0]["name"], "math / adds");
    assert_eq!(tests[0]["expectations"][0]["actual"], "add(1, 1)");
    assert_eq!(tests[0]["expectations"][0]["expect"], ".toBe(2)");
}

#[test]
fn test_variables_and_ast() {
    let tmpdir = tempfile::tempdir().unwrap();
    let file = tmpdir.path().join("vars.ts");
    fs::write(&file, "let [a, b] = pair\nconst c: number = 1\n").unwrap();

    let value = run(tmpdir.path(), &["variables", file.to_str().unwrap()]);
    let names: Vec<_> = items(&value).iter().map(|v| v["name"].clone()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);

    let value = run(tmpdir.path(), &["ast", "--representer", file.to_str().unwrap()]);
    assert_eq!(value[0]["program"]["type"], "Program");
    assert!(value[0]["program"].get("range").is_none());
}

#[test]
fn test_syntax_error_fails() {
    let tmpdir = tempfile::tempdir().unwrap();
    let file = tmpdir.path().join("broken.js");
    fs::write(&file, "const = ;").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_ecmalens"))
        .arg("--project")
        .arg(tmpdir.path())
        .args(["exports", file.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to parse"));
}
