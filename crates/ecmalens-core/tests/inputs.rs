use ecmalens_core::input::{DirectoryInput, DirectoryWithConfigInput, FileInput, FilePatterns, Input};
use ecmalens_core::{AstParser, ParseOptions};
use std::fs;

#[test]
fn test_file_input_reads_one_source() {
    let tmpdir = tempfile::tempdir().unwrap();
    let path = tmpdir.path().join("two-fer.js");
    fs::write(&path, "export const twoFer = () => 'One for you'").unwrap();

    let input = FileInput::new(&path);
    assert_eq!(input.file_name(), "two-fer.js");
    assert!(input.has_expected_extension());
    assert!(!input.is_test_file());
    assert_eq!(input.read(5).unwrap().len(), 1);
}

#[test]
fn test_file_input_classification() {
    assert!(FileInput::new("two-fer.spec.js").is_test_file());
    assert!(FileInput::new("jest.config.js").is_configuration_file());
    assert!(!FileInput::new("notes.txt").has_expected_extension());
}

#[test]
fn test_missing_file_is_io_error() {
    let tmpdir = tempfile::tempdir().unwrap();
    let err = FileInput::new(tmpdir.path().join("missing.js"))
        .read(1)
        .unwrap_err();
    assert_eq!(err.code(), "io");
}

#[test]
fn test_directory_prefers_slug_file() {
    let tmpdir = tempfile::tempdir().unwrap();
    let dir = tmpdir.path();
    fs::write(dir.join("a-helper.js"), "helper()").unwrap();
    fs::write(dir.join("two-fer.js"), "main()").unwrap();
    fs::write(dir.join("two-fer.spec.js"), "test()").unwrap();
    fs::write(dir.join("babel.config.js"), "config()").unwrap();
    fs::write(dir.join("README.md"), "# readme").unwrap();

    let input = DirectoryInput::new(dir, "two-fer");
    let names: Vec<_> = input
        .candidates(10)
        .unwrap()
        .iter()
        .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
        .collect();
    assert_eq!(names, vec!["two-fer.js", "a-helper.js"]);

    let sources = input.read(1).unwrap();
    assert_eq!(sources, vec!["main()".to_string()]);
}

#[test]
fn test_directory_with_custom_patterns() {
    let tmpdir = tempfile::tempdir().unwrap();
    let dir = tmpdir.path();
    fs::write(dir.join("lib.ts"), "run()").unwrap();
    fs::write(dir.join("lib.js"), "run()").unwrap();

    let patterns = FilePatterns::new(r"\.ts$", r"\.test\.", r"^$").unwrap();
    let input = DirectoryInput::new(dir, "lib")
        .with_preferred_extension("ts")
        .with_patterns(patterns);
    let candidates = input.candidates(10).unwrap();
    assert_eq!(candidates.len(), 1);
    assert!(candidates[0].ends_with("lib.ts"));
}

#[test]
fn test_parse_directory_input() {
    let tmpdir = tempfile::tempdir().unwrap();
    fs::write(tmpdir.path().join("leap.js"), "export const isLeap = (y) => y % 4 === 0").unwrap();
    let parsed = AstParser::new(ParseOptions::ANALYZER, 1)
        .parse(&DirectoryInput::new(tmpdir.path(), "leap"))
        .unwrap();
    assert_eq!(parsed.len(), 1);
}

#[test]
fn test_empty_directory_is_no_source() {
    let tmpdir = tempfile::tempdir().unwrap();
    let err = AstParser::ANALYZER
        .parse(&DirectoryInput::new(tmpdir.path(), "leap"))
        .unwrap_err();
    assert_eq!(err.code(), "no_source");
}

#[test]
fn test_missing_directory_is_io_error() {
    let tmpdir = tempfile::tempdir().unwrap();
    let err = DirectoryInput::new(tmpdir.path().join("nope"), "leap")
        .candidates(1)
        .unwrap_err();
    assert_eq!(err.code(), "io");
}

#[test]
fn test_directory_ignores_ignore_files() {
    let tmpdir = tempfile::tempdir().unwrap();
    let dir = tmpdir.path();
    fs::write(dir.join(".ignore"), "helper.js\n").unwrap();
    fs::write(dir.join(".gitignore"), "*.js\n").unwrap();
    fs::write(dir.join("helper.js"), "helper()").unwrap();
    fs::write(dir.join("leap.js"), "leap()").unwrap();

    let candidates = DirectoryInput::new(dir, "leap").candidates(10).unwrap();
    assert_eq!(candidates.len(), 2);
    assert!(candidates[0].ends_with("leap.js"));
    assert!(candidates[1].ends_with("helper.js"));
}

fn write_meta(dir: &std::path::Path, config: &str) {
    fs::create_dir_all(dir.join(".meta")).unwrap();
    fs::write(dir.join(".meta").join("config.json"), config).unwrap();
}

#[test]
fn test_configured_directory_reads_solution_files_in_order() {
    let tmpdir = tempfile::tempdir().unwrap();
    let dir = tmpdir.path();
    write_meta(
        dir,
        r#"{
  "blurb": "Leap years",
  "authors": [{ "github_username": "someone", "exercism_username": "someone" }],
  "files": {
    "solution": ["src/main.js", "helper.js"],
    "test": ["leap.spec.js"],
    "example": [".meta/proof.ci.js"]
  }
}"#,
    );
    fs::create_dir_all(dir.join("src")).unwrap();
    fs::write(dir.join("src").join("main.js"), "main()").unwrap();
    fs::write(dir.join("helper.js"), "helper()").unwrap();
    fs::write(dir.join("leap.js"), "ignored()").unwrap();

    assert!(DirectoryWithConfigInput::is_configured(dir));
    let input = DirectoryWithConfigInput::new(dir).unwrap();
    assert_eq!(input.configuration().blurb, "Leap years");
    assert_eq!(input.configuration().files.example, vec![".meta/proof.ci.js"]);
    assert_eq!(input.files(10), vec![dir.join("src/main.js"), dir.join("helper.js")]);
    assert_eq!(input.read(10).unwrap(), vec!["main()", "helper()"]);

    let parsed = AstParser::new(ParseOptions::ANALYZER, 2).parse(&input).unwrap();
    assert_eq!(parsed.len(), 2);
}

#[test]
fn test_configured_directory_respects_limit() {
    let tmpdir = tempfile::tempdir().unwrap();
    let dir = tmpdir.path();
    write_meta(
        dir,
        r#"{ "files": { "solution": ["b.js", "a.js"], "test": ["a.spec.js"] } }"#,
    );
    fs::write(dir.join("a.js"), "a()").unwrap();
    fs::write(dir.join("b.js"), "b()").unwrap();

    let input = DirectoryWithConfigInput::new(dir).unwrap();
    assert_eq!(input.files(1), vec![dir.join("b.js")]);
    assert_eq!(input.read(1).unwrap(), vec!["b()"]);
    assert!(input.read(0).unwrap().is_empty());
}

#[test]
fn test_empty_solution_list_is_not_configured() {
    let tmpdir = tempfile::tempdir().unwrap();
    let dir = tmpdir.path();
    write_meta(dir, r#"{ "files": { "solution": [], "test": ["leap.spec.js"] } }"#);

    assert!(!DirectoryWithConfigInput::is_configured(dir));
    let input = DirectoryWithConfigInput::new(dir).unwrap();
    assert!(input.files(5).is_empty());
    let err = AstParser::ANALYZER.parse(&input).unwrap_err();
    assert_eq!(err.code(), "no_source");
}

#[test]
fn test_missing_or_invalid_meta_config() {
    let tmpdir = tempfile::tempdir().unwrap();
    let dir = tmpdir.path();
    assert!(!DirectoryWithConfigInput::is_configured(dir));
    assert_eq!(DirectoryWithConfigInput::new(dir).unwrap_err().code(), "io");

    write_meta(dir, "{ \"files\": ");
    assert!(!DirectoryWithConfigInput::is_configured(dir));
    assert_eq!(DirectoryWithConfigInput::new(dir).unwrap_err().code(), "config");

    write_meta(dir, r#"{ "files": { "solution": ["leap.js"] } }"#);
    assert!(!DirectoryWithConfigInput::is_configured(dir));
}
