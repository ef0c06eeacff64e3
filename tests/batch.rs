use std::fs;
use std::path::Path;

use dmnify::batch::{discover, process_directory};
use dmnify::validate::Document;
use dmnify::{BatchConfig, ConvertConfig, DmnifyError, validate};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, text: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

fn config(out: &Path) -> BatchConfig {
    BatchConfig {
        output_dir: out.to_path_buf(),
        workers: 4,
        ..BatchConfig::default()
    }
}

#[test]
fn discovers_nested_files_in_order() {
    let input = TempDir::new().unwrap();
    write(input.path(), "b.txt", "");
    write(input.path(), "a.txt", "");
    write(input.path(), "nested/c.txt", "");
    write(input.path(), "notes.md", "");

    let found = discover(input.path(), "txt").unwrap();
    let names: Vec<_> = found
        .iter()
        .map(|p| p.strip_prefix(input.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        names,
        [Path::new("a.txt"), Path::new("b.txt"), Path::new("nested/c.txt")]
    );
}

#[test]
fn converts_a_directory() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(
        input.path(),
        "loan-rules.txt",
        "If credit score >= 700, approved is true.\nOtherwise, approved is false.\n",
    );
    write(
        input.path(),
        "shipping.txt",
        "If weight > 20, carrier is freight.\nnot a rule\n",
    );

    let report = process_directory(input.path(), &config(output.path())).unwrap();
    assert_eq!(report.total_files(), 2);
    assert_eq!(report.successful_files(), 2);
    assert_eq!(report.total_rules(), 3);
    assert_eq!(report.total_tables(), 2);

    let xml = fs::read_to_string(output.path().join("loan-rules.dmn")).unwrap();
    assert!(validate(&xml).is_valid());
    let doc = Document::parse(&xml).unwrap();
    let decision = doc.find_all("decision")[0];
    assert_eq!(decision.attribute("name"), Some("loan rules"));
    assert_eq!(decision.attribute("id"), Some("loan-rules"));

    let shipping = &report.results()[1];
    assert_eq!(shipping.file_name(), "shipping.txt");
    assert_eq!(shipping.outcome.as_ref().unwrap().skipped, 1);
}

#[test]
fn large_files_are_split_into_parts() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let text: String = (0..5)
        .map(|i| format!("If code is {i}, label is l{i}.\n"))
        .collect();
    write(input.path(), "codes.txt", &text);

    let mut config = config(output.path());
    config.convert = ConvertConfig {
        max_rules_per_table: 2,
        ..ConvertConfig::default()
    };
    let report = process_directory(input.path(), &config).unwrap();
    assert_eq!(report.total_tables(), 3);

    for (part, rows) in [(1, 2), (2, 2), (3, 1)] {
        let xml = fs::read_to_string(output.path().join(format!("codes_part{part}.dmn"))).unwrap();
        let doc = Document::parse(&xml).unwrap();
        assert_eq!(doc.find_all("rule").len(), rows, "part {part}");
    }
    assert!(!output.path().join("codes.dmn").exists());
}

#[test]
fn failures_do_not_stop_the_batch() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(input.path(), "empty.txt", "# nothing yet\n");
    write(input.path(), "garbage.txt", "hello\nworld\n");
    write(input.path(), "good.txt", "If a is 1, b is 2.\n");

    let report = process_directory(input.path(), &config(output.path())).unwrap();
    assert_eq!(report.total_files(), 3);
    assert_eq!(report.successful_files(), 1);
    assert_eq!(report.failed_files(), 2);

    let failed: Vec<_> = report.failures().map(|r| r.file_name()).collect();
    assert_eq!(failed, ["empty.txt", "garbage.txt"]);
    assert!(matches!(
        report.results()[1].outcome,
        Err(DmnifyError::NoValidRules { skipped: 2 })
    ));
    assert!(output.path().join("good.dmn").exists());
    assert!(!output.path().join("empty.dmn").exists());
}

#[test]
fn creates_the_output_directory() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let nested = output.path().join("deep/er");
    write(input.path(), "x.txt", "If a is 1, b is 2.\n");

    let report = process_directory(input.path(), &config(&nested)).unwrap();
    assert_eq!(report.successful_files(), 1);
    assert!(nested.join("x.dmn").exists());
}

#[test]
fn missing_input_directory_is_an_error() {
    let output = TempDir::new().unwrap();
    let err = process_directory(Path::new("/definitely/not/here"), &config(output.path()))
        .unwrap_err();
    assert!(matches!(err, DmnifyError::Io(_)));
}

#[test]
fn empty_directory_gives_empty_report() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let report = process_directory(input.path(), &config(output.path())).unwrap();
    assert_eq!(report.total_files(), 0);
    assert_eq!(report.total_tables(), 0);
}

#[cfg(unix)]
#[test]
fn directory_symlinks_are_not_followed() {
    use std::os::unix::fs::symlink;

    let input = TempDir::new().unwrap();
    write(input.path(), "a.txt", "If a is 1, b is 2.\n");
    symlink(input.path(), input.path().join("loop")).unwrap();
    symlink(input.path().join("a.txt"), input.path().join("alias.txt")).unwrap();
    fs::create_dir(input.path().join("folder.txt")).unwrap();

    let found = discover(input.path(), "txt").unwrap();
    assert_eq!(
        found,
        [input.path().join("a.txt"), input.path().join("alias.txt")]
    );
}
