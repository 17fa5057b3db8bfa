//! Discovery and pipeline tests over real temporary trees.

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use pyscope_cli::discovery::discover_files;
use pyscope_cli::{process_files, run_main, OutputFormat, PyscopeOptions};

fn opts_for_dir(dir: &TempDir) -> PyscopeOptions {
    PyscopeOptions {
        files: vec![],
        dirs: vec![dir.path().to_string_lossy().into_owned()],
        output: None,
        no_clean: true,
        format: OutputFormat::Json,
    }
}

#[test]
fn test_discover_skips_non_python_and_virtualenvs() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("app.py"), "x = 1\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "not code").unwrap();
    fs::create_dir_all(dir.path().join("venv")).unwrap();
    fs::write(dir.path().join("venv").join("skip.py"), "x = 1\n").unwrap();
    fs::create_dir_all(dir.path().join("pkg")).unwrap();
    fs::write(dir.path().join("pkg").join("util.py"), "y = 2\n").unwrap();

    let mut files = discover_files(&opts_for_dir(&dir)).unwrap();
    files.sort();

    let names: Vec<&str> = files
        .iter()
        .filter_map(|f| f.rsplit('/').next())
        .collect();
    assert_eq!(names, vec!["app.py", "util.py"]);
}

#[test]
fn test_discover_skips_generated_modules() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("service_pb2.py"), "x = 1\n").unwrap();
    fs::write(dir.path().join("service_pb2_grpc.py"), "x = 1\n").unwrap();
    fs::write(dir.path().join("service.py"), "x = 1\n").unwrap();

    let files = discover_files(&opts_for_dir(&dir)).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("service.py"));
}

#[test]
fn test_discover_empty_directory_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(discover_files(&opts_for_dir(&dir)).is_err());
}

#[test]
fn test_process_files_tags_records_with_their_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mod.py");
    fs::write(&path, "def f(x):\n    y = 1\n").unwrap();

    let opts = opts_for_dir(&dir);
    let files = vec![path.to_string_lossy().into_owned()];
    let rows = process_files(&opts, &files).unwrap();

    let names: Vec<&str> = rows.iter().map(|r| r.record.name.as_str()).collect();
    assert_eq!(names, vec!["f", "x", "y"]);
    for row in &rows {
        assert!(row.file.ends_with("mod.py"));
    }
}

#[test]
fn test_unparseable_file_is_skipped_without_cleaning() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("good.py"), "a = 1\n").unwrap();
    fs::write(dir.path().join("bad.py"), "def broken(:\n").unwrap();

    let opts = opts_for_dir(&dir);
    let mut files = discover_files(&opts).unwrap();
    files.sort();
    assert_eq!(files.len(), 2);

    // The broken file contributes zero records, not a failure.
    let rows = process_files(&opts, &files).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].record.name, "a");
}

#[test]
fn test_run_main_renders_json() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("cls.py"), "class A:\n    def m(self):\n        pass\n").unwrap();

    let rendered = run_main(&opts_for_dir(&dir)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

    let roles: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["class name", "method name", "method parameter"]);
    assert_eq!(value[0]["in_class"], false);
    assert_eq!(value[2]["in_function"], true);
}

#[test]
fn test_run_main_renders_csv_header() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("one.py"), "x = 1\n").unwrap();

    let opts = PyscopeOptions {
        format: OutputFormat::Csv,
        ..opts_for_dir(&dir)
    };
    let rendered = run_main(&opts).unwrap();
    let mut lines = rendered.lines();
    assert!(lines.next().unwrap().starts_with("file,name,role,"));
    let row = lines.next().unwrap();
    assert!(row.contains(",x,variable,"));
}
