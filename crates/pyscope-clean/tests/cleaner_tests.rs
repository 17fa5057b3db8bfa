use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use pyscope_clean::{copy_into, SourceCleaner, StagingGuard, CLEANED_FILES_DIR};
use pyscope_error::ErrorKind;

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_fix_indentation_expands_tabs() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(tmp.path(), "tabs.py", "def f():\n\treturn 1\n");

    SourceCleaner::new().fix_indentation(&path).unwrap();

    let fixed = fs::read_to_string(&path).unwrap();
    assert_eq!(fixed, "def f():\n    return 1\n");
}

#[test]
fn test_fix_indentation_respects_indent_size() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(tmp.path(), "tabs.py", "\tx = 1\n");

    SourceCleaner::new()
        .with_indent_size(2)
        .fix_indentation(&path)
        .unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "  x = 1\n");
}

#[test]
fn test_strip_non_ascii() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(tmp.path(), "accents.py", "# café naïve\nx = 1\n");

    SourceCleaner::new().strip_non_ascii(&path).unwrap();

    let stripped = fs::read_to_string(&path).unwrap();
    assert_eq!(stripped, "# caf nave\nx = 1\n");
}

#[test]
fn test_read_lossy_drops_invalid_utf8() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("latin1.py");
    fs::write(&path, b"x = 1  # caf\xe9\n").unwrap();

    let content = SourceCleaner::new().read_lossy(&path).unwrap();
    assert!(content.starts_with("x = 1"));
}

#[test]
fn test_copy_into_appends_counter_on_collision() {
    let tmp = TempDir::new().unwrap();
    let source = write_file(tmp.path(), "mod.py", "x = 1\n");
    let dest_dir = tmp.path().join("staged");

    let first = copy_into(&source, &dest_dir).unwrap();
    let second = copy_into(&source, &dest_dir).unwrap();
    let third = copy_into(&source, &dest_dir).unwrap();

    assert_eq!(first.file_name().unwrap(), "mod.py");
    assert_eq!(second.file_name().unwrap(), "mod(1).py");
    assert_eq!(third.file_name().unwrap(), "mod(2).py");
    assert!(first.is_file() && second.is_file() && third.is_file());
}

#[test]
fn test_copy_into_missing_source() {
    let tmp = TempDir::new().unwrap();
    let err = copy_into(&tmp.path().join("ghost.py"), &tmp.path().join("staged")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
}

#[test]
fn test_normalize_stages_parseable_file() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(tmp.path(), "ok.py", "def f():\n\treturn 42  # vérifié\n");
    let staging_dir = tmp.path().join(CLEANED_FILES_DIR);

    let staged = SourceCleaner::new().normalize(&path, &staging_dir).unwrap();

    assert!(staged.starts_with(&staging_dir));
    let content = fs::read_to_string(&staged).unwrap();
    assert_eq!(content, "def f():\n    return 42  # vrifi\n");
}

#[test]
fn test_normalize_missing_file() {
    let tmp = TempDir::new().unwrap();
    let err = SourceCleaner::new()
        .normalize(&tmp.path().join("ghost.py"), &tmp.path().join("staged"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
}

#[test]
fn test_normalize_definitive_failure_for_garbage() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(tmp.path(), "broken.py", "def f(((:\n");
    let staging_dir = tmp.path().join(CLEANED_FILES_DIR);

    // Direct parse fails and the 2to3 fallback cannot rescue unparseable
    // source either (or the tool is absent); both outcomes are definitive.
    let result = SourceCleaner::new().normalize(&path, &staging_dir);
    assert!(result.is_err());
}

#[test]
fn test_staging_guard_removes_directories_on_drop() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(tmp.path(), "ok.py", "x = 1\n");

    {
        let guard = StagingGuard::new(tmp.path());
        let staged = SourceCleaner::new()
            .normalize(&path, guard.staging_dir())
            .unwrap();
        assert!(staged.is_file());
    }

    assert!(!tmp.path().join(CLEANED_FILES_DIR).exists());
}

#[test]
fn test_staging_guard_keep() {
    let tmp = TempDir::new().unwrap();
    let path = write_file(tmp.path(), "ok.py", "x = 1\n");

    {
        let guard = StagingGuard::new(tmp.path()).keep();
        SourceCleaner::new()
            .normalize(&path, guard.staging_dir())
            .unwrap();
    }

    assert!(tmp.path().join(CLEANED_FILES_DIR).exists());
}
