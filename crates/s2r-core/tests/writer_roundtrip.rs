//! README writer: verbatim output, overwrite and failure modes.

use s2r_core::{
    DEFAULT_README_NAME, GeneratedDocument, WriteError, check_target, readme_exists, write_readme,
};
use tempfile::TempDir;

#[test]
fn test_written_file_matches_document_exactly() {
    let tmp = TempDir::new().unwrap();
    let text = "# Demo\n\n  indented\r\ntrailing spaces   \n\n\n🚀 no final newline";
    let doc = GeneratedDocument::new(text);

    let path = write_readme(&doc, tmp.path(), DEFAULT_README_NAME).unwrap();
    assert_eq!(path, tmp.path().join("README.md"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
}

#[test]
fn test_existing_readme_is_overwritten() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("README.md"), "old content that is longer").unwrap();
    assert!(readme_exists(tmp.path(), "README.md"));

    write_readme(&GeneratedDocument::new("new"), tmp.path(), "README.md").unwrap();
    assert_eq!(
        std::fs::read_to_string(tmp.path().join("README.md")).unwrap(),
        "new"
    );
}

#[test]
fn test_custom_filename() {
    let tmp = TempDir::new().unwrap();
    let path = write_readme(
        &GeneratedDocument::new("x"),
        tmp.path(),
        "EXAMPLE_README.md",
    )
    .unwrap();
    assert!(path.ends_with("EXAMPLE_README.md"));
    assert!(!readme_exists(tmp.path(), "README.md"));
}

#[test]
fn test_missing_directory_is_write_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("does-not-exist");
    let err = write_readme(&GeneratedDocument::new("x"), &missing, "README.md").unwrap_err();
    assert!(matches!(err, WriteError::MissingDirectory(_)));
    assert!(!missing.exists());
}

#[test]
fn test_path_like_filename_rejected() {
    let tmp = TempDir::new().unwrap();
    let err = write_readme(&GeneratedDocument::new("x"), tmp.path(), "../README.md").unwrap_err();
    assert!(matches!(err, WriteError::InvalidFilename(_)));
}

#[test]
fn test_check_target_creates_nothing() {
    let tmp = TempDir::new().unwrap();
    let path = check_target(tmp.path(), "README.md").unwrap();
    assert_eq!(path, tmp.path().join("README.md"));
    assert!(!path.exists());

    let missing = tmp.path().join("nope");
    assert!(matches!(
        check_target(&missing, "README.md"),
        Err(WriteError::MissingDirectory(_))
    ));
    assert!(matches!(
        check_target(tmp.path(), "docs/README.md"),
        Err(WriteError::InvalidFilename(_))
    ));
}
