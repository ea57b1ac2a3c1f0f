//! Tests for the real FileSystem implementation

use std::fs;

use tempfile::TempDir;

use branch_ledger::infrastructure::traits::{FileSystem, RealFileSystem};

#[test]
fn given_existing_file_when_write_atomic_then_content_replaced() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state.toml");
    fs::write(&path, "old").unwrap();

    // Act
    RealFileSystem.write_atomic(&path, "new").unwrap();

    // Assert
    assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    // no temp files left behind
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn given_missing_directory_when_write_atomic_then_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing").join("state.toml");

    assert!(RealFileSystem.write_atomic(&path, "x").is_err());
}

#[test]
fn given_nested_path_when_ensure_parent_then_directories_created() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("a").join("b").join("state.toml");

    // Act
    RealFileSystem.ensure_parent(&path).unwrap();

    // Assert
    assert!(temp.path().join("a").join("b").is_dir());
    assert!(!path.exists());
}
