//! Tests for creating the per ticket working directory
//!

#![allow(missing_docs)]

use std::fs;

use reseller_migrate::{WorkingDirectory, WorkingDirectoryError, is_plain_file_name};

#[test]
fn creates_missing_directories() {
    let root = tempfile::tempdir().unwrap();
    let nested = root.path().join("automigrations");

    let working_directory = WorkingDirectory::create(&nested, "100200").unwrap();

    assert_eq!(working_directory.path(), nested.join("100200"));
    assert!(working_directory.path().is_dir());
    assert_eq!(
        working_directory.file_path("backup.tar.gz"),
        nested.join("100200").join("backup.tar.gz")
    );
}

#[test]
fn existing_directory_is_kept() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("100200")).unwrap();
    fs::write(root.path().join("100200").join("notes.txt"), "keep").unwrap();

    let working_directory = WorkingDirectory::create(root.path(), "100200").unwrap();

    assert_eq!(
        fs::read_to_string(working_directory.file_path("notes.txt")).unwrap(),
        "keep"
    );
}

#[test]
fn file_in_the_way() {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join("100200"), "not a directory").unwrap();

    let result = WorkingDirectory::create(root.path(), "100200");

    assert!(matches!(result, Err(WorkingDirectoryError::NotDirectory(_))));
}

#[test]
fn invalid_tickets() {
    let root = tempfile::tempdir().unwrap();

    for ticket in ["", ".", "..", "../100200", "100/200"] {
        let result = WorkingDirectory::create(root.path(), ticket);
        assert!(
            matches!(result, Err(WorkingDirectoryError::InvalidTicket(_))),
            "{ticket:?} was accepted"
        );
    }

    assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
}

#[test]
fn plain_file_names() {
    assert!(is_plain_file_name("backup-1.1.2024_00-00-00_bob.tar.gz"));
    assert!(is_plain_file_name("..hidden"));
    assert!(!is_plain_file_name("backups/bob.tar.gz"));
    assert!(!is_plain_file_name("..\\bob.tar.gz"));
    assert!(!is_plain_file_name(".."));
}
