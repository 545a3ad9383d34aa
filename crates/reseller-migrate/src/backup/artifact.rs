use std::path::PathBuf;

use serde::Serialize;

use crate::{is_plain_file_name, panel::BackupEntry};

use super::BackupError;

/// A backup file downloaded into the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// The account the backup belongs to.
    pub account: String,

    /// The file name as reported by the panel.
    pub file_name: String,

    /// Where the file was saved.
    pub path: PathBuf,

    /// The number of bytes downloaded.
    pub bytes: u64,
}

/// The most recently generated backup in a listing.
///
/// Entries are compared by generation time and later entries in the listing win ties. An entry
/// without a time is older than any entry with one.
pub fn newest_backup(entries: &[BackupEntry]) -> Option<&BackupEntry> {
    entries.iter().max_by_key(|entry| entry.time)
}

/// Checks a backup file name belongs to `account`.
pub fn validate_artifact_name(
    file_name: &str,
    account: &str,
    prefix: &str,
) -> Result<(), BackupError> {
    if !file_name.contains(prefix) || !file_name.contains(account) {
        return Err(BackupError::ArtifactNamingMismatch {
            file_name: file_name.to_string(),
            account: account.to_string(),
        });
    }

    if !is_plain_file_name(file_name) {
        return Err(BackupError::InvalidArtifactName(file_name.to_string()));
    }

    Ok(())
}
