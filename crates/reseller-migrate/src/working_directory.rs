use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use thiserror::Error;

/// The per ticket directory holding every downloaded backup of a run.
///
/// Files already in the directory are never removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDirectory {
    path: PathBuf,
}

impl WorkingDirectory {
    /// `~/automigrations`, if the home directory is known.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join("automigrations"))
    }

    /// Use `<root>/<ticket_id>`, creating it if it does not exist.
    pub fn create(root: &Path, ticket_id: &str) -> Result<Self, WorkingDirectoryError> {
        if !is_plain_file_name(ticket_id) {
            return Err(WorkingDirectoryError::InvalidTicket(ticket_id.to_string()));
        }

        let path = root.join(ticket_id);

        // Check if the directory exists
        let directory_metadata = match fs::metadata(&path) {
            Ok(metadata) => Some(metadata),
            Err(error) => {
                if error.kind() == ErrorKind::NotFound {
                    None
                } else {
                    return Err(WorkingDirectoryError::Metadata(error, path));
                }
            }
        };

        match directory_metadata {
            // If it exists, ensure it is a directory
            Some(metadata) => {
                if !metadata.is_dir() {
                    return Err(WorkingDirectoryError::NotDirectory(path));
                }
            }

            // If it does not exist, create it.
            None => {
                fs::create_dir_all(&path)
                    .map_err(|e| WorkingDirectoryError::Create(e, path.clone()))?;
            }
        }

        Ok(Self { path })
    }

    /// The directory's path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where a downloaded file named `file_name` is saved.
    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }
}

/// If `name` is a single path component that stays inside its parent directory.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum WorkingDirectoryError {
    #[error("Ticket '{0}' is not usable as a directory name")]
    InvalidTicket(String),

    #[error("Could not check metadata for {1:?}: {0}")]
    Metadata(#[source] io::Error, PathBuf),

    #[error("{0:?} exists and is not a directory")]
    NotDirectory(PathBuf),

    #[error("Could not create directory {1:?}: {0}")]
    Create(#[source] io::Error, PathBuf),
}
