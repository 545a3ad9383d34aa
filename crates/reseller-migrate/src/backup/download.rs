use std::io::BufWriter;

use tempfile::NamedTempFile;
use tracing::info;

use crate::Context;

use super::{Artifact, BackupError, JobEnvironment};

/// Stream `file_name` into the working directory.
///
/// Bytes go to a temporary file beside the target, which replaces the target only once the
/// download is complete. A failed download leaves any earlier copy of the artifact in place.
pub(super) fn download_artifact(
    context: &Context,
    environment: &JobEnvironment<'_>,
    account: &str,
    file_name: &str,
) -> Result<Artifact, BackupError> {
    let path = environment.working_directory.file_path(file_name);
    info!("{context}Downloading backup to {path:?}");

    // Removed on drop unless persisted
    let partial = NamedTempFile::new_in(environment.working_directory.path())
        .map_err(|e| BackupError::Io(e, "create partial backup file"))?;
    let mut writer = BufWriter::new(partial);

    let bytes = environment
        .panel
        .download_backup(environment.session, file_name, &mut writer)?;

    let partial = writer
        .into_inner()
        .map_err(|e| BackupError::Io(e.into_error(), "flush backup file"))?;
    partial
        .persist(&path)
        .map_err(|e| BackupError::Io(e.error, "save backup file"))?;

    info!("{context}Downloaded {bytes} bytes");

    Ok(Artifact {
        account: account.to_string(),
        file_name: file_name.to_string(),
        path,
        bytes,
    })
}
