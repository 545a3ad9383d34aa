//! Generating, polling and downloading one account's full backup.
//!

use core::time::Duration;
use std::io;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    BackupConfig, Context, Session, WorkingDirectory,
    panel::{ControlPanel, PanelError},
};

mod artifact;
mod download;
mod sleeper;

pub use artifact::{Artifact, newest_backup, validate_artifact_name};
pub use sleeper::{Sleeper, ThreadSleeper};

/// Everything a backup job reads from while running.
pub struct JobEnvironment<'a> {
    /// The panel to drive.
    pub panel: &'a dyn ControlPanel,

    /// A session logged in as the account being backed up.
    pub session: &'a Session,

    /// Polling and naming settings.
    pub config: &'a BackupConfig,

    /// Where the backup is saved.
    pub working_directory: &'a WorkingDirectory,
}

/// The stage a backup job is in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    /// Reading the backups that exist before generating a new one.
    Listing,

    /// Requesting a new backup.
    Triggering,

    /// Waiting for the newest backup to complete.
    Polling {
        /// The number of listings checked so far.
        attempts: u32,
    },

    /// Finding and validating the completed backup's file name.
    Resolving,

    /// Saving the backup into the working directory.
    Downloading {
        /// The backup file to download.
        file_name: String,
    },

    /// The backup has been saved.
    Done(Artifact),
}

/// The backup of a single account, driven one state at a time.
#[derive(Debug)]
pub struct BackupJob {
    account: String,
    baseline: Option<String>,
    state: JobState,
}

impl BackupJob {
    /// Create a job for `account`, starting in [`JobState::Listing`].
    pub fn new(account: &str) -> Self {
        Self {
            account: account.to_string(),
            baseline: None,
            state: JobState::Listing,
        }
    }

    /// The current state.
    pub fn state(&self) -> &JobState {
        &self.state
    }

    /// The newest backup that existed before generation was triggered.
    pub fn baseline(&self) -> Option<&str> {
        self.baseline.as_deref()
    }

    /// Step the job until the backup is saved.
    pub fn run(
        mut self,
        context: &mut Context,
        environment: &JobEnvironment<'_>,
        sleeper: &mut dyn Sleeper,
    ) -> Result<Artifact, BackupError> {
        loop {
            if let Some(artifact) = self.step(context, environment, sleeper)? {
                return Ok(artifact);
            }
        }
    }

    /// Advance to the next state, returning the artifact once the job is done.
    pub fn step(
        &mut self,
        context: &mut Context,
        environment: &JobEnvironment<'_>,
        sleeper: &mut dyn Sleeper,
    ) -> Result<Option<Artifact>, BackupError> {
        let next = match &self.state {
            JobState::Listing => {
                context.current_context = "List Backups";

                let entries = environment.panel.list_backups(environment.session)?;
                self.baseline = newest_backup(&entries).map(|entry| entry.file.clone());

                match &self.baseline {
                    Some(baseline) => info!("{context}Newest existing backup: {baseline}"),
                    None => info!("{context}No existing backups"),
                }

                JobState::Triggering
            }

            JobState::Triggering => {
                context.current_context = "Trigger Backup";

                environment.panel.trigger_backup(environment.session)?;
                info!("{context}Generating backup");

                JobState::Polling { attempts: 0 }
            }

            JobState::Polling { attempts } => {
                context.current_context = "Poll Backup";

                let attempts = attempts + 1;
                let max_attempts = environment.config.max_poll_attempts.max(1);

                // A backup missing from the listing has not been registered yet.
                let entries = environment.panel.list_backups(environment.session)?;
                let pending =
                    newest_backup(&entries).is_none_or(|entry| entry.status.is_in_progress());

                if !pending {
                    JobState::Resolving
                } else if attempts >= max_attempts {
                    return Err(BackupError::BackupTimeout {
                        account: self.account.clone(),
                        attempts,
                    });
                } else {
                    debug!("{context}Backup in progress ({attempts}/{max_attempts})");
                    sleeper.sleep(Duration::from_secs(
                        environment.config.poll_interval_seconds,
                    ));

                    JobState::Polling { attempts }
                }
            }

            JobState::Resolving => {
                context.current_context = "Resolve Backup";

                let entries = environment.panel.list_backups(environment.session)?;
                let newest = newest_backup(&entries).ok_or(BackupError::NoArtifact)?;

                validate_artifact_name(
                    &newest.file,
                    &self.account,
                    &environment.config.artifact_prefix,
                )?;

                if self.baseline.as_deref() == Some(newest.file.as_str()) {
                    warn!("{context}Newest backup is the one that existed before generating");
                }
                info!("{context}Backup complete: {}", newest.file);

                JobState::Downloading {
                    file_name: newest.file.clone(),
                }
            }

            JobState::Downloading { file_name } => {
                context.current_context = "Download Backup";

                let artifact = download::download_artifact(
                    context,
                    environment,
                    &self.account,
                    file_name,
                )?;

                JobState::Done(artifact)
            }

            JobState::Done(artifact) => return Ok(Some(artifact.clone())),
        };

        self.state = next;

        match &self.state {
            JobState::Done(artifact) => Ok(Some(artifact.clone())),
            _ => Ok(None),
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Backup for '{account}' was still in progress after {attempts} checks")]
    BackupTimeout { account: String, attempts: u32 },

    #[error("Newest backup '{file_name}' does not belong to '{account}'")]
    ArtifactNamingMismatch { file_name: String, account: String },

    #[error("Backup file name '{0}' is not a plain file name")]
    InvalidArtifactName(String),

    #[error("The panel listed no backups after generation completed")]
    NoArtifact,

    #[error("Panel request failed: {0}")]
    Panel(#[from] PanelError),

    #[error("Failed to {1}: {0}")]
    Io(#[source] io::Error, &'static str),
}
