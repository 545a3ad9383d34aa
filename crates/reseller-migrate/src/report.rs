use std::{
    fs::OpenOptions,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::{AccountFacts, backup::Artifact};

/// The outcome of migrating one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AccountReport {
    /// The backup was saved and the facts collected.
    Migrated {
        /// The account's facts.
        facts: AccountFacts,
        /// The saved backup.
        artifact: Artifact,
    },

    /// The account could not be fully migrated, the run moved on to the next account.
    Failed {
        /// The account's username.
        user: String,
        /// What went wrong.
        reason: String,
        /// The backup, if it was saved before the failure.
        artifact: Option<Artifact>,
    },
}

impl AccountReport {
    /// The account's username.
    pub fn user(&self) -> &str {
        match self {
            Self::Migrated { facts, .. } => &facts.user,
            Self::Failed { user, .. } => user,
        }
    }

    /// The saved backup, if any.
    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            Self::Migrated { artifact, .. } => Some(artifact),
            Self::Failed { artifact, .. } => artifact.as_ref(),
        }
    }
}

/// Everything a run produced, in account listing order.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    /// The ticket the run was for.
    pub ticket_id: String,

    /// The reseller whose accounts were migrated.
    pub reseller: String,

    /// Where the backups were saved.
    pub working_directory: PathBuf,

    /// When the last account finished.
    pub completed_at: DateTime<Utc>,

    /// One report per listed account.
    pub accounts: Vec<AccountReport>,
}

impl MigrationReport {
    /// The reseller's own backups.
    pub fn master_backups(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts()
            .filter(|artifact| artifact.account == self.reseller)
    }

    /// The backups of every resold account.
    pub fn account_backups(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts()
            .filter(|artifact| artifact.account != self.reseller)
    }

    /// Every saved backup.
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.accounts.iter().filter_map(AccountReport::artifact)
    }

    /// The accounts that did not fully migrate.
    pub fn failures(&self) -> impl Iterator<Item = &AccountReport> {
        self.accounts
            .iter()
            .filter(|account| matches!(account, AccountReport::Failed { .. }))
    }

    /// Print the facts of each account followed by the paths to import from.
    pub fn print<W: Write>(&self, out: &mut W) -> Result<(), ReportError> {
        for account in &self.accounts {
            match account {
                AccountReport::Migrated { facts, .. } => {
                    writeln!(out, "{}", serde_json::to_string(facts)?)?;
                }
                AccountReport::Failed { user, reason, .. } => {
                    writeln!(out, "{user} FAILED: {reason}")?;
                }
            }
        }

        writeln!(out, "##########################################")?;
        writeln!(out, "# path to the master account backup      #")?;
        for artifact in self.master_backups() {
            writeln!(out, "{}", artifact.path.display())?;
        }

        writeln!(out, "##########################################")?;
        writeln!(out, "# path to each backup file for importing #")?;
        for artifact in self.account_backups() {
            writeln!(out, "{}", artifact.path.display())?;
        }

        out.flush()?;

        Ok(())
    }

    /// Save the report as JSON into the working directory, never replacing an existing file.
    pub fn save(&self) -> Result<PathBuf, ReportError> {
        let file_name = format!(
            "migration-{}.json",
            self.completed_at.format("%Y-%m-%d_%H-%M-%S")
        );
        let path = self.working_directory.join(file_name);

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;

        Ok(path)
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write report: {0}")]
    Write(#[from] io::Error),
}
