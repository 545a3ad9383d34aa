use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    AccountReport, BackupConfig, Context, Credentials, MigrationReport, WorkingDirectory,
    backup::{BackupError, BackupJob, JobEnvironment, Sleeper},
    collect_facts,
    panel::{ControlPanel, PanelError},
};

/// A run over every account owned by a reseller.
pub struct Migration<'a> {
    panel: &'a dyn ControlPanel,
    config: &'a BackupConfig,
    working_directory: &'a WorkingDirectory,
    ticket_id: &'a str,
}

impl<'a> Migration<'a> {
    /// Create a migration for a ticket.
    pub fn new(
        panel: &'a dyn ControlPanel,
        config: &'a BackupConfig,
        working_directory: &'a WorkingDirectory,
        ticket_id: &'a str,
    ) -> Self {
        Self {
            panel,
            config,
            working_directory,
            ticket_id,
        }
    }

    /// Back up every account of the reseller, one account at a time in listing order.
    ///
    /// An account that fails is recorded in the report and the run continues, except when a
    /// backup belongs to the wrong account.
    pub fn run(
        &self,
        credentials: &Credentials,
        sleeper: &mut dyn Sleeper,
    ) -> Result<MigrationReport, MigrationError> {
        let mut context = Context::for_ticket(self.ticket_id);

        let accounts = {
            context.current_context = "Reseller Login";

            let session = self.panel.login(credentials).map_err(|e| {
                MigrationError::AuthenticationFailure(credentials.username.clone(), e)
            })?;
            info!("{context}Logged in as '{}'", credentials.username);

            context.current_context = "List Accounts";
            self.panel
                .list_accounts(&session)
                .map_err(MigrationError::ListAccounts)?
        };
        info!("{context}Found {} accounts", accounts.len());

        let mut reports = Vec::with_capacity(accounts.len());
        for account in &accounts {
            context.account = Some(account.user.clone());

            let report = self.migrate_account(&mut context, credentials, &account.user, sleeper)?;
            reports.push(report);
        }

        Ok(MigrationReport {
            ticket_id: self.ticket_id.to_string(),
            reseller: credentials.username.clone(),
            working_directory: self.working_directory.path().to_path_buf(),
            completed_at: Utc::now(),
            accounts: reports,
        })
    }

    fn migrate_account(
        &self,
        context: &mut Context,
        credentials: &Credentials,
        user: &str,
        sleeper: &mut dyn Sleeper,
    ) -> Result<AccountReport, MigrationError> {
        context.current_context = "Account Login";
        info!("{context}Logging into {user}'s cPanel account");

        let session = match self.panel.login(&credentials.for_account(user)) {
            Ok(session) => session,
            Err(error) => {
                warn!("{context}Could not log in: {error}");
                return Ok(AccountReport::Failed {
                    user: user.to_string(),
                    reason: format!("Could not log in: {error}"),
                    artifact: None,
                });
            }
        };

        let environment = JobEnvironment {
            panel: self.panel,
            session: &session,
            config: self.config,
            working_directory: self.working_directory,
        };

        let artifact = match BackupJob::new(user).run(context, &environment, sleeper) {
            Ok(artifact) => artifact,
            Err(BackupError::ArtifactNamingMismatch { file_name, account }) => {
                error!("{context}Backup '{file_name}' does not belong to '{account}'");
                return Err(MigrationError::ArtifactNamingMismatch { file_name, account });
            }
            Err(error) => {
                warn!("{context}Backup failed: {error}");
                return Ok(AccountReport::Failed {
                    user: user.to_string(),
                    reason: format!("Backup failed: {error}"),
                    artifact: None,
                });
            }
        };

        match collect_facts(context, self.panel, &session) {
            Ok(facts) => Ok(AccountReport::Migrated { facts, artifact }),
            Err(error) => {
                warn!("{context}Could not collect facts: {error}");
                Ok(AccountReport::Failed {
                    user: user.to_string(),
                    reason: format!("Could not collect facts: {error}"),
                    artifact: Some(artifact),
                })
            }
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Could not log in as reseller '{0}': {1}")]
    AuthenticationFailure(String, #[source] PanelError),

    #[error("Could not list the reseller's accounts: {0}")]
    ListAccounts(#[source] PanelError),

    #[error("Newest backup '{file_name}' does not belong to '{account}'")]
    ArtifactNamingMismatch { file_name: String, account: String },
}
