//! The control panel the migration drives.
//!

use std::io::{self, Write};

use shared::CertificateError;
use thiserror::Error;

use crate::{Credentials, Session};

mod http;
mod response;

pub use http::HttpPanel;
pub use response::{
    AccountEntry, Api2Response, Api2Result, BackupEntry, BackupStatus, LoginResponse, QuotaInfo,
    UapiResponse, VhostVersion,
};

/// The operations the migration needs from a control panel.
///
/// Every call other than `login` is scoped to the account the session is logged in as.
pub trait ControlPanel {
    /// Log in and create a session for the credential's account.
    fn login(&self, credentials: &Credentials) -> Result<Session, PanelError>;

    /// List the accounts owned by the session's reseller.
    fn list_accounts(&self, session: &Session) -> Result<Vec<AccountEntry>, PanelError>;

    /// List the full backups in the account's home directory, oldest first.
    fn list_backups(&self, session: &Session) -> Result<Vec<BackupEntry>, PanelError>;

    /// Start generating a full backup. Generation continues on the server after this returns.
    fn trigger_backup(&self, session: &Session) -> Result<(), PanelError>;

    /// Stream a backup file into `writer`, returning the number of bytes written.
    fn download_backup(
        &self,
        session: &Session,
        file_name: &str,
        writer: &mut dyn Write,
    ) -> Result<u64, PanelError>;

    /// The PHP version of each of the account's virtual hosts.
    fn php_versions(&self, session: &Session) -> Result<Vec<VhostVersion>, PanelError>;

    /// The account's quota usage.
    fn quota_info(&self, session: &Session) -> Result<QuotaInfo, PanelError>;
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("Failed to build request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to load root certificates: {0}")]
    Certificates(#[from] CertificateError),

    #[error("Failed to {1}: {0}")]
    Request(#[source] reqwest::Error, &'static str),

    #[error("The panel rejected the login for '{0}'")]
    LoginRejected(String),

    #[error("The panel reported an error: {0}")]
    Api(String),

    #[error("Failed to write download: {0}")]
    Write(#[source] io::Error),
}
