//! Typed bodies of the panel's JSON responses.
//!

use core::fmt;

use serde::{Deserialize, Deserializer, de};

use super::PanelError;

/// Response to `POST /login/?login_only=1`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    /// `1` when the login succeeded.
    #[serde(default)]
    pub status: i64,

    /// The session's security token, e.g. `/cpsess0123456789`.
    #[serde(default)]
    pub security_token: Option<String>,

    /// Why the login failed, e.g. `invalid_login`.
    #[serde(default)]
    pub message: Option<String>,
}

/// The envelope of every `execute/<Module>/<function>` response.
#[derive(Debug, Deserialize)]
pub struct UapiResponse<T> {
    /// `1` on success, `0` on failure. Absent on some proxied responses.
    #[serde(default)]
    pub status: Option<i64>,

    /// The function's result.
    pub data: Option<T>,

    /// Error messages when `status` is `0`.
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

impl<T> UapiResponse<T> {
    /// The response data, or the errors the panel reported.
    pub fn into_data(self) -> Result<T, PanelError> {
        if self.status == Some(0) {
            let errors = self.errors.unwrap_or_default();
            return Err(PanelError::Api(errors.join("; ")));
        }

        self.data
            .ok_or_else(|| PanelError::Api("Response contained no data".to_string()))
    }

    /// Checks the panel reported no errors, ignoring any data.
    pub fn into_status(self) -> Result<(), PanelError> {
        if self.status == Some(0) {
            let errors = self.errors.unwrap_or_default();
            return Err(PanelError::Api(errors.join("; ")));
        }

        Ok(())
    }
}

/// The envelope of a `json-api/cpanel` API2 response.
#[derive(Debug, Deserialize)]
pub struct Api2Response<T> {
    /// The wrapped result.
    pub cpanelresult: Api2Result<T>,
}

/// The result inside an API2 envelope.
#[derive(Debug, Deserialize)]
pub struct Api2Result<T> {
    /// The function's result.
    pub data: Option<T>,

    /// Set when the call failed.
    #[serde(default)]
    pub error: Option<String>,
}

impl<T: Default> Api2Response<T> {
    /// The response data, or the error the panel reported. Missing data is empty.
    pub fn into_data(self) -> Result<T, PanelError> {
        if let Some(error) = self.cpanelresult.error {
            return Err(PanelError::Api(error));
        }

        Ok(self.cpanelresult.data.unwrap_or_default())
    }
}

/// An account owned by the reseller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountEntry {
    /// The account's username.
    pub user: String,

    /// The account's main domain.
    #[serde(default)]
    pub domain: Option<String>,
}

/// The generation state of a listed backup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum BackupStatus {
    /// Still being written.
    InProgress,

    /// Ready to download.
    #[default]
    Complete,

    /// A status this tool does not know about.
    Other(String),
}

impl BackupStatus {
    /// If the backup is still being written.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl From<String> for BackupStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "inprogress" | "in_progress" => Self::InProgress,
            "complete" => Self::Complete,
            _ => Self::Other(value),
        }
    }
}

/// A full backup file in the account's home directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackupEntry {
    /// The file name, e.g. `backup-1.1.2024_00-00-00_bob.tar.gz`.
    pub file: String,

    /// The generation state.
    #[serde(default)]
    pub status: BackupStatus,

    /// When generation started, seconds since the epoch.
    #[serde(default, deserialize_with = "lenient_option_i64")]
    pub time: Option<i64>,
}

/// A virtual host and the PHP version serving it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VhostVersion {
    /// The virtual host's domain.
    pub vhost: String,

    /// The PHP version, e.g. `ea-php74`.
    pub version: String,
}

/// Disk quota usage of an account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuotaInfo {
    /// The number of inodes the account uses.
    #[serde(deserialize_with = "lenient_u64")]
    pub inodes_used: u64,
}

/// The panel serialises some numbers as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<N> {
    Number(N),
    Text(String),
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match Lenient::<u64>::deserialize(deserializer)? {
        Lenient::Number(value) => Ok(value),
        Lenient::Text(text) => parse_text(&text),
    }
}

fn lenient_option_i64<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<i64>, D::Error> {
    match Option::<Lenient<i64>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Lenient::Number(value)) => Ok(Some(value)),
        Some(Lenient::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Lenient::Text(text)) => parse_text(&text).map(Some),
    }
}

fn parse_text<N, E>(text: &str) -> Result<N, E>
where
    N: core::str::FromStr,
    N::Err: fmt::Display,
    E: de::Error,
{
    text.trim()
        .parse()
        .map_err(|error| E::custom(format!("invalid number '{text}': {error}")))
}
