use core::fmt;

use url::Url;

/// A username and password for a panel login.
#[derive(Clone)]
pub struct Credentials {
    /// The account to log in as.
    pub username: String,

    /// The account's password.
    pub password: String,
}

impl Credentials {
    /// The same password for a different account.
    ///
    /// Resold accounts share the reseller's password in the environments this tool targets.
    pub fn for_account(&self, username: &str) -> Self {
        Self {
            username: username.to_string(),
            password: self.password.clone(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An authenticated login scoped to a single account.
///
/// The panel's session cookie lives in the HTTP client, the security token is part of every
/// authenticated path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    account: String,
    base_url: Url,
    security_token: String,
}

impl Session {
    /// Creates a session from a login response's security token, e.g. `/cpsess0123456789`.
    pub fn new(account: &str, base_url: Url, security_token: &str) -> Self {
        Self {
            account: account.to_string(),
            base_url,
            security_token: security_token.trim_matches('/').to_string(),
        }
    }

    /// The account this session is logged in as.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// The panel's base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The security token without slashes.
    pub fn security_token(&self) -> &str {
        &self.security_token
    }

    /// The URL of `path` under this session's security token.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(&format!(
            "{}/{}",
            self.security_token,
            path.trim_start_matches('/')
        ))
    }
}
