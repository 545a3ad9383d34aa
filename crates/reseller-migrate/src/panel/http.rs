use core::time::Duration;
use std::io::Write;

use reqwest::{
    StatusCode,
    blocking::{Client, Response},
};
use serde::de::DeserializeOwned;
use shared::load_root_certificates;
use tracing::debug;
use url::Url;

use crate::{Credentials, PanelConfig, Session};

use super::{
    AccountEntry, Api2Response, BackupEntry, ControlPanel, LoginResponse, PanelError, QuotaInfo,
    UapiResponse, VhostVersion,
};

/// A control panel reached over its HTTP API.
///
/// The client keeps a cookie store, each login replaces the previous account's session cookie.
#[derive(Debug)]
pub struct HttpPanel {
    client: Client,
    base_url: Url,
    request_timeout: Duration,
    download_timeout: Option<Duration>,
}

impl HttpPanel {
    /// Create a panel client for `hostname` using the configured scheme and port.
    pub fn new(hostname: &str, config: &PanelConfig) -> Result<Self, PanelError> {
        let hostname = hostname.trim().trim_end_matches('/');
        let base_url = Url::parse(&format!("{}://{}:{}/", config.scheme, hostname, config.port))?;

        Self::with_base_url(base_url, config)
    }

    /// Create a panel client for a base URL, ignoring the configured scheme and port.
    ///
    /// API requests are limited by `request_timeout_seconds`. A download only has to connect
    /// within that time, streaming the body is limited by `download_timeout_seconds`.
    pub fn with_base_url(base_url: Url, config: &PanelConfig) -> Result<Self, PanelError> {
        let request_timeout = Duration::from_secs(config.request_timeout_seconds);
        let download_timeout = config.download_timeout_seconds.map(Duration::from_secs);

        // Timeouts are set per request, the client wide default would cap downloads.
        let mut builder = Client::builder()
            .cookie_store(true)
            .timeout(None::<Duration>)
            .connect_timeout(request_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certificates);

        if let Some(root_certificate_file) = &config.root_certificate_file {
            for certificate in load_root_certificates(root_certificate_file)? {
                let certificate = reqwest::Certificate::from_der(certificate.as_ref())
                    .map_err(PanelError::Client)?;
                builder = builder.add_root_certificate(certificate);
            }
        }

        let client = builder.build().map_err(PanelError::Client)?;

        Ok(Self {
            client,
            base_url,
            request_timeout,
            download_timeout,
        })
    }

    /// The panel's base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn get(
        &self,
        session: &Session,
        path: &str,
        query: &[(&str, &str)],
        timeout: Option<Duration>,
        action: &'static str,
    ) -> Result<Response, PanelError> {
        let url = session.endpoint(path)?;
        debug!("GET {path}");

        let mut request = self.client.get(url).query(query);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        request
            .send()
            .and_then(Response::error_for_status)
            .map_err(|e| PanelError::Request(e, action))
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
        query: &[(&str, &str)],
        action: &'static str,
    ) -> Result<T, PanelError> {
        self.get(session, path, query, Some(self.request_timeout), action)?
            .json()
            .map_err(|e| PanelError::Request(e, action))
    }
}

impl ControlPanel for HttpPanel {
    fn login(&self, credentials: &Credentials) -> Result<Session, PanelError> {
        let url = self.base_url.join("login/?login_only=1")?;

        let response = self
            .client
            .post(url)
            .timeout(self.request_timeout)
            .form(&[
                ("user", credentials.username.as_str()),
                ("pass", credentials.password.as_str()),
            ])
            .send()
            .map_err(|e| PanelError::Request(e, "send login"))?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Err(PanelError::LoginRejected(credentials.username.clone()));
        }

        let login: LoginResponse = response
            .error_for_status()
            .and_then(Response::json::<LoginResponse>)
            .map_err(|e| PanelError::Request(e, "read login response"))?;

        match login.security_token {
            Some(token) if login.status == 1 && !token.trim_matches('/').is_empty() => Ok(
                Session::new(&credentials.username, self.base_url.clone(), &token),
            ),
            _ => {
                debug!(
                    "Login for '{}' failed: {:?}",
                    credentials.username, login.message
                );
                Err(PanelError::LoginRejected(credentials.username.clone()))
            }
        }
    }

    fn list_accounts(&self, session: &Session) -> Result<Vec<AccountEntry>, PanelError> {
        let response: UapiResponse<Vec<AccountEntry>> = self.get_json(
            session,
            "execute/Resellers/list_accounts",
            &[],
            "list accounts",
        )?;

        response.into_data()
    }

    fn list_backups(&self, session: &Session) -> Result<Vec<BackupEntry>, PanelError> {
        let response: Api2Response<Vec<BackupEntry>> = self.get_json(
            session,
            "json-api/cpanel",
            &[
                ("cpanel_jsonapi_user", session.account()),
                ("cpanel_jsonapi_apiversion", "2"),
                ("cpanel_jsonapi_module", "Backups"),
                ("cpanel_jsonapi_func", "listfullbackups"),
            ],
            "list backups",
        )?;

        response.into_data()
    }

    fn trigger_backup(&self, session: &Session) -> Result<(), PanelError> {
        // No `email` parameter, the panel sends no completion notification.
        let response: UapiResponse<serde_json::Value> = self.get_json(
            session,
            "execute/Backup/fullbackup_to_homedir",
            &[],
            "trigger backup",
        )?;

        response.into_status()
    }

    fn download_backup(
        &self,
        session: &Session,
        file_name: &str,
        writer: &mut dyn Write,
    ) -> Result<u64, PanelError> {
        let mut response = self.get(
            session,
            "download",
            &[("file", file_name)],
            self.download_timeout,
            "request download",
        )?;

        let bytes = response
            .copy_to(writer)
            .map_err(|e| PanelError::Request(e, "stream download"))?;
        writer.flush().map_err(PanelError::Write)?;

        Ok(bytes)
    }

    fn php_versions(&self, session: &Session) -> Result<Vec<VhostVersion>, PanelError> {
        let response: UapiResponse<Vec<VhostVersion>> = self.get_json(
            session,
            "execute/LangPHP/php_get_vhost_versions",
            &[],
            "get PHP versions",
        )?;

        response.into_data()
    }

    fn quota_info(&self, session: &Session) -> Result<QuotaInfo, PanelError> {
        let response: UapiResponse<QuotaInfo> = self.get_json(
            session,
            "execute/Quota/get_quota_info",
            &[],
            "get quota info",
        )?;

        response.into_data()
    }
}
