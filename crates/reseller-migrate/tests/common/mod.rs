//! # common
//!

#![allow(dead_code)]

use core::{cell::RefCell, time::Duration};
use std::{
    collections::{HashMap, VecDeque},
    io::Write,
};

use reseller_migrate::{
    BackupConfig, Credentials, PanelConfig, Session,
    backup::Sleeper,
    panel::{
        AccountEntry, BackupEntry, BackupStatus, ControlPanel, HttpPanel, PanelError, QuotaInfo,
        VhostVersion,
    },
};
use url::Url;
use wiremock::{Mock, MockServer, Request};

pub const PASSWORD: &str = "hunter2";

/// An in memory panel. Each account's backup listings are returned in order, the last listing
/// repeats.
#[derive(Default)]
pub struct FakePanel {
    accounts: Vec<String>,
    rejected_logins: Vec<String>,
    listings: RefCell<HashMap<String, VecDeque<Vec<BackupEntry>>>>,
    downloads: HashMap<String, Vec<u8>>,
    vhosts: HashMap<String, Vec<VhostVersion>>,
    inodes: HashMap<String, u64>,
    calls: RefCell<Vec<String>>,
}

impl FakePanel {
    pub fn new(accounts: &[&str]) -> Self {
        Self {
            accounts: accounts.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    pub fn with_listings(self, account: &str, listings: Vec<Vec<BackupEntry>>) -> Self {
        self.listings
            .borrow_mut()
            .insert(account.to_string(), listings.into());
        self
    }

    pub fn with_download(mut self, file_name: &str, contents: &[u8]) -> Self {
        self.downloads
            .insert(file_name.to_string(), contents.to_vec());
        self
    }

    pub fn with_facts(mut self, account: &str, domain: &str, php: &str, inodes: u64) -> Self {
        self.vhosts.insert(
            account.to_string(),
            vec![VhostVersion {
                vhost: domain.to_string(),
                version: php.to_string(),
            }],
        );
        self.inodes.insert(account.to_string(), inodes);
        self
    }

    /// An account with a complete backup after one in progress check.
    pub fn with_account(self, account: &str) -> Self {
        let file_name = artifact_name(account);
        self.with_listings(
            account,
            vec![
                vec![],
                vec![in_progress(&file_name, 100)],
                vec![complete(&file_name, 100)],
            ],
        )
        .with_download(&file_name, account.as_bytes())
        .with_facts(account, &format!("{account}.example.com"), "ea-php81", 42)
    }

    pub fn reject_login(mut self, account: &str) -> Self {
        self.rejected_logins.push(account.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: &str, session: &Session) {
        self.calls
            .borrow_mut()
            .push(format!("{call}:{}", session.account()));
    }
}

impl ControlPanel for FakePanel {
    fn login(&self, credentials: &Credentials) -> Result<Session, PanelError> {
        self.calls
            .borrow_mut()
            .push(format!("login:{}", credentials.username));

        if credentials.password != PASSWORD || self.rejected_logins.contains(&credentials.username)
        {
            return Err(PanelError::LoginRejected(credentials.username.clone()));
        }

        let base_url = Url::parse("http://panel.test:2082/").unwrap();
        let token = format!("/cpsess_{}", credentials.username);
        Ok(Session::new(&credentials.username, base_url, &token))
    }

    fn list_accounts(&self, session: &Session) -> Result<Vec<AccountEntry>, PanelError> {
        self.record("list_accounts", session);

        Ok(self
            .accounts
            .iter()
            .map(|user| AccountEntry {
                user: user.clone(),
                domain: None,
            })
            .collect())
    }

    fn list_backups(&self, session: &Session) -> Result<Vec<BackupEntry>, PanelError> {
        self.record("list_backups", session);

        let mut listings = self.listings.borrow_mut();
        let Some(queue) = listings.get_mut(session.account()) else {
            return Ok(Vec::new());
        };

        if queue.len() > 1 {
            Ok(queue.pop_front().unwrap_or_default())
        } else {
            Ok(queue.front().cloned().unwrap_or_default())
        }
    }

    fn trigger_backup(&self, session: &Session) -> Result<(), PanelError> {
        self.record("trigger_backup", session);
        Ok(())
    }

    fn download_backup(
        &self,
        session: &Session,
        file_name: &str,
        writer: &mut dyn Write,
    ) -> Result<u64, PanelError> {
        self.record("download_backup", session);

        let contents = self
            .downloads
            .get(file_name)
            .ok_or_else(|| PanelError::Api(format!("No such file {file_name}")))?;
        writer.write_all(contents).map_err(PanelError::Write)?;

        Ok(u64::try_from(contents.len()).unwrap())
    }

    fn php_versions(&self, session: &Session) -> Result<Vec<VhostVersion>, PanelError> {
        self.record("php_versions", session);
        Ok(self
            .vhosts
            .get(session.account())
            .cloned()
            .unwrap_or_default())
    }

    fn quota_info(&self, session: &Session) -> Result<QuotaInfo, PanelError> {
        self.record("quota_info", session);
        Ok(QuotaInfo {
            inodes_used: self.inodes.get(session.account()).copied().unwrap_or(0),
        })
    }
}

/// Records sleeps instead of sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    pub sleeps: Vec<Duration>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
    }
}

pub fn artifact_name(account: &str) -> String {
    format!("backup-1.1.2024_00-00-00_{account}.tar.gz")
}

pub fn complete(file_name: &str, time: i64) -> BackupEntry {
    BackupEntry {
        file: file_name.to_string(),
        status: BackupStatus::Complete,
        time: Some(time),
    }
}

pub fn in_progress(file_name: &str, time: i64) -> BackupEntry {
    BackupEntry {
        file: file_name.to_string(),
        status: BackupStatus::InProgress,
        time: Some(time),
    }
}

pub fn credentials(username: &str) -> Credentials {
    Credentials {
        username: username.to_string(),
        password: PASSWORD.to_string(),
    }
}

pub fn session(account: &str) -> Session {
    let base_url = Url::parse("http://panel.test:2082/").unwrap();
    Session::new(account, base_url, &format!("/cpsess_{account}"))
}

pub fn backup_config() -> BackupConfig {
    BackupConfig {
        poll_interval_seconds: 4,
        max_poll_attempts: 5,
        ..BackupConfig::default()
    }
}

/// A wiremock server driven from its own runtime so the blocking client can be used from the
/// test thread.
pub struct MockPanel {
    pub server: MockServer,
    runtime: tokio::runtime::Runtime,
}

impl MockPanel {
    pub fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let server = runtime.block_on(MockServer::start());

        Self { server, runtime }
    }

    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    pub fn received_requests(&self) -> Vec<Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }

    pub fn base_url(&self) -> Url {
        Url::parse(&self.server.uri()).unwrap()
    }

    pub fn panel(&self) -> HttpPanel {
        self.panel_with(&PanelConfig::default())
    }

    pub fn panel_with(&self, config: &PanelConfig) -> HttpPanel {
        HttpPanel::with_base_url(self.base_url(), config).unwrap()
    }

    pub fn session(&self, account: &str, token: &str) -> Session {
        Session::new(account, self.base_url(), token)
    }
}
