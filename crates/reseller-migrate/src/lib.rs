//! # reseller-migrate
//! Generates, downloads and catalogues a full backup of every account owned by a cPanel
//! reseller.
//!

pub mod backup;
mod config;
mod context;
mod facts;
mod migration;
pub mod panel;
mod prompt;
mod report;
mod session;
mod working_directory;

pub use config::{BackupConfig, Config, LoadConfigError, OutputConfig, PanelConfig};
pub use context::Context;
pub use facts::{AccountFacts, FactsError, collect_facts};
pub use migration::{Migration, MigrationError};
pub use prompt::{OperatorInput, prompt_line};
pub use report::{AccountReport, MigrationReport, ReportError};
pub use session::{Credentials, Session};
pub use working_directory::{WorkingDirectory, WorkingDirectoryError, is_plain_file_name};
