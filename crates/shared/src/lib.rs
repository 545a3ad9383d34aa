//! # Shared
//! Components shared by the migration tooling: logging and certificate loading.
//!

#![warn(missing_docs)]

mod certificates;
mod logger;
#[cfg(feature = "test")]
pub mod test;

pub use certificates::{CertificateError, load_root_certificates};
pub use logger::{LoggerError, init_logger};
