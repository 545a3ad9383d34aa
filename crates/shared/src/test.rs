//! # test
//! Helpers for tests: a stdout logger and generated certificates.
//!

use std::{fs, io, path::Path};

use tracing::{Level, subscriber::set_global_default};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, registry};

/// Create and set a global stdout logger at TRACE.
///
/// Tests in the same binary share the first logger installed, later calls only return a guard.
pub fn init_test_logger() -> WorkerGuard {
    let filter = tracing_subscriber::filter::Targets::new().with_default(Level::TRACE);

    // Std layer
    let (std_guard, std_layer) = {
        let (writer, guard) = tracing_appender::non_blocking(io::stdout());

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(true)
            .with_target(false);

        (guard, layer)
    };

    // Create registry
    let registry = registry().with(std_layer).with(filter);

    // Set global subscriber
    let _ = set_global_default(registry);

    std_guard
}

/// Generate a self signed certificate for `localhost` and write it as PEM to `path`.
pub fn write_self_signed_pem(path: &Path) {
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    fs::write(path, certified.cert.pem()).unwrap();
}
