//! # reseller-migrate
//! Backs up every account of a reseller into the ticket's working directory.
//!

use std::{fs, io, path::PathBuf, process::ExitCode};

use reseller_migrate::{
    Config, Migration, OperatorInput, WorkingDirectory, backup::ThreadSleeper, panel::HttpPanel,
};
use shared::init_logger;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    // Initialize config if args include 'init'.
    if std::env::args().any(|arg| arg.eq("init")) {
        return write_default_config();
    }

    // Load config
    let (config, found_config, load_error) =
        match Config::load_or_default(PathBuf::from("./config.toml")) {
            Ok((config, found_config)) => (config, found_config, None),
            Err(error) => (Config::default(), false, Some(error)),
        };

    let _logger = match init_logger(&config.output.log_directory) {
        Ok(logger) => logger,
        Err(error) => {
            eprintln!("Could not initialize logger: {error}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(error) = load_error {
        error!("Could not load config: {error}");
        return ExitCode::FAILURE;
    }

    let input = match OperatorInput::prompt() {
        Ok(input) => input,
        Err(error) => {
            error!("Could not read operator input: {error}");
            return ExitCode::FAILURE;
        }
    };

    // Nothing is logged while prompting, log lines would interleave with the prompts.
    if !found_config {
        info!("No config.toml found, using defaults");
    }

    // Create working directory
    let working_root = match config
        .output
        .working_root
        .clone()
        .or_else(WorkingDirectory::default_root)
    {
        Some(root) => root,
        None => {
            error!("Could not find the home directory, set `output.working_root` in config.toml");
            return ExitCode::FAILURE;
        }
    };
    let working_directory = match WorkingDirectory::create(&working_root, &input.ticket_id) {
        Ok(directory) => directory,
        Err(error) => {
            error!("Could not create working directory: {error}");
            return ExitCode::FAILURE;
        }
    };

    let panel = match HttpPanel::new(&input.hostname, &config.panel) {
        Ok(panel) => panel,
        Err(error) => {
            error!("Could not create panel client: {error}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Generating server backups into {:?}",
        working_directory.path()
    );

    let migration = Migration::new(
        &panel,
        &config.backup,
        &working_directory,
        &input.ticket_id,
    );
    let report = match migration.run(&input.credentials, &mut ThreadSleeper) {
        Ok(report) => report,
        Err(error) => {
            error!("Migration aborted: {error}");
            return ExitCode::FAILURE;
        }
    };

    let failures = report.failures().count();
    if failures > 0 {
        warn!("{failures} accounts were not fully migrated");
    }

    if let Err(error) = report.print(&mut io::stdout().lock()) {
        warn!("Could not print report: {error}");
    }

    match report.save() {
        Ok(path) => info!("Saved migration summary to {path:?}"),
        Err(error) => warn!("Could not save migration summary: {error}"),
    }

    ExitCode::SUCCESS
}

fn write_default_config() -> ExitCode {
    let contents = match toml::to_string_pretty(&Config::default()) {
        Ok(contents) => contents,
        Err(error) => {
            eprintln!("Could not serialize config: {error}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = fs::write("config.toml", contents) {
        eprintln!("Could not write config.toml: {error}");
        return ExitCode::FAILURE;
    }

    println!("Wrote config.toml");
    ExitCode::SUCCESS
}
