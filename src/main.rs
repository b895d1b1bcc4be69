//! Repowatch CLI entrypoint: refresh a repository's pull request cache and
//! print its health metrics.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use repowatch::{RepowatchConfig, RepowatchError};

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), RepowatchError> {
    let config = load_config()?;

    if config.migrate_db {
        return cli::migrations::run(&config);
    }

    let metrics = cli::report::run(&config).await?;
    cli::output::write_repository_summary(&metrics)
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`RepowatchError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<RepowatchConfig, RepowatchError> {
    RepowatchConfig::load().map_err(|error| RepowatchError::Configuration {
        message: error.to_string(),
    })
}
