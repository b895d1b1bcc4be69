//! Database migration operations.

use repowatch::persistence::{PersistenceError, migrate_database};
use repowatch::telemetry::StderrJsonlTelemetrySink;
use repowatch::{RepowatchConfig, RepowatchError};

/// Runs database migrations.
///
/// # Errors
///
/// Returns [`RepowatchError::Configuration`] if the database URL is missing
/// or blank, and [`RepowatchError::Persistence`] for connection or migration
/// failures.
pub fn run(config: &RepowatchConfig) -> Result<(), RepowatchError> {
    let database_url =
        config
            .database_url
            .as_deref()
            .ok_or_else(|| RepowatchError::Configuration {
                message: PersistenceError::MissingDatabaseUrl.to_string(),
            })?;

    let telemetry = StderrJsonlTelemetrySink;
    migrate_database(database_url, &telemetry)
        .map(drop)
        .map_err(map_persistence_error)
}

/// Blank URLs are a configuration problem; everything else is a runtime
/// persistence failure.
fn map_persistence_error(error: PersistenceError) -> RepowatchError {
    if matches!(error, PersistenceError::BlankDatabaseUrl) {
        RepowatchError::Configuration {
            message: error.to_string(),
        }
    } else {
        RepowatchError::Persistence(error)
    }
}

#[cfg(test)]
mod tests {
    use repowatch::persistence::PersistenceError;
    use repowatch::{RepowatchConfig, RepowatchError};
    use rstest::rstest;

    use super::{map_persistence_error, run};

    #[test]
    fn blank_url_maps_to_configuration_and_runtime_failures_stay_persistence() {
        assert!(matches!(
            map_persistence_error(PersistenceError::BlankDatabaseUrl),
            RepowatchError::Configuration { .. }
        ));
        assert!(matches!(
            map_persistence_error(PersistenceError::ConnectionFailed {
                message: "unable to open".to_owned()
            }),
            RepowatchError::Persistence(PersistenceError::ConnectionFailed { .. })
        ));
    }

    #[rstest]
    #[case::missing_database_url(None, "database URL is required")]
    #[case::blank_database_url(Some("   ".to_owned()), "database URL must not be blank")]
    fn migrate_db_rejects_invalid_database_url(
        #[case] database_url: Option<String>,
        #[case] expected_message_prefix: &str,
    ) {
        let config = RepowatchConfig {
            database_url,
            migrate_db: true,
            ..Default::default()
        };

        let result = run(&config);

        match result {
            Err(RepowatchError::Configuration { message }) => {
                assert!(
                    message.starts_with(expected_message_prefix),
                    "expected message starting with {expected_message_prefix:?}, got {message:?}"
                );
            }
            other => panic!("expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn migrate_db_creates_schema_in_fresh_database() {
        let directory = tempfile::tempdir().expect("temp dir should be created");
        let database_path = directory.path().join("repowatch.sqlite");
        let config = RepowatchConfig {
            database_url: Some(database_path.to_string_lossy().into_owned()),
            migrate_db: true,
            ..Default::default()
        };

        run(&config).expect("migrations should apply");

        assert!(database_path.exists(), "database file should be created");
    }
}
