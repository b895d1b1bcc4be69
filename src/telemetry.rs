//! Structured operational events and sinks.
//!
//! The repository manager and the migration runner report what they did
//! through a [`TelemetrySink`], so that embedders can capture cache loads,
//! refresh outcomes and comment fetch failures without parsing log text.

use std::io;

use serde::{Deserialize, Serialize};

/// A structured telemetry event emitted by repowatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// Records the current database schema version after migrations apply.
    SchemaVersionRecorded {
        /// Diesel migration version string (e.g. `20251016000000`).
        schema_version: String,
    },

    /// A persisted snapshot was loaded into a manager.
    CacheLoaded {
        /// Repository in `owner/name` form.
        repository: String,
        /// Number of pull requests loaded.
        pull_requests: u64,
        /// Time spent loading, in milliseconds.
        duration_ms: u64,
    },

    /// Loading the persisted snapshot failed; the manager started empty.
    CacheLoadFailed {
        /// Repository in `owner/name` form.
        repository: String,
        /// Failure description.
        message: String,
    },

    /// Filling one pull request's comment graph failed, ending the batch.
    CommentGraphFetchFailed {
        /// Repository in `owner/name` form.
        repository: String,
        /// Pull request whose fill failed.
        pull_request: u64,
        /// Failure description.
        message: String,
    },

    /// A refresh pass finished.
    RefreshCompleted {
        /// Repository in `owner/name` form.
        repository: String,
        /// Pull requests returned by the upstream listing.
        listed: u64,
        /// Pull requests selected for a comment fill.
        candidates: u64,
        /// Pull requests whose fill succeeded and were merged.
        completed: u64,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Sinks for asserting on emitted events in tests.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use std::sync::Mutex;

    use super::{TelemetryEvent, TelemetrySink};

    /// Sink that keeps every recorded event in memory.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        events: Mutex<Vec<TelemetryEvent>>,
    }

    impl RecordingSink {
        /// Drains and returns the events recorded so far.
        #[must_use]
        pub fn take(&self) -> Vec<TelemetryEvent> {
            self.events
                .lock()
                .map(|mut events| events.drain(..).collect())
                .unwrap_or_default()
        }
    }

    impl TelemetrySink for RecordingSink {
        fn record(&self, event: TelemetryEvent) {
            if let Ok(mut events) = self.events.lock() {
                events.push(event);
            }
        }
    }
}
