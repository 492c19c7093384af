//! Errors that have already been written to the log.

use crate::Error;

/// An error that was logged where it surfaced. Callers only need to unwind
/// and exit; printing it again would duplicate the report.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct LoggedError {
    #[source]
    pub error: Error,
}

/// Log `error`, along with any CLI output it captured, and wrap it.
pub fn log_and_wrap(error: Error) -> LoggedError {
    tracing::error!("{error}");
    if let Some((stdout, stderr)) = error.output() {
        if !stdout.is_empty() || !stderr.is_empty() {
            tracing::info!("Output from command:\nstdout:\n{stdout}\nstderr:\n{stderr}");
        }
    }
    LoggedError { error }
}

pub fn logged<T>(result: Result<T, Error>) -> Result<T, LoggedError> {
    result.map_err(log_and_wrap)
}
