use std::path::PathBuf;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Juju(#[from] jujupy::Error),

    #[error("`{command}` failed with exit code {exit_code:?}")]
    Command {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("`{command}` did not finish within {timeout:?}")]
    CommandTimeout { command: String, timeout: Duration },

    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Failures worth another poll: the CLI ran but errored, or hung.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Command { .. } | Error::CommandTimeout { .. })
    }

    /// Output captured from a failed CLI invocation, as `(stdout, stderr)`.
    pub fn output(&self) -> Option<(&str, &str)> {
        match self {
            Error::Command { stdout, stderr, .. } => Some((stdout, stderr)),
            _ => None,
        }
    }
}
