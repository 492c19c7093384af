//! Fluent juju command builder

use std::path::{Path, PathBuf};
use std::time::Duration;

use jujupy::Status;

use crate::output::CommandOutput;
use crate::{Error, Result};

pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct JujuCommand {
    binary_path: PathBuf,
    juju_data: Option<PathBuf>,
    model: Option<String>,
    timeout: Duration,
}

impl Default for JujuCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl JujuCommand {
    /// `juju` from PATH, no model selected
    pub fn new() -> Self {
        Self {
            binary_path: PathBuf::from("juju"),
            juju_data: None,
            model: None,
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn binary<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.binary_path = path.as_ref().to_path_buf();
        self
    }

    /// Set JUJU_DATA directory
    pub fn juju_data<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.juju_data = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn model<S: AsRef<str>>(mut self, model: S) -> Self {
        self.model = Some(model.as_ref().to_string());
        self
    }

    /// Upper bound for a single invocation
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn status_args(&self) -> Vec<String> {
        let mut args = vec!["status".to_string()];
        if let Some(model) = &self.model {
            args.extend(["-m".to_string(), model.clone()]);
        }
        args.extend(["--format".to_string(), "json".to_string()]);
        args
    }

    /// Run `juju status --format json` and parse the result.
    pub async fn status(&self) -> Result<Status> {
        let output = self.execute_args(self.status_args()).await?.expect_success()?;
        Ok(Status::from_json(&output.stdout)?)
    }

    /// Whether the controller answers a status request at all.
    pub async fn is_reachable(&self) -> Result<bool> {
        match self.execute_args(self.status_args()).await {
            Ok(output) => {
                if !output.success {
                    tracing::debug!(stderr = %output.stderr.trim(), "controller not reachable yet");
                }
                Ok(output.success)
            }
            Err(e) if e.is_transient() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn execute_args<I, S>(&self, args: I) -> Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cmd = tokio::process::Command::new(&self.binary_path);
        let mut rendered = self.binary_path.display().to_string();

        if let Some(data) = &self.juju_data {
            cmd.env("JUJU_DATA", data);
        }

        for arg in args {
            cmd.arg(arg.as_ref());
            rendered.push(' ');
            rendered.push_str(arg.as_ref());
        }

        cmd.kill_on_drop(true);
        tracing::debug!(command = %rendered, "running juju");

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return Err(Error::Spawn {
                    command: rendered,
                    source,
                });
            }
            Err(_) => {
                return Err(Error::CommandTimeout {
                    command: rendered,
                    timeout: self.timeout,
                });
            }
        };

        Ok(CommandOutput::from_output(rendered, output))
    }
}
