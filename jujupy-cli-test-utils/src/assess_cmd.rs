//! Fluent assess command builder for testing

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::AssessOutput;

#[derive(Debug, Clone)]
pub struct AssessCommand {
    binary_path: PathBuf,
    global_args: Vec<String>,
    env_vars: HashMap<String, String>,
    timeout: Duration,
}

impl AssessCommand {
    /// Integration tests pass `env!("CARGO_BIN_EXE_assess")` here
    pub fn new<P: AsRef<Path>>(binary: P) -> Self {
        Self {
            binary_path: binary.as_ref().to_path_buf(),
            global_args: Vec::new(),
            env_vars: HashMap::new(),
            timeout: crate::DEFAULT_TIMEOUT,
        }
    }

    pub fn juju_bin<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg_pair("--juju-bin", path.as_ref().display().to_string())
    }

    pub fn model(self, model: &str) -> Self {
        self.arg_pair("--model", model)
    }

    pub fn config<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg_pair("--config", path.as_ref().display().to_string())
    }

    /// `--timeout` handed to assess, in seconds
    pub fn wait_timeout(self, seconds: f64) -> Self {
        self.arg_pair("--timeout", seconds.to_string())
    }

    pub fn interval(self, seconds: f64) -> Self {
        self.arg_pair("--interval", seconds.to_string())
    }

    pub fn env<K: AsRef<str>, V: AsRef<str>>(mut self, key: K, value: V) -> Self {
        self.env_vars
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Upper bound for the assess process itself
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn arg_pair<V: AsRef<str>>(mut self, flag: &str, value: V) -> Self {
        self.global_args.push(flag.to_string());
        self.global_args.push(value.as_ref().to_string());
        self
    }

    pub async fn wait_bootstrapped(self) -> crate::Result<AssessOutput> {
        self.execute_args(["wait-bootstrapped"]).await
    }

    pub async fn wait_started(self) -> crate::Result<AssessOutput> {
        self.execute_args(["wait-started"]).await
    }

    pub async fn wait_ready(self, application: &str) -> crate::Result<AssessOutput> {
        self.execute_args(["wait-ready", application]).await
    }

    pub async fn execute_args<I, S>(self, args: I) -> crate::Result<AssessOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cmd = std::process::Command::new(&self.binary_path);
        let mut rendered = self.binary_path.display().to_string();

        for arg in args {
            cmd.arg(arg.as_ref());
            rendered.push(' ');
            rendered.push_str(arg.as_ref());
        }
        cmd.args(&self.global_args);
        for arg in &self.global_args {
            rendered.push(' ');
            rendered.push_str(arg);
        }

        // keep the environment of whoever runs the tests out of the way
        for key in ["JUJU_BIN", "JUJU_DATA", "JUJU_MODEL", "ASSESS_CONFIG", "RUST_LOG"] {
            cmd.env_remove(key);
        }
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        let output = tokio::time::timeout(self.timeout, async {
            tokio::task::spawn_blocking(move || cmd.output()).await?
        })
        .await??;

        Ok(AssessOutput::new(rendered, output))
    }
}
