//! Captured result of one `assess` run
//!
//! assess prints reporter progress and the closing "Done waiting for ..." line
//! on stdout; its tracing log, including the error that ended a failed wait,
//! goes to stderr.

const DONE_PREFIX: &str = "Done waiting for ";

#[derive(Debug)]
pub struct AssessOutput {
    /// The assess command line, for failure messages
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl AssessOutput {
    pub fn new(command: String, output: std::process::Output) -> Self {
        Self {
            command,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// The wait converged and assess exited 0
    pub fn expect_success(self) -> crate::Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(self.failure(&format!("exited with {:?}", self.exit_code)).into())
        }
    }

    /// The wait ended in an error and assess exited non-zero
    pub fn expect_failure(self) -> crate::Result<Self> {
        if self.success() {
            Err(self.failure("unexpectedly succeeded").into())
        } else {
            Ok(self)
        }
    }

    fn failure(&self, what: &str) -> String {
        format!(
            "`{}` {what}\nstdout:\n{}\nstderr:\n{}",
            self.command,
            self.stdout,
            self.stderr
        )
    }

    /// Reporter output, one entry per status group printed
    pub fn progress(&self) -> Vec<&str> {
        self.stdout
            .lines()
            .filter(|line| !line.is_empty() && !line.contains(DONE_PREFIX))
            .collect()
    }

    /// assess announced convergence of `description`, e.g. "agents to start"
    pub fn finished_waiting_for(&self, description: &str) -> bool {
        self.stdout.contains(&format!("{DONE_PREFIX}{description}"))
    }

    /// `text` shows up in the tracing log
    pub fn logged(&self, text: &str) -> bool {
        self.stderr.contains(text)
    }
}
