//! Isolated test environment with an explicit name

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::{AssessCommand, FakeJuju};

/// Scratch directory plus a model name, both derived from the test name.
/// Everything under the directory is removed on drop.
pub struct JujuTestEnv {
    temp_dir: TempDir,
    env_name: String,
}

impl JujuTestEnv {
    pub fn new(test_name: &str) -> crate::Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix(&format!("jujupy-test-{test_name}-"))
            .tempdir()?;

        Ok(Self {
            temp_dir,
            env_name: temp_env_name(test_name, chrono::Local::now().naive_local()),
        })
    }

    /// Model name to use for this test, e.g. `deploystack-20261019093000-temp-env`
    pub fn env_name(&self) -> &str {
        &self.env_name
    }

    pub fn test_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Install a fake juju binary inside the test directory
    pub fn fake_juju(&self) -> crate::Result<FakeJuju> {
        FakeJuju::install(self.test_dir().join("fake-juju"))
    }

    /// `assess` runner that ignores any per-user config file
    pub fn assess_cmd<P: AsRef<Path>>(&self, binary: P) -> crate::Result<AssessCommand> {
        let config = self.config_path();
        if !config.exists() {
            std::fs::write(&config, "")?;
        }
        Ok(AssessCommand::new(binary).config(config))
    }

    pub fn config_path(&self) -> PathBuf {
        self.test_dir().join("assess.toml")
    }
}

/// `<letters of test_name>-<YYYYmmddHHMMSS>-temp-env`
pub fn temp_env_name(test_name: &str, at: chrono::NaiveDateTime) -> String {
    let mut name: String = test_name
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect();
    if name.is_empty() {
        name = "unknowntest".to_string();
    }
    format!("{name}-{}-temp-env", at.format("%Y%m%d%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2026, 10, 19)
            .and_then(|d| d.and_hms_opt(9, 30, 5))
            .expect("valid date")
    }

    #[test]
    fn env_name_keeps_letters_only() {
        assert_eq!(
            temp_env_name("assess_deploy-2", at()),
            "assessdeploy-20261019093005-temp-env"
        );
    }

    #[test]
    fn env_name_without_letters() {
        assert_eq!(
            temp_env_name("123", at()),
            "unknowntest-20261019093005-temp-env"
        );
    }

    #[test]
    fn test_dir_is_removed_on_drop() {
        let env = JujuTestEnv::new("cleanup").unwrap();
        let dir = env.test_dir().to_path_buf();
        assert!(dir.exists());
        assert!(env.env_name().starts_with("cleanup-"));

        drop(env);
        assert!(!dir.exists());
    }
}
