use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{Error, Result};

pub const DEFAULT_TIMEOUT_SECS: f64 = 600.0;
pub const DEFAULT_INTERVAL_SECS: f64 = 5.0;
pub const DEFAULT_COMMAND_TIMEOUT_SECS: f64 = 120.0;

/// assess configuration as read from `assess.toml`. Every field is optional;
/// command line flags take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub juju_bin: Option<PathBuf>,
    pub juju_data: Option<PathBuf>,
    pub model: Option<String>,
    pub timeout_secs: Option<f64>,
    pub interval_secs: Option<f64>,
    pub command_timeout_secs: Option<f64>,
    pub wrap_width: Option<usize>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub juju_bin: PathBuf,
    pub juju_data: Option<PathBuf>,
    pub model: Option<String>,
    pub timeout: Duration,
    pub interval: Duration,
    pub command_timeout: Duration,
    pub wrap_width: usize,
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read `explicit` if given, else the per-user config file if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match default_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load_from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Fields set in `self` win over those in `fallback`.
    pub fn or(self, fallback: Config) -> Config {
        Config {
            juju_bin: self.juju_bin.or(fallback.juju_bin),
            juju_data: self.juju_data.or(fallback.juju_data),
            model: self.model.or(fallback.model),
            timeout_secs: self.timeout_secs.or(fallback.timeout_secs),
            interval_secs: self.interval_secs.or(fallback.interval_secs),
            command_timeout_secs: self.command_timeout_secs.or(fallback.command_timeout_secs),
            wrap_width: self.wrap_width.or(fallback.wrap_width),
        }
    }

    pub fn settings(&self) -> Result<Settings> {
        let wrap_width = self.wrap_width.unwrap_or(jujupy::DEFAULT_WRAP_WIDTH);
        if wrap_width == 0 {
            return Err(Error::InvalidSetting {
                name: "wrap_width",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Settings {
            juju_bin: self
                .juju_bin
                .clone()
                .unwrap_or_else(|| PathBuf::from("juju")),
            juju_data: self.juju_data.clone(),
            model: self.model.clone(),
            timeout: seconds("timeout", self.timeout_secs, DEFAULT_TIMEOUT_SECS)?,
            interval: seconds("interval", self.interval_secs, DEFAULT_INTERVAL_SECS)?,
            command_timeout: seconds(
                "command_timeout",
                self.command_timeout_secs,
                DEFAULT_COMMAND_TIMEOUT_SECS,
            )?,
            wrap_width,
        })
    }
}

/// `<config dir>/jujupy/assess.toml`
pub fn default_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.config_dir().join("jujupy").join("assess.toml"))
}

fn seconds(name: &'static str, value: Option<f64>, default: f64) -> Result<Duration> {
    let value = value.unwrap_or(default);
    Duration::try_from_secs_f64(value).map_err(|e| Error::InvalidSetting {
        name,
        reason: format!("{value} seconds: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Config::default().settings().unwrap();

        assert_eq!(settings.juju_bin, PathBuf::from("juju"));
        assert_eq!(settings.timeout, Duration::from_secs(600));
        assert_eq!(settings.interval, Duration::from_secs(5));
        assert_eq!(settings.command_timeout, Duration::from_secs(120));
        assert_eq!(settings.wrap_width, 79);
        assert_eq!(settings.model, None);
    }

    #[test]
    fn loads_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assess.toml");
        std::fs::write(
            &path,
            r#"
juju_bin = "/snap/bin/juju"
model = "ci"
timeout_secs = 1800
interval_secs = 0.5
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        let settings = config.settings().unwrap();

        assert_eq!(settings.juju_bin, PathBuf::from("/snap/bin/juju"));
        assert_eq!(settings.model.as_deref(), Some("ci"));
        assert_eq!(settings.timeout, Duration::from_secs(1800));
        assert_eq!(settings.interval, Duration::from_millis(500));
        assert_eq!(settings.wrap_width, 79);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assess.toml");
        std::fs::write(&path, "timeout = 10\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }), "{err:?}");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }), "{err:?}");
    }

    #[test]
    fn overrides_win() {
        let file = Config {
            model: Some("from-file".to_string()),
            timeout_secs: Some(10.0),
            ..Config::default()
        };
        let flags = Config {
            model: Some("from-flag".to_string()),
            ..Config::default()
        };

        let merged = flags.or(file);
        assert_eq!(merged.model.as_deref(), Some("from-flag"));
        assert_eq!(merged.timeout_secs, Some(10.0));
    }

    #[test]
    fn negative_timeout_is_invalid() {
        let config = Config {
            timeout_secs: Some(-1.0),
            ..Config::default()
        };

        assert!(matches!(
            config.settings(),
            Err(Error::InvalidSetting { name: "timeout", .. })
        ));
    }

    #[test]
    fn zero_wrap_width_is_invalid() {
        let config = Config {
            wrap_width: Some(0),
            ..Config::default()
        };

        assert!(matches!(
            config.settings(),
            Err(Error::InvalidSetting { name: "wrap_width", .. })
        ));
    }
}
