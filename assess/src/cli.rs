use std::path::PathBuf;

use crate::config::Config;

#[derive(clap::Parser, Debug)]
#[command(
    name = "assess",
    version,
    about = "Wait for a juju model to converge, printing progress along the way"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the juju binary (defaults to `juju` from PATH)
    #[arg(long, global = true, env = "JUJU_BIN", value_name = "PATH")]
    pub juju_bin: Option<PathBuf>,

    /// JUJU_DATA directory handed to juju
    #[arg(long, global = true, env = "JUJU_DATA", value_name = "DIR")]
    pub juju_data: Option<PathBuf>,

    /// Model to watch (defaults to juju's current model)
    #[arg(short, long, global = true, env = "JUJU_MODEL")]
    pub model: Option<String>,

    /// Give up after this many seconds
    #[arg(long, global = true, value_name = "SECONDS", value_parser = parse_seconds)]
    pub timeout: Option<f64>,

    /// Seconds to sleep between two status checks
    #[arg(long, global = true, value_name = "SECONDS", value_parser = parse_seconds)]
    pub interval: Option<f64>,

    /// Config file (defaults to <config dir>/jujupy/assess.toml if present)
    #[arg(long, global = true, env = "ASSESS_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,
}

#[derive(clap::Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Wait until the controller answers status requests
    WaitBootstrapped,
    /// Wait until every machine hosting a unit has a started agent
    WaitStarted,
    /// Wait until every unit of an application is active
    WaitReady {
        /// Application name as shown by `juju status`
        application: String,
    },
}

impl Cli {
    /// Settings given on the command line, to be layered over the config file.
    pub fn overrides(&self) -> Config {
        Config {
            juju_bin: self.juju_bin.clone(),
            juju_data: self.juju_data.clone(),
            model: self.model.clone(),
            timeout_secs: self.timeout,
            interval_secs: self.interval,
            ..Config::default()
        }
    }
}

fn parse_seconds(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{s:?} is not a number: {e}"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{s:?} must be a non-negative number of seconds"));
    }
    Ok(value)
}
