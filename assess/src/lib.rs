#![deny(unused_extern_crates)]
#![deny(unused_crate_dependencies)]
#![deny(unsafe_code)]

use eyre as _;

#[cfg(test)]
use jujupy_cli_test_utils as _;
#[cfg(test)]
use tempfile as _;

mod cli;
mod config;
mod error;
mod juju_cmd;
mod logged;
pub mod logging;
mod output;
mod run;
mod wait;

pub use cli::{Cli, Command};
pub use config::{Config, Settings, default_path as default_config_path};
pub use error::{Error, Result};
pub use juju_cmd::JujuCommand;
pub use logged::{LoggedError, log_and_wrap, logged};
pub use output::CommandOutput;
pub use run::run;
pub use wait::wait_for;
