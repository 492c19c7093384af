//! Testing utilities for juju acceptance tooling
//!
//! This crate takes care of the drudgery around testing code that shells out
//! to juju:
//! - Isolated, explicitly named test environments with RAII cleanup
//! - A scriptable fake `juju` binary standing in for a real controller
//! - A fluent runner for the `assess` binary

use std::time::Duration;

pub mod assess_cmd;
pub mod fake_juju;
pub mod output;
pub mod test_env;

pub use assess_cmd::AssessCommand;
pub use fake_juju::FakeJuju;
pub use output::AssessOutput;
pub use test_env::{JujuTestEnv, temp_env_name};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Upper bound for one `assess` run in tests
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
