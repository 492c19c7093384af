//! Building blocks for juju acceptance tests: a deadline that counts down
//! the seconds left, checks that tell which units are still waiting on a
//! desired state, and a reporter that prints how that set evolves across
//! polls.

#![deny(unused_extern_crates)]
#![deny(unused_crate_dependencies)]
#![deny(unsafe_code)]

pub mod deadline;
mod error;
pub mod reporter;
pub mod state;
pub mod status;

pub use deadline::{Clock, SystemClock, UntilTimeout};
pub use error::{Error, Result};
pub use reporter::{DEFAULT_WRAP_WIDTH, Group, GroupReporter};
pub use state::{
    AgentsStarted, ApplicationReady, Bootstrapped, Condition, Convergence, MACHINE_STARTED,
    WORKLOAD_ACTIVE, WaitingSet, bootstrapped, group_by_state, ready, started,
};
pub use status::{AgentStatus, Application, Machine, Status, Unit};
