use std::time::Duration;

use crate::state::WaitingSet;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The deadline ran out before the awaited condition was reached.
    #[error("timed out after {timeout:?}")]
    DeadlineExceeded { timeout: Duration },

    /// Machine agents did not all start before the deadline.
    #[error("timed out waiting for agents to start: {}", describe(.waiting))]
    AgentsNotStarted { waiting: WaitingSet },

    /// Units of an application did not reach the wanted workload status.
    #[error("timed out waiting for {application} to be ready: {}", describe(.waiting))]
    StatusNotMet {
        application: String,
        waiting: WaitingSet,
    },

    #[error("application {application} not found in status")]
    MissingEntity { application: String },

    /// The status document lacks a key the checks depend on.
    #[error("malformed status: {0}")]
    MalformedSnapshot(String),
}

fn describe(waiting: &WaitingSet) -> String {
    if waiting.is_empty() {
        return "no detail".to_string();
    }

    waiting
        .iter()
        .map(|(id, state)| format!("{id}={state}"))
        .collect::<Vec<_>>()
        .join(", ")
}
