//! Desired states a polling loop can wait for.
//!
//! Each check looks at one observation and reports the entities that have not
//! yet reached the desired state, or [`Convergence::Converged`] once nothing is
//! left to wait for.

use std::collections::BTreeMap;

use crate::reporter::Group;
use crate::status::Status;
use crate::{Error, Result};

/// Current state of a machine agent that is up.
pub const MACHINE_STARTED: &str = "started";
/// Workload status of a unit that is ready.
pub const WORKLOAD_ACTIVE: &str = "active";

/// Entity id (unit or machine) to its observed state.
pub type WaitingSet = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Convergence {
    Converged,
    /// Not there yet. The set may be empty when there is no detail to give.
    Waiting(WaitingSet),
}

impl Convergence {
    fn from_waiting(waiting: WaitingSet) -> Self {
        if waiting.is_empty() {
            Convergence::Converged
        } else {
            Convergence::Waiting(waiting)
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged)
    }
}

/// A state to wait for, evaluated against one observation at a time.
pub trait Condition {
    type Input;

    fn check(&self, input: &Self::Input) -> Result<Convergence>;

    /// State value the reporter leaves out of its output.
    fn expected(&self) -> &str;

    /// Error to raise when the deadline passes with `waiting` still pending.
    fn timed_out(&self, timeout: std::time::Duration, waiting: WaitingSet) -> Error;

    fn describe(&self) -> String;
}

/// The controller answers status requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bootstrapped;

/// Every machine hosting a unit has a started agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentsStarted;

/// Every unit of `application` reports an active workload.
#[derive(Debug, Clone)]
pub struct ApplicationReady {
    pub application: String,
}

impl ApplicationReady {
    pub fn new(application: impl Into<String>) -> Self {
        Self {
            application: application.into(),
        }
    }
}

impl Condition for Bootstrapped {
    type Input = bool;

    fn check(&self, reachable: &bool) -> Result<Convergence> {
        Ok(bootstrapped(*reachable))
    }

    fn expected(&self) -> &str {
        MACHINE_STARTED
    }

    fn timed_out(&self, timeout: std::time::Duration, _waiting: WaitingSet) -> Error {
        Error::DeadlineExceeded { timeout }
    }

    fn describe(&self) -> String {
        "controller to bootstrap".to_string()
    }
}

impl Condition for AgentsStarted {
    type Input = Status;

    fn check(&self, status: &Status) -> Result<Convergence> {
        started(status)
    }

    fn expected(&self) -> &str {
        MACHINE_STARTED
    }

    fn timed_out(&self, _timeout: std::time::Duration, waiting: WaitingSet) -> Error {
        Error::AgentsNotStarted { waiting }
    }

    fn describe(&self) -> String {
        "agents to start".to_string()
    }
}

impl Condition for ApplicationReady {
    type Input = Status;

    fn check(&self, status: &Status) -> Result<Convergence> {
        ready(status, &self.application)
    }

    fn expected(&self) -> &str {
        WORKLOAD_ACTIVE
    }

    fn timed_out(&self, _timeout: std::time::Duration, waiting: WaitingSet) -> Error {
        Error::StatusNotMet {
            application: self.application.clone(),
            waiting,
        }
    }

    fn describe(&self) -> String {
        format!("{} to be ready", self.application)
    }
}

/// An unreachable controller gives nothing to report, so it keeps waiting
/// with an empty set until the caller's deadline fires.
pub fn bootstrapped(reachable: bool) -> Convergence {
    if reachable {
        Convergence::Converged
    } else {
        Convergence::Waiting(WaitingSet::new())
    }
}

/// Units whose machine agent has not started, keyed by unit id with the
/// machine's state as value.
///
/// Units are only scanned for machines that are not started yet; an
/// application without `units` is malformed once such a scan is needed.
pub fn started(status: &Status) -> Result<Convergence> {
    let mut waiting = WaitingSet::new();
    for (machine_id, machine) in &status.machines {
        let machine_state = &machine.juju_status.current;
        if machine_state == MACHINE_STARTED {
            continue;
        }
        for (unit_id, unit) in status.units()? {
            if unit.machine == *machine_id {
                waiting.insert(unit_id.to_string(), machine_state.clone());
            }
        }
    }

    tracing::trace!(waiting = waiting.len(), "checked machine agents");
    Ok(Convergence::from_waiting(waiting))
}

/// Units of `application` whose workload is not active.
pub fn ready(status: &Status, application: &str) -> Result<Convergence> {
    let waiting: WaitingSet = status
        .application_units(application)?
        .iter()
        .filter(|(_, unit)| unit.workload_status.current != WORKLOAD_ACTIVE)
        .map(|(id, unit)| (id.clone(), unit.workload_status.current.clone()))
        .collect();

    tracing::trace!(application, waiting = waiting.len(), "checked workloads");
    Ok(Convergence::from_waiting(waiting))
}

/// Turn `unit -> state` into `state -> units`, the shape the reporter prints.
pub fn group_by_state(waiting: &WaitingSet) -> Group {
    let mut group = Group::new();
    for (id, state) in waiting {
        group.entry(state.clone()).or_default().push(id.clone());
    }
    group
}
