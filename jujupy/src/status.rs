//! Typed view of `juju status --format json`.
//!
//! Only the fields the convergence checks read are modelled; everything else
//! in the document is ignored. A document missing any of these fields is
//! rejected at parse time with [`Error::MalformedSnapshot`], except for an
//! application's `units`: juju leaves that out for subordinates and for
//! applications scaled to zero, so it is only required by the checks that
//! read it.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Status {
    pub machines: BTreeMap<String, Machine>,
    pub applications: BTreeMap<String, Application>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Machine {
    #[serde(rename = "juju-status")]
    pub juju_status: AgentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Application {
    pub units: Option<BTreeMap<String, Unit>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Unit {
    #[serde(rename = "workload-status")]
    pub workload_status: AgentStatus,
    /// Id of the machine hosting this unit.
    pub machine: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentStatus {
    pub current: String,
}

impl Status {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::MalformedSnapshot(e.to_string()))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::MalformedSnapshot(e.to_string()))
    }

    pub fn application(&self, name: &str) -> Result<&Application> {
        self.applications
            .get(name)
            .ok_or_else(|| Error::MissingEntity {
                application: name.to_string(),
            })
    }

    /// Units of the named application. Only this application has to carry
    /// a `units` entry.
    pub fn application_units(&self, name: &str) -> Result<&BTreeMap<String, Unit>> {
        self.application(name)?
            .units
            .as_ref()
            .ok_or_else(|| Error::MalformedSnapshot(format!("application {name} has no units")))
    }

    /// Every unit of every application, paired with its id. Fails if any
    /// application lacks its `units` entry.
    pub fn units(&self) -> Result<Vec<(&str, &Unit)>> {
        let mut units = Vec::new();
        for (name, app) in &self.applications {
            let app_units = app.units.as_ref().ok_or_else(|| {
                Error::MalformedSnapshot(format!("application {name} has no units"))
            })?;
            units.extend(app_units.iter().map(|(id, unit)| (id.as_str(), unit)));
        }
        Ok(units)
    }
}
