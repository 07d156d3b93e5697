use std::collections::{BTreeSet, HashSet};
use std::net::SocketAddr;

use serde::Deserialize;
use taskgate_core::error::{Result, TaskGateError};
use taskgate_core::Role;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub subjects: Vec<SubjectConfig>,

    #[serde(default)]
    pub seed: SeedConfig,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TaskGateError::UnsupportedVersion);
        }
        if self.subjects.is_empty() {
            return Err(TaskGateError::BadRequest("subjects must not be empty".into()));
        }

        self.gateway.validate()?;

        let mut ids = HashSet::new();
        let mut tickets = HashSet::new();
        for s in &self.subjects {
            s.validate()?;
            if !ids.insert(s.id.as_str()) {
                return Err(TaskGateError::BadRequest(format!("duplicate subject id: {}", s.id)));
            }
            if !tickets.insert(s.ticket.as_str()) {
                return Err(TaskGateError::BadRequest(format!(
                    "duplicate ticket for subject: {}",
                    s.id
                )));
            }
        }

        self.seed.validate()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            TaskGateError::BadRequest(format!(
                "gateway.listen must be a valid socket address: {}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

/// A subject the static resolver can hand out, keyed by bearer ticket.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubjectConfig {
    pub id: String,
    pub ticket: String,
    pub roles: BTreeSet<Role>,
    #[serde(default)]
    pub blocked_by: BTreeSet<String>,
}

impl SubjectConfig {
    fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(TaskGateError::BadRequest("subject id must not be empty".into()));
        }
        if self.ticket.trim().is_empty() {
            return Err(TaskGateError::BadRequest(format!(
                "subject {} ticket must not be empty",
                self.id
            )));
        }
        if self.roles.is_empty() {
            return Err(TaskGateError::BadRequest(format!(
                "subject {} must have at least one role",
                self.id
            )));
        }
        for role in &self.roles {
            if let Role::Unknown(tag) = role {
                // allowed, but it will never match a rule
                tracing::warn!(subject = %self.id, role = %tag, "unknown role tag in config");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedConfig {
    #[serde(default)]
    pub tasks: Vec<SeedTask>,
    #[serde(default)]
    pub comments: Vec<SeedComment>,
}

impl SeedConfig {
    fn validate(&self) -> Result<()> {
        let mut task_ids = HashSet::new();
        for t in &self.tasks {
            if !task_ids.insert(t.id.as_str()) {
                return Err(TaskGateError::BadRequest(format!("duplicate seed task id: {}", t.id)));
            }
        }
        for c in &self.comments {
            if !task_ids.contains(c.task_id.as_str()) {
                return Err(TaskGateError::BadRequest(format!(
                    "seed comment {} references unknown task {}",
                    c.id, c.task_id
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedTask {
    pub id: String,
    pub title: String,
    pub owner_id: String,
    #[serde(default)]
    pub invited_users: BTreeSet<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedComment {
    pub id: String,
    pub body: String,
    pub author_id: String,
    pub task_id: String,
}
