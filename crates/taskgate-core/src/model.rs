//! Subjects, resources, and the tags that address them.
//!
//! Everything here is plain data. Subjects come from a resolver, tasks and
//! comments from a resource store; the policy engine only borrows them.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TaskGateError;

/// Role tag attached to a subject.
///
/// Tags outside the known set are kept as `Unknown` so that a subject
/// carrying them still resolves; such roles match no rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Moderator,
    User,
    Unknown(String),
}

impl Role {
    /// Roles the rule table knows about.
    pub const KNOWN: [Role; 3] = [Role::Admin, Role::Moderator, Role::User];

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::User => "user",
            Role::Unknown(tag) => tag,
        }
    }
}

impl From<&str> for Role {
    fn from(tag: &str) -> Self {
        match tag {
            "admin" => Role::Admin,
            "moderator" => Role::Moderator,
            "user" => Role::User,
            other => Role::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(tag: String) -> Self {
        Role::from(tag.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of resource a decision is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Task,
    Comment,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Task, ResourceKind::Comment];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Task => "task",
            ResourceKind::Comment => "comment",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = TaskGateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // plural forms are what the web client sends
        match s {
            "task" | "tasks" | "todo" | "todos" => Ok(ResourceKind::Task),
            "comment" | "comments" => Ok(ResourceKind::Comment),
            other => Err(TaskGateError::UnknownTag { kind: "resource", tag: other.to_string() }),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action requested on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    View,
    Create,
    Update,
    Delete,
    /// Administrative only; never part of ordinary CRUD flows.
    ManagePermissions,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::View,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::ManagePermissions,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::ManagePermissions => "manage-permissions",
        }
    }
}

impl FromStr for Action {
    type Err = TaskGateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(Action::View),
            "create" => Ok(Action::Create),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            "manage-permissions" => Ok(Action::ManagePermissions),
            other => Err(TaskGateError::UnknownTag { kind: "action", tag: other.to_string() }),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated actor. Immutable for the duration of a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub roles: BTreeSet<Role>,
    /// Ids of subjects that have hidden their content from this one.
    #[serde(default)]
    pub blocked_by: BTreeSet<String>,
}

impl Subject {
    /// Subject with no roles; denied everything until roles are added.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), roles: BTreeSet::new(), blocked_by: BTreeSet::new() }
    }

    pub fn with_role(mut self, role: impl Into<Role>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn blocked_by(mut self, author_id: impl Into<String>) -> Self {
        self.blocked_by.insert(author_id.into());
        self
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }
}

/// A to-do item as held by the resource store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub owner_id: String,
    #[serde(default)]
    pub invited_users: BTreeSet<String>,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn is_owner_or_invited(&self, subject_id: &str) -> bool {
        self.owner_id == subject_id || self.invited_users.contains(subject_id)
    }
}

/// A comment attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub author_id: String,
    pub task_id: String,
    /// Unix epoch milliseconds.
    #[serde(default)]
    pub created_at_ms: u64,
}

/// Borrowed view of a concrete resource passed into a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instance<'a> {
    Task(&'a Task),
    Comment(&'a Comment),
}

impl<'a> Instance<'a> {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Instance::Task(_) => ResourceKind::Task,
            Instance::Comment(_) => ResourceKind::Comment,
        }
    }

    pub fn as_task(&self) -> Option<&'a Task> {
        match *self {
            Instance::Task(t) => Some(t),
            Instance::Comment(_) => None,
        }
    }

    pub fn as_comment(&self) -> Option<&'a Comment> {
        match *self {
            Instance::Comment(c) => Some(c),
            Instance::Task(_) => None,
        }
    }
}

impl<'a> From<&'a Task> for Instance<'a> {
    fn from(t: &'a Task) -> Self {
        Instance::Task(t)
    }
}

impl<'a> From<&'a Comment> for Instance<'a> {
    fn from(c: &'a Comment) -> Self {
        Instance::Comment(c)
    }
}
