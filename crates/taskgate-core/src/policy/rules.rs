//! The rule table: `(resource, action, role) -> grant`.
//!
//! Every policy decision in the system is read from `RULES`. A
//! `(resource, action)` pair with no row for a role is a deny for that role.

use crate::model::{Action, Instance, ResourceKind, Role, Subject};

use self::table::*;

/// Attribute check over a subject and a concrete instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Task owner is the subject, or the subject is on the invite list.
    OwnerOrInvited,
    /// Task is marked completed.
    Completed,
    /// Comment was written by the subject.
    Author,
    /// Comment author has not blocked the subject.
    AuthorNotBlocking,
}

impl Condition {
    /// A condition asked of the wrong instance kind does not hold.
    pub fn holds(self, subject: &Subject, instance: Instance<'_>) -> bool {
        match self {
            Condition::OwnerOrInvited => instance
                .as_task()
                .is_some_and(|t| t.is_owner_or_invited(&subject.id)),
            Condition::Completed => instance.as_task().is_some_and(|t| t.completed),
            Condition::Author => instance
                .as_comment()
                .is_some_and(|c| c.author_id == subject.id),
            Condition::AuthorNotBlocking => instance
                .as_comment()
                .is_some_and(|c| !subject.blocked_by.contains(&c.author_id)),
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Condition::OwnerOrInvited => "own or invited",
            Condition::Completed => "completed",
            Condition::Author => "own",
            Condition::AuthorNotBlocking => "except from blocking users",
        }
    }
}

/// What a role gets for one `(resource, action)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    Allow,
    Deny,
    /// Needs an instance of the right kind; every condition must hold.
    RequireInstance(&'static [Condition]),
    /// Allowed without an instance; with one, every condition must hold.
    IfInstance(&'static [Condition]),
}

impl Grant {
    pub fn permits(self, subject: &Subject, instance: Option<Instance<'_>>) -> bool {
        match self {
            Grant::Allow => true,
            Grant::Deny => false,
            Grant::RequireInstance(conds) => match instance {
                Some(inst) => conds.iter().all(|c| c.holds(subject, inst)),
                None => false,
            },
            Grant::IfInstance(conds) => match instance {
                Some(inst) => conds.iter().all(|c| c.holds(subject, inst)),
                None => true,
            },
        }
    }

    /// Whether this grant can ever pass for some subject/instance.
    pub fn is_reachable(self) -> bool {
        !matches!(self, Grant::Deny)
    }
}

/// One row of the table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub kind: ResourceKind,
    pub action: Action,
    pub role: KnownRole,
    pub grant: Grant,
}

/// Roles that can appear in a rule row. `Role::Unknown` never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownRole {
    Admin,
    Moderator,
    User,
}

impl KnownRole {
    pub fn of(role: &Role) -> Option<KnownRole> {
        match role {
            Role::Admin => Some(KnownRole::Admin),
            Role::Moderator => Some(KnownRole::Moderator),
            Role::User => Some(KnownRole::User),
            Role::Unknown(_) => None,
        }
    }
}

/// Short names for the rows below.
mod table {
    pub(super) use super::Condition::*;
    pub(super) use super::Grant::*;
    pub(super) use super::KnownRole::{Admin, Moderator, User};
    pub(super) use crate::model::Action::{Create, Delete, ManagePermissions, Update, View};
    pub(super) use crate::model::ResourceKind::{Comment, Task};
}

const fn rule(kind: ResourceKind, action: Action, role: KnownRole, grant: Grant) -> Rule {
    Rule { kind, action, role, grant }
}

pub static RULES: &[Rule] = &[
    // tasks
    rule(Task, View, Admin, Allow),
    rule(Task, View, Moderator, Allow),
    rule(Task, View, User, Allow),
    rule(Task, Create, Admin, Allow),
    rule(Task, Create, Moderator, Allow),
    rule(Task, Create, User, Allow),
    rule(Task, Update, Admin, Allow),
    rule(Task, Update, Moderator, Allow),
    rule(Task, Update, User, RequireInstance(&[OwnerOrInvited])),
    rule(Task, Delete, Admin, Allow),
    rule(Task, Delete, Moderator, RequireInstance(&[Completed])),
    rule(Task, Delete, User, RequireInstance(&[Completed, OwnerOrInvited])),
    rule(Task, ManagePermissions, Admin, Allow),
    rule(Task, ManagePermissions, Moderator, Deny),
    rule(Task, ManagePermissions, User, Deny),
    // comments
    rule(Comment, View, Admin, Allow),
    rule(Comment, View, Moderator, Allow),
    rule(Comment, View, User, IfInstance(&[AuthorNotBlocking])),
    rule(Comment, Create, Admin, Allow),
    rule(Comment, Create, Moderator, Allow),
    rule(Comment, Create, User, Allow),
    rule(Comment, Update, Admin, Allow),
    rule(Comment, Update, Moderator, Allow),
    rule(Comment, Update, User, RequireInstance(&[Author])),
    rule(Comment, Delete, Admin, Allow),
    rule(Comment, ManagePermissions, Admin, Allow),
];

/// Grant for one role on `(kind, action)`; missing rows are `Deny`.
pub fn grant_for(kind: ResourceKind, action: Action, role: &Role) -> Grant {
    let Some(role) = KnownRole::of(role) else {
        return Grant::Deny;
    };
    RULES
        .iter()
        .find(|r| r.kind == kind && r.action == action && r.role == role)
        .map(|r| r.grant)
        .unwrap_or(Grant::Deny)
}
