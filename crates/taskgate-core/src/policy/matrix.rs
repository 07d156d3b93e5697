//! Human-readable permission matrix, derived from the rule table.

use serde::Serialize;

use crate::model::{Action, ResourceKind, Role};

use super::rules::{grant_for, Condition, Grant};

/// One cell of the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixEntry {
    pub resource: ResourceKind,
    pub role: Role,
    pub action: Action,
    pub allowed: bool,
    pub summary: String,
}

/// Every `(resource, role, action)` triple, resource-major.
pub fn permission_matrix() -> Vec<MatrixEntry> {
    let mut out = Vec::with_capacity(ResourceKind::ALL.len() * Role::KNOWN.len() * Action::ALL.len());
    for resource in ResourceKind::ALL {
        for role in Role::KNOWN {
            for action in Action::ALL {
                let grant = grant_for(resource, action, &role);
                out.push(MatrixEntry {
                    resource,
                    allowed: grant.is_reachable(),
                    summary: summarize(resource, action, grant),
                    role: role.clone(),
                    action,
                });
            }
        }
    }
    out
}

fn summarize(resource: ResourceKind, action: Action, grant: Grant) -> String {
    let (one, noun) = match resource {
        ResourceKind::Task => ("task", "tasks"),
        ResourceKind::Comment => ("comment", "comments"),
    };
    if action == Action::ManagePermissions {
        let s = if grant == Grant::Deny {
            "cannot manage permissions"
        } else {
            "can manage permissions"
        };
        return s.to_string();
    }
    let verb = action.as_str();
    match grant {
        Grant::Allow => format!("can {verb} any {one}"),
        Grant::Deny => format!("cannot {verb} {noun}"),
        Grant::RequireInstance(conds) => format!("can {verb} {} {noun}", qualifiers(conds)),
        Grant::IfInstance(conds) => format!("can {verb} {noun} ({})", qualifiers(conds)),
    }
}

fn qualifiers(conds: &[Condition]) -> String {
    conds.iter().map(|c| c.describe()).collect::<Vec<_>>().join(" ")
}
