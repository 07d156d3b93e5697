use crate::model::{Action, Instance, ResourceKind, Role, Subject};

use super::rules::grant_for;

/// Verdict plus the role that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    /// First role (in the subject's role order) whose grant passed.
    pub granted_by: Option<Role>,
}

impl Decision {
    fn deny() -> Self {
        Self { allowed: false, granted_by: None }
    }
}

/// Allow/deny for `subject` doing `action` on `kind`.
///
/// Pure: reads only its arguments. Each of the subject's roles is checked
/// against the rule table and the results are OR-ed. A role whose grant
/// needs an instance denies when `instance` is `None`, and an instance of
/// the wrong kind counts as `None`.
pub fn evaluate(
    subject: &Subject,
    kind: ResourceKind,
    action: Action,
    instance: Option<Instance<'_>>,
) -> bool {
    decide(subject, kind, action, instance).allowed
}

/// Same verdict as [`evaluate`], also reporting which role granted it.
pub fn decide(
    subject: &Subject,
    kind: ResourceKind,
    action: Action,
    instance: Option<Instance<'_>>,
) -> Decision {
    let instance = instance.filter(|i| i.kind() == kind);
    subject
        .roles
        .iter()
        .find(|role| grant_for(kind, action, role).permits(subject, instance))
        .map(|role| Decision { allowed: true, granted_by: Some(role.clone()) })
        .unwrap_or_else(Decision::deny)
}

/// String-tag entry point. Unknown resource or action tags deny.
pub fn evaluate_tags(
    subject: &Subject,
    kind: &str,
    action: &str,
    instance: Option<Instance<'_>>,
) -> bool {
    match (kind.parse::<ResourceKind>(), action.parse::<Action>()) {
        (Ok(kind), Ok(action)) => evaluate(subject, kind, action, instance),
        _ => false,
    }
}
