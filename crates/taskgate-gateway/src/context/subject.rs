use std::collections::HashMap;

use axum::http::{header, HeaderMap};
use taskgate_core::error::{Result, TaskGateError};
use taskgate_core::Subject;

use crate::config::SubjectConfig;

/// Maps a bearer ticket to a resolved subject.
pub trait SubjectResolver: Send + Sync {
    fn resolve(&self, ticket: &str) -> Result<Subject>;

    /// Every subject this resolver knows, for the admin listing.
    fn subjects(&self) -> Vec<Subject>;
}

/// Resolver backed by the `subjects` section of the config.
pub struct StaticSubjectResolver {
    by_ticket: HashMap<String, Subject>,
}

impl StaticSubjectResolver {
    pub fn new(subjects: &[SubjectConfig]) -> Self {
        let by_ticket = subjects
            .iter()
            .map(|s| {
                let subject = Subject {
                    id: s.id.clone(),
                    roles: s.roles.clone(),
                    blocked_by: s.blocked_by.clone(),
                };
                (s.ticket.clone(), subject)
            })
            .collect();
        Self { by_ticket }
    }
}

impl SubjectResolver for StaticSubjectResolver {
    fn resolve(&self, ticket: &str) -> Result<Subject> {
        self.by_ticket.get(ticket).cloned().ok_or(TaskGateError::Unauthenticated)
    }

    fn subjects(&self) -> Vec<Subject> {
        let mut out: Vec<Subject> = self.by_ticket.values().cloned().collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }
}

/// Extract the ticket from `Authorization: Bearer <ticket>`.
pub fn bearer_ticket(headers: &HeaderMap) -> Result<&str> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .ok_or(TaskGateError::Unauthenticated)?
        .to_str()
        .map_err(|_| TaskGateError::Unauthenticated)?;
    let ticket = raw
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(TaskGateError::Unauthenticated)?;
    if ticket.is_empty() {
        return Err(TaskGateError::Unauthenticated);
    }
    Ok(ticket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use taskgate_core::Role;

    fn resolver() -> StaticSubjectResolver {
        StaticSubjectResolver::new(&[SubjectConfig {
            id: "u1".into(),
            ticket: "dev-u1".into(),
            roles: [Role::User].into_iter().collect(),
            blocked_by: ["u3".to_string()].into_iter().collect(),
        }])
    }

    #[test]
    fn resolves_known_ticket() {
        let s = resolver().resolve("dev-u1").unwrap();
        assert_eq!(s.id, "u1");
        assert!(s.has_role(&Role::User));
        assert!(s.blocked_by.contains("u3"));
    }

    #[test]
    fn unknown_ticket_is_unauthenticated() {
        let err = resolver().resolve("nope").unwrap_err();
        assert!(matches!(err, TaskGateError::Unauthenticated));
    }

    #[test]
    fn bearer_parsing() {
        let mut h = HeaderMap::new();
        assert!(bearer_ticket(&h).is_err());
        h.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer dev-u1"));
        assert_eq!(bearer_ticket(&h).unwrap(), "dev-u1");
        h.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_ticket(&h).is_err());
        h.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(bearer_ticket(&h).is_err());
    }
}
