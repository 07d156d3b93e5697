//! Request context: who is acting.
//!
//! The gateway never decides roles or blocking itself; a `SubjectResolver`
//! hands over a finished `Subject` and the policy layer consumes it as-is.

pub mod subject;

pub use subject::{bearer_ticket, StaticSubjectResolver, SubjectResolver};
