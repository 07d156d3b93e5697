//! Policy layer: rule table, evaluation, and the derived permission matrix.
//!
//! Decisions are pure functions of `(subject, resource kind, action,
//! instance)`. Nothing here logs, caches, or touches storage; callers that
//! want an audit trail wrap [`decide`] themselves.

pub mod engine;
pub mod matrix;
pub mod rules;

pub use engine::{decide, evaluate, evaluate_tags, Decision};
pub use matrix::{permission_matrix, MatrixEntry};
pub use rules::{Condition, Grant, Rule, RULES};
