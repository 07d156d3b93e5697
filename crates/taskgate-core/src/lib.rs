//! taskgate core: the attribute-based access-control engine for tasks and
//! comments, plus the data model and error surface shared with the gateway.
//!
//! This crate carries no runtime, storage, or logging dependencies. Every
//! verdict comes from the rule table in [`policy::rules`], evaluated by
//! [`policy::evaluate`].
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Missing or malformed decision inputs fold into a deny verdict.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;
pub mod policy;

/// Shared result type.
pub use error::{Result, TaskGateError};
pub use model::{Action, Comment, Instance, ResourceKind, Role, Subject, Task};
pub use policy::{decide, evaluate, evaluate_tags, Decision};
