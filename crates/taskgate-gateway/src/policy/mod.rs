//! Gateway side of policy: wraps the pure engine with logging and metrics.

pub mod guard;

pub use guard::{Capabilities, Guard};
