//! taskgate gateway library entry.
//!
//! The HTTP caller around the policy core: resolves subjects, reads and
//! writes tasks and comments through a resource store, and consults the
//! guard before every action. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod context;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod router;
pub mod store;
