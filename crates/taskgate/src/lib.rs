//! Top-level facade crate for taskgate.
//!
//! Re-exports the policy core and the gateway library so users can depend on a single crate.

pub mod core {
    pub use taskgate_core::*;
}

pub mod gateway {
    pub use taskgate_gateway::*;
}
