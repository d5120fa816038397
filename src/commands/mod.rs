//! Command classification: which kubectl verbs mutate cluster state.
//!
//! The classification is a fixed table compiled into the binary; the config
//! file cannot change it.

/// kubectl destructive-verb table.
pub mod kubectl;

pub use kubectl::{DESTRUCTIVE_COMMANDS, is_destructive};
