//! Destructive kubectl subcommands.
//!
//! Anything that deletes, applies, patches, rescales or relabels resources,
//! or changes node schedulability. Read-only verbs (`get`, `describe`,
//! `logs`, `top`) and interactive ones (`exec`, `port-forward`) are not listed.

/// kubectl subcommands that modify or delete resources.
pub const DESTRUCTIVE_COMMANDS: &[&str] = &[
    "delete", "apply", "patch", "replace", "scale", "rollout", "drain", "cordon", "uncordon",
    "taint", "label", "annotate", "edit", "set",
];

/// Exact, case-sensitive membership test against [`DESTRUCTIVE_COMMANDS`].
pub fn is_destructive(command: &str) -> bool {
    DESTRUCTIVE_COMMANDS.contains(&command)
}
