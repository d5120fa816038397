//! kubectl-guard: a kubectl plugin that blocks destructive commands against
//! protected contexts.
//!
//! Before a kubectl invocation runs, the guard resolves the active context and
//! target namespace, classifies the primary command, and blocks it when all
//! three line up with the protection list: the context is guarded, the
//! namespace is guarded under it, and the command is destructive. A `--force`
//! flag lets a blocked command through with a notice; the flag itself is
//! stripped before kubectl sees the arguments.
//!
//! # Architecture
//!
//! - **[`parse`]** — Argument interpretation: namespace and primary command extraction, override flag.
//! - **[`commands`]** — Destructive command classification.
//! - **[`config`]** — Protection list: lookup, add/remove, TOML persistence.
//! - **[`kubectl`]** — Process runner abstraction and context/namespace resolvers.
//! - **[`eval`]** — Guard engine and decision types.
//! - **[`cli`]** — `guard`, `unguard`, `list`, `exec` sub-commands.
//! - **[`logging`]** — stderr diagnostics and the decision log at `~/.local/share/kubectl-guard/decisions.log`.

/// `kubectl guard` sub-command dispatch.
pub mod cli;
/// Destructive command table.
pub mod commands;
/// Protection list types, lookup and persistence.
pub mod config;
/// Crate error type.
pub mod error;
/// Guard engine: check, decision record, block message.
pub mod eval;
/// kubectl process runner and resolvers.
pub mod kubectl;
/// Diagnostics logger setup and file-based decision logging.
pub mod logging;
/// Argument vector interpretation.
pub mod parse;

pub use commands::is_destructive;
pub use config::{Config, GuardedContext};
pub use error::{Error, Result};
pub use eval::{CheckResult, Decision, Guard};
pub use kubectl::{Captured, CommandRunner, SystemRunner};
pub use parse::{extract_namespace, extract_primary_command, has_override, strip_override};
