use crate::parse::OVERRIDE_FLAG;

/// Outcome of [`Guard::check`](super::Guard::check).
///
/// `blocked` always reflects the real protection state; an override flag on
/// the command line never clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub blocked: bool,
    pub context: String,
    pub namespace: String,
    pub command: String,
    /// Explanation, present only when blocked.
    pub message: Option<String>,
}

/// What the caller does with a [`CheckResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Decision {
    /// Not blocked; run silently.
    Allow,
    /// Blocked, but the override flag was given; run with a notice.
    Force,
    /// Blocked; do not run.
    Block,
}

impl Decision {
    pub fn for_result(result: &CheckResult, override_present: bool) -> Self {
        match (result.blocked, override_present) {
            (false, _) => Decision::Allow,
            (true, true) => Decision::Force,
            (true, false) => Decision::Block,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Force => "force",
            Decision::Block => "block",
        }
    }
}

/// Render the message shown when a command is blocked.
pub fn format_block_message(context: &str, namespace: &str, command: &str) -> String {
    format!(
        "blocked\n  \
         context: {context}\n  \
         namespace: {namespace}\n  \
         command: {command}\n\
         \n\
         This context is guarded.\n\
         Use {OVERRIDE_FLAG} flag to execute, or run `kubectl guard unguard {context}` to remove protection."
    )
}
