//! Running kubectl.
//!
//! All process spawning goes through [`CommandRunner`] so the guard can be
//! driven by a fake in tests. [`SystemRunner`] is the real implementation.

use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Env var that overrides the wrapped executable.
pub const KUBECTL_ENV_VAR: &str = "KUBECTL_GUARD_KUBECTL";

/// Output of a command run with captured streams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Capability to run the wrapped tool.
pub trait CommandRunner {
    /// Name of the wrapped executable, used in messages.
    fn program(&self) -> &str;

    /// Run with captured stdout/stderr.
    fn capture(&self, args: &[&str]) -> Result<Captured>;

    /// Run with inherited stdio and return the exit code.
    fn run(&self, args: &[String]) -> Result<i32>;
}

/// Runs the real kubectl binary found in `PATH`.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    program: String,
}

impl SystemRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `kubectl`, or `$KUBECTL_GUARD_KUBECTL` when set.
    pub fn from_env() -> Self {
        match std::env::var(KUBECTL_ENV_VAR) {
            Ok(p) if !p.is_empty() => Self::new(p),
            _ => Self::new("kubectl"),
        }
    }

    fn spawn_error(&self, source: std::io::Error) -> Error {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::KubectlNotFound {
                program: self.program.clone(),
            }
        } else {
            Error::Exec {
                program: self.program.clone(),
                source,
            }
        }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::from_env()
    }
}

impl CommandRunner for SystemRunner {
    fn program(&self) -> &str {
        &self.program
    }

    fn capture(&self, args: &[&str]) -> Result<Captured> {
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;
        Ok(Captured {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn run(&self, args: &[String]) -> Result<i32> {
        let status = Command::new(&self.program)
            .args(args)
            .status()
            .map_err(|e| self.spawn_error(e))?;
        // Killed by a signal: no code, report generic failure.
        Ok(status.code().unwrap_or(1))
    }
}

/// Resolve the active context with `kubectl config current-context`.
///
/// Fails when kubectl cannot run, exits non-zero, or prints nothing.
pub fn current_context(runner: &dyn CommandRunner) -> Result<String> {
    let out = runner
        .capture(&["config", "current-context"])
        .map_err(|e| Error::ContextLookup {
            reason: e.to_string(),
        })?;
    if !out.success {
        let stderr = out.stderr.trim();
        return Err(Error::ContextLookup {
            reason: if stderr.is_empty() {
                format!("{} exited with an error", runner.program())
            } else {
                stderr.to_string()
            },
        });
    }
    let ctx = out.stdout.trim();
    if ctx.is_empty() {
        return Err(Error::ContextLookup {
            reason: "no current context is set".into(),
        });
    }
    Ok(ctx.to_string())
}

/// Best-effort lookup of the namespace pinned in the current kubeconfig
/// context. Any failure is reported as `None`.
pub fn current_namespace(runner: &dyn CommandRunner) -> Option<String> {
    let args = ["config", "view", "--minify", "-o", "jsonpath={..namespace}"];
    let out = match runner.capture(&args) {
        Ok(out) => out,
        Err(e) => {
            log::debug!("namespace lookup failed: {e}");
            return None;
        }
    };
    if !out.success {
        log::debug!("namespace lookup exited with an error: {}", out.stderr.trim());
        return None;
    }
    let ns = out.stdout.trim();
    (!ns.is_empty()).then(|| ns.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        context: Result<Captured>,
        namespace: Option<Captured>,
    }

    impl CommandRunner for Scripted {
        fn program(&self) -> &str {
            "kubectl"
        }

        fn capture(&self, args: &[&str]) -> Result<Captured> {
            match args.get(1).copied() {
                Some("current-context") => match &self.context {
                    Ok(c) => Ok(c.clone()),
                    Err(_) => Err(Error::KubectlNotFound {
                        program: "kubectl".into(),
                    }),
                },
                Some("view") => self.namespace.clone().ok_or(Error::KubectlNotFound {
                    program: "kubectl".into(),
                }),
                _ => panic!("unexpected args {args:?}"),
            }
        }

        fn run(&self, _args: &[String]) -> Result<i32> {
            Ok(0)
        }
    }

    fn ok(stdout: &str) -> Captured {
        Captured {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    fn failed(stderr: &str) -> Captured {
        Captured {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    fn runner(context: Result<Captured>, namespace: Option<Captured>) -> Scripted {
        Scripted { context, namespace }
    }

    #[test]
    fn context_is_trimmed() {
        let r = runner(Ok(ok("prod\n")), None);
        assert_eq!(current_context(&r).unwrap(), "prod");
    }

    #[test]
    fn context_nonzero_exit_is_error() {
        let r = runner(Ok(failed("error: current-context is not set\n")), None);
        let err = current_context(&r).unwrap_err();
        assert!(
            err.to_string().contains("current-context is not set"),
            "got {err}"
        );
    }

    #[test]
    fn context_empty_output_is_error() {
        let r = runner(Ok(ok("  \n")), None);
        assert!(matches!(current_context(&r), Err(Error::ContextLookup { .. })));
    }

    #[test]
    fn context_spawn_failure_is_error() {
        let r = runner(
            Err(Error::KubectlNotFound {
                program: "kubectl".into(),
            }),
            None,
        );
        assert!(matches!(current_context(&r), Err(Error::ContextLookup { .. })));
    }

    #[test]
    fn namespace_from_kubeconfig() {
        let r = runner(Ok(ok("prod")), Some(ok("team-a\n")));
        assert_eq!(current_namespace(&r).as_deref(), Some("team-a"));
    }

    #[test]
    fn namespace_empty_output_is_none() {
        let r = runner(Ok(ok("prod")), Some(ok("")));
        assert_eq!(current_namespace(&r), None);
    }

    #[test]
    fn namespace_failure_is_none() {
        let r = runner(Ok(ok("prod")), Some(failed("boom")));
        assert_eq!(current_namespace(&r), None);
        let r = runner(Ok(ok("prod")), None);
        assert_eq!(current_namespace(&r), None);
    }

    #[test]
    fn missing_program_is_not_found() {
        let r = SystemRunner::new("kubectl-guard-test-no-such-binary");
        let err = r.run(&["version".to_string()]).unwrap_err();
        assert!(matches!(err, Error::KubectlNotFound { .. }), "got {err:?}");
    }

    #[test]
    fn program_from_env() {
        let saved = std::env::var_os(KUBECTL_ENV_VAR);
        // SAFETY: no other test reads KUBECTL_GUARD_KUBECTL.
        unsafe { std::env::set_var(KUBECTL_ENV_VAR, "/opt/bin/kubectl-1.30") };
        let custom = SystemRunner::from_env();
        unsafe { std::env::set_var(KUBECTL_ENV_VAR, "") };
        let empty = SystemRunner::from_env();
        unsafe { std::env::remove_var(KUBECTL_ENV_VAR) };
        let unset = SystemRunner::from_env();
        if let Some(v) = saved {
            unsafe { std::env::set_var(KUBECTL_ENV_VAR, v) };
        }

        assert_eq!(custom.program(), "/opt/bin/kubectl-1.30");
        assert_eq!(empty.program(), "kubectl");
        assert_eq!(unset.program(), "kubectl");
    }
}
