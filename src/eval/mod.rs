pub mod decision;

pub use decision::{CheckResult, Decision, format_block_message};

use crate::commands::is_destructive;
use crate::config::Config;
use crate::error::Result;
use crate::kubectl::{self, CommandRunner};
use crate::parse;

/// Namespace assumed when neither the command line nor kubeconfig names one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Decides whether a kubectl invocation is blocked.
pub struct Guard<'a> {
    config: &'a Config,
    runner: &'a dyn CommandRunner,
}

impl<'a> Guard<'a> {
    pub fn new(config: &'a Config, runner: &'a dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    /// Check a kubectl argument vector (without the leading `kubectl`).
    ///
    /// Resolution order:
    /// 1. Current context from kubectl. Failure aborts the check.
    /// 2. Namespace from `-n`/`--namespace`, else the kubeconfig namespace,
    ///    else `default`.
    /// 3. Primary command from the argument vector.
    ///
    /// Blocked iff the context is guarded, the namespace is guarded under it,
    /// and the command is destructive, checked in that order.
    pub fn check<S: AsRef<str>>(&self, args: &[S]) -> Result<CheckResult> {
        let context = kubectl::current_context(self.runner)?;

        let mut namespace = parse::extract_namespace(args);
        if namespace.is_empty() {
            namespace = kubectl::current_namespace(self.runner)
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        }

        let command = parse::extract_primary_command(args);

        let blocked = self.config.is_guarded(&context)
            && self.config.is_namespace_guarded(&context, &namespace)
            && is_destructive(&command);

        log::debug!(
            "check: context={context} namespace={namespace} command={command} blocked={blocked}"
        );

        let message = blocked.then(|| format_block_message(&context, &namespace, &command));
        Ok(CheckResult {
            blocked,
            context,
            namespace,
            command,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::config::GuardedContext;
    use crate::error::Error;
    use crate::kubectl::Captured;

    /// Answers the two lookups from fixed values and records every call.
    struct FakeKubectl {
        context: Option<&'static str>,
        namespace: Option<&'static str>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeKubectl {
        fn new(context: Option<&'static str>, namespace: Option<&'static str>) -> Self {
            Self {
                context,
                namespace,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn namespace_lookups(&self) -> usize {
            self.calls.borrow().iter().filter(|c| c.contains("view")).count()
        }
    }

    impl CommandRunner for FakeKubectl {
        fn program(&self) -> &str {
            "kubectl"
        }

        fn capture(&self, args: &[&str]) -> Result<Captured> {
            self.calls.borrow_mut().push(args.join(" "));
            let value = if args.contains(&"current-context") {
                self.context
            } else {
                self.namespace
            };
            Ok(Captured {
                success: value.is_some(),
                stdout: value.unwrap_or_default().to_string(),
                stderr: String::new(),
            })
        }

        fn run(&self, _args: &[String]) -> Result<i32> {
            Ok(0)
        }
    }

    fn config() -> Config {
        Config {
            guarded_contexts: vec![
                GuardedContext::new("prod", vec![]),
                GuardedContext::new("staging", vec!["critical".into()]),
            ],
        }
    }

    fn check(context: &'static str, args: &[&str]) -> CheckResult {
        let cfg = config();
        let fake = FakeKubectl::new(Some(context), None);
        Guard::new(&cfg, &fake).check(args).unwrap()
    }

    #[test]
    fn blocks_destructive_on_guarded_context() {
        let r = check("prod", &["delete", "pod", "nginx"]);
        assert!(r.blocked);
        assert_eq!(r.context, "prod");
        assert_eq!(r.namespace, "default");
        assert_eq!(r.command, "delete");
        let msg = r.message.unwrap();
        assert!(msg.contains("context: prod"));
        assert!(msg.contains("namespace: default"));
        assert!(msg.contains("command: delete"));
    }

    #[test]
    fn allows_read_only_on_guarded_context() {
        let r = check("prod", &["get", "pod", "nginx"]);
        assert!(!r.blocked);
        assert!(r.message.is_none());
    }

    #[test]
    fn allows_destructive_on_unguarded_context() {
        let r = check("dev", &["delete", "pod", "nginx"]);
        assert!(!r.blocked);
        assert_eq!(r.context, "dev");
    }

    #[test]
    fn allows_unlisted_namespace() {
        let r = check("staging", &["delete", "pod", "-n", "other"]);
        assert!(!r.blocked);
        assert_eq!(r.namespace, "other");
    }

    #[test]
    fn blocks_listed_namespace() {
        let r = check("staging", &["delete", "pod", "--namespace=critical"]);
        assert!(r.blocked);
        assert_eq!(r.namespace, "critical");
    }

    #[test]
    fn kubeconfig_namespace_used_when_flag_absent() {
        let cfg = config();
        let fake = FakeKubectl::new(Some("staging"), Some("critical\n"));
        let r = Guard::new(&cfg, &fake).check(&["apply", "-f", "x.yaml"]).unwrap();
        assert!(r.blocked);
        assert_eq!(r.namespace, "critical");
    }

    #[test]
    fn flag_namespace_skips_kubeconfig_lookup() {
        let cfg = config();
        let fake = FakeKubectl::new(Some("staging"), Some("critical"));
        let r = Guard::new(&cfg, &fake)
            .check(&["delete", "-n", "other", "pod"])
            .unwrap();
        assert!(!r.blocked);
        assert_eq!(fake.namespace_lookups(), 0);
    }

    #[test]
    fn failed_namespace_lookup_defaults() {
        let cfg = config();
        let fake = FakeKubectl::new(Some("prod"), None);
        let r = Guard::new(&cfg, &fake).check(&["scale", "deploy/web"]).unwrap();
        assert_eq!(r.namespace, DEFAULT_NAMESPACE);
        assert_eq!(fake.namespace_lookups(), 1);
    }

    #[test]
    fn failed_context_lookup_is_error() {
        let cfg = config();
        let fake = FakeKubectl::new(None, Some("default"));
        let err = Guard::new(&cfg, &fake)
            .check(&["delete", "pod", "nginx"])
            .unwrap_err();
        assert!(matches!(err, Error::ContextLookup { .. }), "got {err:?}");
    }

    #[test]
    fn flags_before_command() {
        let r = check("prod", &["-n", "web", "--context", "prod", "drain", "node-1"]);
        assert!(r.blocked);
        assert_eq!(r.command, "drain");
        assert_eq!(r.namespace, "web");
    }

    #[test]
    fn flags_only_is_not_blocked() {
        let r = check("prod", &["--kubeconfig", "/tmp/kc"]);
        assert!(!r.blocked);
        assert_eq!(r.command, "");
    }
}
