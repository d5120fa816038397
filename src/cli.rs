//! `kubectl guard` sub-command dispatch.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::eval::{Decision, Guard};
use crate::kubectl::{self, CommandRunner, SystemRunner};
use crate::logging;
use crate::parse::{self, OVERRIDE_FLAG};

pub const USAGE: &str = "\
kubectl-guard - Kubernetes context protection plugin

Usage:
  kubectl guard <command> [options]

Commands:
  guard <context> [--namespace=<ns>[,<ns>...]]  Protect a context
  unguard <context>                             Remove protection from a context
  list                                          List protected contexts and current status
  exec -- <kubectl args>                        Execute kubectl with protection check
  version                                       Print version

Examples:
  kubectl guard guard prod-cluster
  kubectl guard guard prod-cluster --namespace=production,payments
  kubectl guard unguard prod-cluster
  kubectl guard list
  kubectl guard exec -- delete pod nginx

Options:
  --force    Force execution on protected context
  --help     Show help

Environment:
  KUBECTL_GUARD_CONFIG   Config file (default ~/.kube/guard.toml)
  KUBECTL_GUARD_KUBECTL  kubectl executable (default kubectl)
  KUBECTL_GUARD_LOG      Diagnostics level (default warn)
";

/// Exit code for blocked commands and every failure.
pub const EXIT_FAILURE: i32 = 1;

/// Entry point used by the binary: real kubectl, default paths, process stdio.
pub fn run(args: &[String]) -> i32 {
    let runner = SystemRunner::from_env();
    let cli = Cli::new(&runner).with_decision_log(logging::decision_log_path());
    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();
    cli.run(args, &mut out, &mut err)
}

/// Sub-command dispatcher with injectable paths, runner and output streams.
pub struct Cli<'a> {
    runner: &'a dyn CommandRunner,
    config_path: Option<PathBuf>,
    decision_log: Option<PathBuf>,
}

impl<'a> Cli<'a> {
    /// Uses the default config path and writes no decision log.
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self {
            runner,
            config_path: None,
            decision_log: None,
        }
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_decision_log(mut self, path: Option<PathBuf>) -> Self {
        self.decision_log = path;
        self
    }

    fn config_path(&self) -> Result<PathBuf> {
        match &self.config_path {
            Some(p) => Ok(p.clone()),
            None => Config::path(),
        }
    }

    /// Run one invocation and return the process exit code.
    pub fn run(&self, args: &[String], out: &mut dyn Write, err: &mut dyn Write) -> i32 {
        match self.dispatch(args, out, err) {
            Ok(code) => code,
            Err(e) => {
                log::error!("output error: {e}");
                EXIT_FAILURE
            }
        }
    }

    fn dispatch(
        &self,
        args: &[String],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> io::Result<i32> {
        let Some(sub) = args.first() else {
            write!(out, "{USAGE}")?;
            return Ok(0);
        };
        match sub.as_str() {
            "--help" | "-h" | "help" => {
                write!(out, "{USAGE}")?;
                return Ok(0);
            }
            "version" | "--version" => {
                writeln!(out, "kubectl-guard {}", env!("CARGO_PKG_VERSION"))?;
                return Ok(0);
            }
            _ => {}
        }

        let path = match self.config_path() {
            Ok(p) => p,
            Err(e) => {
                writeln!(err, "failed to load config: {e}")?;
                return Ok(EXIT_FAILURE);
            }
        };
        let mut config = match Config::load_from(&path) {
            Ok(c) => c,
            Err(e) => {
                writeln!(err, "failed to load config: {e}")?;
                return Ok(EXIT_FAILURE);
            }
        };

        let rest = &args[1..];
        match sub.as_str() {
            "guard" => self.guard(&mut config, &path, rest, out, err),
            "unguard" => self.unguard(&mut config, &path, rest, out, err),
            "list" => self.list(&config, out),
            "exec" => self.exec(&config, rest, err),
            other => {
                writeln!(err, "unknown command: {other}")?;
                write!(out, "{USAGE}")?;
                Ok(EXIT_FAILURE)
            }
        }
    }

    fn guard(
        &self,
        config: &mut Config,
        path: &Path,
        args: &[String],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> io::Result<i32> {
        let Some((context, namespaces)) = parse_guard_args(args) else {
            writeln!(err, "context name is required")?;
            return Ok(EXIT_FAILURE);
        };

        config.add_context(&context, namespaces.clone());
        if let Err(e) = config.save_to(path) {
            writeln!(err, "failed to save config: {e}")?;
            return Ok(EXIT_FAILURE);
        }
        log::info!("guarded {context} in {}", path.display());

        if namespaces.is_empty() {
            writeln!(out, "guarded {context} (all namespaces)")?;
        } else {
            writeln!(out, "guarded {context} (namespaces: {})", namespaces.join(", "))?;
        }
        Ok(0)
    }

    fn unguard(
        &self,
        config: &mut Config,
        path: &Path,
        args: &[String],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> io::Result<i32> {
        let Some(context) = args.first() else {
            writeln!(err, "context name is required")?;
            return Ok(EXIT_FAILURE);
        };

        if !config.remove_context(context) {
            writeln!(err, "{context} is not guarded")?;
            return Ok(EXIT_FAILURE);
        }
        if let Err(e) = config.save_to(path) {
            writeln!(err, "failed to save config: {e}")?;
            return Ok(EXIT_FAILURE);
        }
        log::info!("unguarded {context} in {}", path.display());

        writeln!(out, "unguarded {context}")?;
        Ok(0)
    }

    fn list(&self, config: &Config, out: &mut dyn Write) -> io::Result<i32> {
        let current = match kubectl::current_context(self.runner) {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                log::debug!("list: {e}");
                None
            }
        };

        if config.guarded_contexts.is_empty() {
            writeln!(out, "no guarded contexts")?;
        } else {
            writeln!(out, "guarded contexts:")?;
            for gc in &config.guarded_contexts {
                let marker = if current.as_deref() == Some(gc.name.as_str()) {
                    "*"
                } else {
                    " "
                };
                if gc.covers_all_namespaces() {
                    writeln!(out, " {marker} {} (all namespaces)", gc.name)?;
                } else {
                    writeln!(
                        out,
                        " {marker} {} (namespaces: {})",
                        gc.name,
                        gc.namespaces.join(", ")
                    )?;
                }
            }
        }

        writeln!(out)?;
        if let Some(ctx) = current {
            let status = if config.is_guarded(&ctx) {
                "guarded"
            } else {
                "not guarded"
            };
            writeln!(out, "current: {ctx} ({status})")?;
        }
        Ok(0)
    }

    fn exec(&self, config: &Config, args: &[String], err: &mut dyn Write) -> io::Result<i32> {
        let args = match args.first() {
            Some(first) if first == "--" => &args[1..],
            _ => args,
        };
        if args.is_empty() {
            writeln!(err, "kubectl command is required")?;
            return Ok(EXIT_FAILURE);
        }

        let forced = parse::has_override(args);
        let forwarded = parse::strip_override(args);

        let result = match Guard::new(config, self.runner).check(forwarded.as_slice()) {
            Ok(r) => r,
            Err(e) => {
                writeln!(err, "check failed: {e}")?;
                return Ok(EXIT_FAILURE);
            }
        };

        let decision = Decision::for_result(&result, forced);
        if let Some(path) = &self.decision_log {
            logging::log_decision_to(path, &forwarded, &result, decision);
        }

        match decision {
            Decision::Block => {
                if let Some(msg) = &result.message {
                    writeln!(err, "{msg}")?;
                }
                return Ok(EXIT_FAILURE);
            }
            Decision::Force => {
                log::info!(
                    "forcing {} on guarded context {} namespace {}",
                    result.command,
                    result.context,
                    result.namespace
                );
                writeln!(
                    err,
                    "executing {} on {} with {OVERRIDE_FLAG}",
                    result.command, result.context
                )?;
            }
            Decision::Allow => {}
        }

        match self.runner.run(&forwarded) {
            Ok(code) => Ok(code),
            Err(e) => {
                writeln!(err, "{e}")?;
                Ok(EXIT_FAILURE)
            }
        }
    }
}

/// Parse `guard` arguments: the first positional is the context, namespace
/// flags take a comma-separated list. Returns `None` without a context.
fn parse_guard_args(args: &[String]) -> Option<(String, Vec<String>)> {
    let mut context = None;
    let mut namespaces = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let list = if arg == "-n" || arg == "--namespace" {
            iter.next().map(String::as_str)
        } else if let Some(v) = arg
            .strip_prefix("--namespace=")
            .or_else(|| arg.strip_prefix("-n="))
        {
            Some(v)
        } else {
            if context.is_none() && !arg.starts_with('-') {
                context = Some(arg.clone());
            }
            continue;
        };
        if let Some(list) = list {
            namespaces = split_namespaces(list);
        }
    }
    context.map(|c| (c, namespaces))
}

fn split_namespaces(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
