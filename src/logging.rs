use std::io::Write;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

use crate::eval::{CheckResult, Decision};

/// Env var selecting the diagnostics level (`off`, `error`, `warn`, `info`,
/// `debug`, `trace`).
pub const LOG_LEVEL_ENV_VAR: &str = "KUBECTL_GUARD_LOG";

/// Install the stderr logger. Level comes from `$KUBECTL_GUARD_LOG`,
/// defaulting to `warn`. Calling it twice is harmless.
pub fn init() {
    let level = std::env::var(LOG_LEVEL_ENV_VAR)
        .ok()
        .and_then(|v| parse_level(&v))
        .unwrap_or(LevelFilter::Warn);
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    value.trim().parse().ok()
}

/// Default decision log: `~/.local/share/kubectl-guard/decisions.log`.
pub fn decision_log_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(Path::new(&home).join(".local/share/kubectl-guard/decisions.log"))
}

/// Append a decision record to `path`.
/// Best-effort: failures are ignored and never change the outcome.
pub fn log_decision_to(path: &Path, args: &[String], result: &CheckResult, decision: Decision) {
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
    else {
        log::debug!("cannot open decision log {}", path.display());
        return;
    };

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let _ = writeln!(file, "{}", format_record(now, args, result, decision));
}

/// One tab-separated record: UTC time, decision, context, namespace and the
/// shell-quoted argument vector (truncated to 200 chars).
fn format_record(
    epoch_secs: u64,
    args: &[String],
    result: &CheckResult,
    decision: Decision,
) -> String {
    let (year, month, day) = epoch_days_to_date(epoch_secs / 86400);
    let tod = epoch_secs % 86400;
    let joined = shlex::try_join(args.iter().map(String::as_str))
        .unwrap_or_else(|_| args.join(" "));
    let cmd: String = joined.chars().take(200).collect();
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}Z\t{}\t{}\t{}\t{cmd}",
        tod / 3600,
        (tod % 3600) / 60,
        tod % 60,
        decision.as_str(),
        result.context,
        result.namespace,
    )
}

/// Convert days since Unix epoch to (year, month, day).
fn epoch_days_to_date(days: u64) -> (u64, u64, u64) {
    // Civil calendar from days algorithm (Howard Hinnant)
    let z = days + 719468;
    let era = z / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}
