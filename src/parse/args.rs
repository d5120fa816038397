/// Flags that consume the following token as their value.
///
/// Only the space-separated form matters here: `--output=json` is a single
/// token and never swallows its neighbour.
pub const FLAGS_WITH_VALUE: &[&str] = &[
    "-n",
    "--namespace",
    "-l",
    "--selector",
    "-f",
    "--filename",
    "-o",
    "--output",
    "-c",
    "--container",
    "--context",
    "--kubeconfig",
    "--cluster",
    "--user",
];

/// Check whether a flag takes its value from the next token.
pub fn takes_value(flag: &str) -> bool {
    FLAGS_WITH_VALUE.contains(&flag)
}

/// Extract the namespace given on the command line.
///
/// Recognises `-n X`, `--namespace X`, `-n=X` and `--namespace=X`; the first
/// occurrence wins. Returns an empty string when no namespace flag is present
/// or when a trailing `-n` has no value.
pub fn extract_namespace<S: AsRef<str>>(args: &[S]) -> String {
    let mut iter = args.iter().map(AsRef::as_ref);
    while let Some(arg) = iter.next() {
        if arg == "-n" || arg == "--namespace" {
            return iter.next().map(str::to_string).unwrap_or_default();
        }
        if let Some(ns) = arg
            .strip_prefix("-n=")
            .or_else(|| arg.strip_prefix("--namespace="))
        {
            return ns.to_string();
        }
    }
    String::new()
}

/// Extract the primary kubectl command (e.g. `delete` in
/// `kubectl -n prod delete pod nginx`).
///
/// Flags are skipped, together with the value of any flag listed in
/// [`FLAGS_WITH_VALUE`]. Returns an empty string for flag-only input.
pub fn extract_primary_command<S: AsRef<str>>(args: &[S]) -> String {
    let mut iter = args.iter().map(AsRef::as_ref);
    while let Some(arg) = iter.next() {
        if arg.starts_with('-') {
            if takes_value(arg) {
                iter.next();
            }
            continue;
        }
        return arg.to_string();
    }
    String::new()
}
