/// Flag that lets a blocked command through anyway.
///
/// It is consumed by the guard and never forwarded to kubectl.
pub const OVERRIDE_FLAG: &str = "--force";

/// Check whether the override flag appears anywhere in `args`.
pub fn has_override<S: AsRef<str>>(args: &[S]) -> bool {
    args.iter().any(|a| a.as_ref() == OVERRIDE_FLAG)
}

/// Return `args` with every occurrence of the override flag removed,
/// keeping the remaining tokens in order.
pub fn strip_override<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    args.iter()
        .map(AsRef::as_ref)
        .filter(|a| *a != OVERRIDE_FLAG)
        .map(str::to_string)
        .collect()
}
