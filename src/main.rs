//! kubectl-guard: kubectl plugin entry point.
//!
//! Installed on `PATH` as `kubectl-guard`, so kubectl exposes it as
//! `kubectl guard`.

fn main() {
    kubectl_guard::logging::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    std::process::exit(kubectl_guard::cli::run(&args));
}
