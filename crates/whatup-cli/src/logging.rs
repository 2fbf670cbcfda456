//! Logging setup
//!
//! All diagnostics go to stderr so stdout only carries results.

use tracing_subscriber::EnvFilter;

/// Filter used with `--debug`: verbose for whatup, quiet for dependencies
const DEBUG_DIRECTIVES: &str = "warn,whatup=debug,whatup_core=debug,whatup_repo=debug,whatup_kube=debug";

/// Filter used otherwise, unless `RUST_LOG` is set
const DEFAULT_DIRECTIVES: &str = "warn";

fn filter(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new(DEBUG_DIRECTIVES);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(debug: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(debug))
        .with_writer(std::io::stderr)
        .with_ansi(console::colors_enabled_stderr())
        .with_target(debug)
        .without_time()
        .try_init();
}
