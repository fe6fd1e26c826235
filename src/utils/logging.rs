//! Logging initialization

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber. `RUST_LOG` overrides the
/// default filter; `verbose` drops the crate to debug level so the
/// rule-by-rule trace of the policy engine becomes visible.
pub fn init(verbose: bool) {
    let default_filter = if verbose { "tvnorm=debug" } else { "tvnorm=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
