//! tracing subscriber setup

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "storefront=debug,storefront_core=debug,storefront_watch=debug,tower_http=debug";
const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber; `RUST_LOG` takes precedence
///
/// Logs go to stderr so `render` output on stdout stays clean.
pub fn init(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .try_init();
}
