use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "COINSERIES_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the stderr subscriber. Filter directives come from `COINSERIES_LOG`.
///
/// A subscriber already installed in the process is left in place.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
