use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "info";

/// Installs the global tracing subscriber. RUST_LOG takes precedence over
/// `level`; an empty `level` means [`DEFAULT_FILTER`].
pub fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for(level));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    // Somebody (a test harness, say) may have beaten us to it
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}

/// Filter for a configured level, falling back to the default when the
/// directive is empty or malformed.
pub fn filter_for(level: &str) -> EnvFilter {
    if level.trim().is_empty() {
        return EnvFilter::new(DEFAULT_FILTER);
    }
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
