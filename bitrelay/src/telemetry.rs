use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber. `level` is an `EnvFilter` directive such as
/// `info` or `bitrelay=debug,info`.
pub fn init(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
