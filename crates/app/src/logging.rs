use tracing_subscriber::EnvFilter;

fn default_directives() -> &'static str {
    if cfg!(debug_assertions) {
        "debug,sqlx=warn"
    } else {
        "info,sqlx=warn"
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the defaults.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
}
