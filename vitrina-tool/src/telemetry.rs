use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the stderr subscriber.
///
/// Priority: `RUST_LOG` env var > `log_level` argument.
pub fn init(log_level: &str) {
    let default_filter = format!(
        "warn,vitrina_relocation={level},vitrina_rest={level},vtr={level}",
        level = log_level
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .ok();
}
