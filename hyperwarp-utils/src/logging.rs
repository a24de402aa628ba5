use tracing::Level;
use tracing_subscriber::fmt::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Environment variable for the log level of the workspace crates.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Parse [LOG_LEVEL_ENV] to a [tracing::Level], falling back to `INFO`.
pub fn log_level() -> Level {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|s| parse_level(&s))
        .unwrap_or(Level::INFO)
}

fn parse_level(value: &str) -> Option<Level> {
    value.trim().to_uppercase().parse::<Level>().ok()
}

/// Default filter directives used when `RUST_LOG` is not set.
pub fn default_directives(service_name: &str, level: Level) -> String {
    let target = service_name.replace('-', "_");
    format!(
        "info,{}={},hyperwarp_utils={},hyperwarp_solana={},hyperwarp_rollup={},hyperwarp_sdk={},hyper=info,reqwest=info,h2=off",
        target, level, level, level, level, level
    )
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set, otherwise [default_directives] is used with the
/// level from [LOG_LEVEL_ENV]. Logs go to stderr so command output on stdout
/// stays clean.
pub fn init_from_env(service_name: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(service_name, log_level())));

    let subscriber = Registry::default()
        .with(filter)
        .with(Layer::default().with_writer(std::io::stderr));

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global default subscriber: {}", e))
}
