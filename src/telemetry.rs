use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Installs the global subscriber. `RUST_LOG` wins over `fallback`.
/// actix's `log` records are forwarded through the same subscriber.
pub fn initialize_telemetry(fallback: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    Registry::default()
        .with(tracing_subscriber::fmt::layer().with_target(true).with_filter(filter))
        .try_init()?;

    Ok(())
}
