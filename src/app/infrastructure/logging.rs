use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str = "rich_notes=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the stderr subscriber. `RUST_LOG` overrides the default filter.
/// Returns `false` if a subscriber was already installed.
pub fn init() -> bool {
    let subscriber = tracing_subscriber::registry().with(env_filter()).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(true),
    );

    if subscriber.try_init().is_err() {
        return false;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    tracing::debug!("tracing initialized");
    true
}
