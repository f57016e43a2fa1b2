use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Installs the global tracing subscriber for a host process.
///
/// `RUST_LOG` wins when set; otherwise the crate logs at `config.rust_log`.
/// A subscriber that is already installed is left in place.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("resume_editor={}", config.rust_log)));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if installed.is_ok() {
        tracing::info!("Resume editor v{} logging initialised", env!("CARGO_PKG_VERSION"));
    }
}
