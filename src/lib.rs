pub mod config;
pub mod core_state;
pub mod db;
pub mod growth; // Infant growth percentiles
pub mod learning; // Practice pattern learning and suggestions
pub mod models;
pub mod pregnancy; // Pregnancy calendar
pub mod vitals; // Prenatal vital alerts

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `config::default_log_filter()`. Calling this twice
/// is harmless: the second install is ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();

    tracing::info!("{} core v{}", config::APP_NAME, config::APP_VERSION);
}
