use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Initialise le subscriber tracing.
/// Priorité du filtre : RUST_LOG, puis LOG_LEVEL, puis le mode d'exécution.
/// Les logs `log` d'actix (middleware Logger) sont redirigés via tracing-log.
pub fn init_logging(config: &Config) {
    let level = config
        .log_level
        .clone()
        .unwrap_or_else(|| config.server.run_mode.default_log_level().to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "xtrack_backend={level},actix_web={level},sea_orm=warn,sqlx=warn"
        ))
    });

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();

    if let Err(e) = result {
        eprintln!("⚠️  Failed to initialise logging: {}", e);
    }
}
