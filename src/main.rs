mod config;
mod db;
mod errors;
mod logging;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod utils;

#[cfg(test)]
mod test_support;

use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing::{info, warn};

use crate::config::Config;
use crate::services::UserService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    logging::init_logging(&config);

    if config.auth.uses_default_secret() {
        warn!("⚠️  JWT_SECRET not set, using the default secret. Change it in production!");
    }

    info!("🔌 Connecting to database...");
    let db = db::establish_connection(&config.database)
        .await
        .map_err(std::io::Error::other)?;
    info!("✅ Database connected!");

    db::setup_schema(&db).await.map_err(std::io::Error::other)?;

    match UserService::ensure_admin_exists(
        &db,
        &config.admin.username,
        &config.admin.password,
        config.auth.password_rounds,
    )
    .await
    {
        Ok(true) => warn!("⚠️  Default admin created, change its password!"),
        Ok(false) => {}
        Err(e) => warn!(error = %e, "Failed to ensure admin user exists"),
    }

    let db = web::Data::new(db);
    let auth_config = web::Data::new(config.auth.clone());
    let port = config.server.port;

    info!(mode = config.server.run_mode.as_str(), "🚀 Starting server on http://0.0.0.0:{}", port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(db.clone())
            .app_data(auth_config.clone())
            .configure(routes::configure_routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
