pub mod accounts;
pub mod auth;
pub mod health;
pub mod ingest;
pub mod statistics;
pub mod users;

use actix_web::{error, web};

use crate::errors::AppError;

/// Un segment `{id}` non numérique répond 400 avec le message donné
pub fn invalid_id_config(message: &'static str) -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(move |_, _| AppError::InvalidInput(message.to_string()).into())
}

// Corps / query illisibles : même enveloppe JSON que les autres erreurs
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _| {
        AppError::InvalidInput(format!("Invalid request: {}", err)).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _| {
        AppError::InvalidInput(format!("Invalid query parameters: {}", err)).into()
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(health::health_check)
        .service(
            web::scope("/api")
                .service(health::health_check)
                .configure(auth::auth_routes)
                .configure(ingest::ingest_routes)
                .configure(users::users_routes)
                .configure(accounts::accounts_routes)
                .configure(statistics::statistics_routes),
        );
}
