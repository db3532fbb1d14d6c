use actix_web::{get, HttpResponse};

use crate::models::health::HealthResponse;

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        message: "X-Track API is running".to_string(),
    };

    HttpResponse::Ok().json(response)
}
