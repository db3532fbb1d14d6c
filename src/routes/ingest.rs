use actix_web::{post, web, HttpResponse};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tracing::debug;
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::ApiTokenAccount;
use crate::models::dto::IngestStatisticRequest;
use crate::services::StatisticService;
use crate::utils::response::ApiResponse;

/// POST /api/ingest/statistics - Envoi d'un snapshot par le client de trading (X-API-Token)
#[post("/statistics")]
pub async fn ingest_statistic(
    account: ApiTokenAccount,
    db: web::Data<DatabaseConnection>,
    body: Result<web::Json<IngestStatisticRequest>, actix_web::Error>,
) -> Result<HttpResponse, actix_web::Error> {
    // Le corps n'est évalué qu'une fois le token validé
    let body = body?;
    body.validate().map_err(AppError::from)?;

    let timestamp = DateTime::parse_from_rfc3339(&body.timestamp)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| {
            AppError::InvalidInput(
                "Invalid timestamp format, use RFC3339 (e.g., 2024-01-15T10:30:00Z)".to_string(),
            )
        })?;

    let statistic = StatisticService::create_statistic(
        &db,
        account.account_id,
        timestamp,
        body.daily_profit_loss,
        body.total_trades_today,
        body.total_balance,
    )
    .await?;

    debug!(account_id = account.account_id, statistic_id = statistic.id, "Statistic ingested");
    Ok(HttpResponse::Created().json(ApiResponse::success("Statistic ingested successfully", statistic)))
}

pub fn ingest_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/ingest").service(ingest_statistic));
}
