use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sea_orm::DatabaseConnection;

use crate::errors::AppError;
use crate::services::AccountService;

pub const API_TOKEN_HEADER: &str = "X-API-Token";

/// Compte identifié par son token API, seule auth de l'ingestion
#[derive(Debug, Clone, Copy)]
pub struct ApiTokenAccount {
    pub account_id: i32,
    pub user_id: i32,
}

impl FromRequest for ApiTokenAccount {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get(API_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .filter(|value| !value.is_empty());
        let db = req.app_data::<web::Data<DatabaseConnection>>().cloned();

        Box::pin(async move {
            let token = token.ok_or_else(|| AppError::Unauthorized("API token required".to_string()))?;
            let db = db.ok_or_else(|| AppError::Internal("database connection missing".to_string()))?;

            let account = AccountService::find_by_api_token(&db, &token)
                .await?
                .ok_or_else(|| AppError::Unauthorized("Invalid API token".to_string()))?;

            Ok(ApiTokenAccount {
                account_id: account.id,
                user_id: account.user_id,
            })
        })
    }
}
