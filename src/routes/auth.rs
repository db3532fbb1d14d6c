use actix_web::{post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use tracing::info;
use validator::Validate;

use crate::config::AuthConfig;
use crate::errors::AppError;
use crate::models::dto::{LoginRequest, LoginResponse, UserInfo};
use crate::services::UserService;
use crate::utils::jwt;
use crate::utils::response::ApiResponse;

/// POST /api/auth/login - Connexion, renvoie un JWT de session
#[post("/login")]
pub async fn login(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AuthConfig>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let user = UserService::authenticate(&db, &body.username, &body.password).await?;
    let token = jwt::generate_token(
        user.id,
        &user.username,
        user.role(),
        &config.jwt_secret,
        config.jwt_expiration_hours,
    )?;

    info!(user_id = user.id, "User logged in");

    let response = LoginResponse {
        token,
        user: UserInfo::from(&user),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success("Login successful", response)))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").service(login));
}
