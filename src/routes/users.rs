use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use tracing::info;
use validator::Validate;

use crate::config::AuthConfig;
use crate::errors::AppError;
use crate::middleware::{AdminUser, AuthUser};
use crate::models::dto::{CreateUserRequest, UpdateUserRequest};
use crate::routes::invalid_id_config;
use crate::services::UserService;
use crate::utils::response::ApiResponse;

/// POST /api/users - Créer un utilisateur (admin)
#[post("")]
pub async fn create_user(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AuthConfig>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let user = UserService::create_user(
        &db,
        &body.username,
        &body.password,
        &body.role,
        config.password_rounds,
    )
    .await?;

    info!(user_id = user.id, role = %user.role, "User created");
    Ok(HttpResponse::Created().json(ApiResponse::success("User created successfully", user)))
}

/// GET /api/users - Lister les utilisateurs (admin)
#[get("")]
pub async fn list_users(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let users = UserService::list_all(&db).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Users retrieved successfully", users)))
}

/// GET /api/users/{id} - Profil d'un utilisateur (tout utilisateur connecté)
#[get("/{id}")]
pub async fn get_user(
    _user: AuthUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let user = UserService::get_by_id(&db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("User retrieved successfully", user)))
}

/// PUT /api/users/{id} - Mise à jour partielle (admin)
#[put("/{id}")]
pub async fn update_user(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AuthConfig>,
    path: web::Path<i32>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let changes = body.into_inner().normalized();
    changes.validate()?;

    let user = UserService::update_user(&db, path.into_inner(), changes, config.password_rounds).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("User updated successfully", user)))
}

/// DELETE /api/users/{id} - Soft delete (admin)
#[delete("/{id}")]
pub async fn delete_user(
    admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    UserService::delete_user(&db, id).await?;

    info!(user_id = id, deleted_by = admin.0.user_id, "User deleted");
    Ok(HttpResponse::Ok().json(ApiResponse::message("User deleted successfully")))
}

pub fn users_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .app_data(invalid_id_config("Invalid user ID"))
            .service(create_user)
            .service(list_users)
            .service(get_user)
            .service(update_user)
            .service(delete_user),
    );
}
