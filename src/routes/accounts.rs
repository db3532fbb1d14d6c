use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use tracing::info;
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::{AdminUser, AuthUser};
use crate::models::dto::{CreateAccountRequest, UpdateAccountRequest};
use crate::routes::invalid_id_config;
use crate::services::AccountService;
use crate::utils::response::ApiResponse;

/// POST /api/accounts - Créer un compte (pour soi-même, ou n'importe qui si admin)
#[post("")]
pub async fn create_account(
    user: AuthUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateAccountRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    if !user.is_admin() && body.user_id != user.user_id {
        return Err(AppError::Forbidden(
            "You can only create accounts for yourself".to_string(),
        ));
    }

    let account = AccountService::create_account(&db, body.user_id, &body.name).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Account created successfully", account)))
}

/// GET /api/accounts - Tous les comptes avec leur propriétaire (admin)
#[get("")]
pub async fn list_accounts(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let accounts = AccountService::get_all(&db).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Accounts retrieved successfully", accounts)))
}

/// GET /api/accounts/me - Comptes de l'utilisateur connecté
#[get("/me")]
pub async fn my_accounts(
    user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let accounts = AccountService::get_by_user_id(&db, user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Accounts retrieved successfully", accounts)))
}

#[get("/{id}")]
pub async fn get_account(
    user: AuthUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let account = AccountService::get_by_id_with_owner(&db, path.into_inner()).await?;
    user.ensure_can_access(account.account.user_id)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Account retrieved successfully", account)))
}

#[put("/{id}")]
pub async fn update_account(
    user: AuthUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<UpdateAccountRequest>,
) -> Result<HttpResponse, AppError> {
    let account = AccountService::get_by_id(&db, path.into_inner()).await?;
    user.ensure_can_access(account.user_id)?;
    body.validate()?;

    let account = AccountService::update_account(&db, account.id, &body.name).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Account updated successfully", account)))
}

#[delete("/{id}")]
pub async fn delete_account(
    user: AuthUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let account = AccountService::get_by_id(&db, path.into_inner()).await?;
    user.ensure_can_access(account.user_id)?;

    AccountService::delete(&db, account.id).await?;
    info!(account_id = account.id, user_id = user.user_id, "Account deleted");
    Ok(HttpResponse::Ok().json(ApiResponse::message("Account deleted successfully")))
}

/// POST /api/accounts/{id}/regenerate-token - L'ancien token devient invalide
#[post("/{id}/regenerate-token")]
pub async fn regenerate_token(
    user: AuthUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let account = AccountService::get_by_id(&db, path.into_inner()).await?;
    user.ensure_can_access(account.user_id)?;

    let account = AccountService::regenerate_token(&db, account.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Token regenerated successfully", account)))
}

pub fn accounts_routes(cfg: &mut web::ServiceConfig) {
    // /me avant /{id}
    cfg.service(
        web::scope("/accounts")
            .app_data(invalid_id_config("Invalid account ID"))
            .service(create_account)
            .service(list_accounts)
            .service(my_accounts)
            .service(get_account)
            .service(update_account)
            .service(delete_account)
            .service(regenerate_token),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::json;

    use crate::services::AccountService;
    use crate::test_support::{bearer, create_user, setup_db, test_app};

    #[actix_web::test]
    async fn test_create_account_for_self_only() {
        let db = setup_db().await;
        let alice = create_user(&db, "alice", "user").await;
        let bob = create_user(&db, "bob", "user").await;
        let admin = create_user(&db, "root", "admin").await;
        let app = test_app!(db);

        let req = test::TestRequest::post()
            .uri("/api/accounts")
            .insert_header(bearer(&alice))
            .set_json(json!({"user_id": bob.id, "name": "Stolen"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/api/accounts")
            .insert_header(bearer(&alice))
            .set_json(json!({"user_id": alice.id, "name": "Main"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["name"], "Main");
        assert_eq!(body["data"]["api_token"].as_str().map(str::len), Some(64));

        let req = test::TestRequest::post()
            .uri("/api/accounts")
            .insert_header(bearer(&admin))
            .set_json(json!({"user_id": bob.id, "name": "Managed"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/accounts")
            .insert_header(bearer(&admin))
            .set_json(json!({"user_id": 9999, "name": "Ghost"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_non_owner_cannot_read_account() {
        let db = setup_db().await;
        let alice = create_user(&db, "alice", "user").await;
        let mallory = create_user(&db, "mallory", "user").await;
        let admin = create_user(&db, "root", "admin").await;
        let account = AccountService::create_account(&db, alice.id, "Main").await.unwrap();
        let app = test_app!(db);

        let uri = format!("/api/accounts/{}", account.id);
        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(&mallory))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body.get("data").is_none());

        for method in [test::TestRequest::put(), test::TestRequest::delete()] {
            let req = method
                .uri(&uri)
                .insert_header(bearer(&mallory))
                .set_json(json!({"name": "Hijacked"}))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
        }

        let req = test::TestRequest::get()
            .uri("/api/accounts/9999")
            .insert_header(bearer(&mallory))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        // L'admin voit le compte et son propriétaire
        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(&admin))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["user"]["username"], "alice");
        assert!(body["data"]["user"].get("password_hash").is_none());
    }

    #[actix_web::test]
    async fn test_my_accounts_update_and_delete() {
        let db = setup_db().await;
        let alice = create_user(&db, "alice", "user").await;
        let bob = create_user(&db, "bob", "user").await;
        let account = AccountService::create_account(&db, alice.id, "Main").await.unwrap();
        AccountService::create_account(&db, bob.id, "Other").await.unwrap();
        let app = test_app!(db.clone());

        let req = test::TestRequest::get()
            .uri("/api/accounts/me")
            .insert_header(bearer(&alice))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

        let req = test::TestRequest::get()
            .uri("/api/accounts")
            .insert_header(bearer(&alice))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let uri = format!("/api/accounts/{}", account.id);
        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&alice))
            .set_json(json!({"name": "Swing"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["name"], "Swing");

        // Nom absent ou vide : 400, le compte garde son nom
        for payload in [json!({}), json!({"name": ""})] {
            let req = test::TestRequest::put()
                .uri(&uri)
                .insert_header(bearer(&alice))
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert!(body["message"].as_str().is_some_and(|m| m.starts_with("Invalid request")));
        }
        assert_eq!(AccountService::get_by_id(&db, account.id).await.unwrap().name, "Swing");

        let req = test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&alice))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(&alice))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
