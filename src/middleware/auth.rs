use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::errors::AppError;
use crate::models::users::Role;
use crate::utils::jwt;

/// Utilisateur authentifié par JWT (header `Authorization: Bearer <token>`).
/// Utilisé comme extracteur dans les routes protégées.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Un admin passe toujours, sinon il faut être le propriétaire
    pub fn ensure_can_access(&self, owner_id: i32) -> Result<(), AppError> {
        if self.is_admin() || self.user_id == owner_id {
            Ok(())
        } else {
            Err(AppError::Forbidden("Access denied".to_string()))
        }
    }

    fn extract(req: &HttpRequest) -> Result<Self, AppError> {
        // 1. Header Authorization
        let header = req
            .headers()
            .get("Authorization")
            .ok_or_else(|| AppError::Unauthorized("Authorization header required".to_string()))?;

        // 2. Format exact "Bearer <token>"
        let invalid_format = || AppError::Unauthorized("Invalid authorization header format".to_string());
        let value = header.to_str().map_err(|_| invalid_format())?;
        let token = match value.split(' ').collect::<Vec<_>>().as_slice() {
            ["Bearer", token] if !token.is_empty() => *token,
            _ => return Err(invalid_format()),
        };

        // 3. Signature + expiration
        let config = req
            .app_data::<web::Data<AuthConfig>>()
            .ok_or_else(|| AppError::Internal("auth configuration missing".to_string()))?;
        let claims = jwt::verify_token(token, &config.jwt_secret)?;

        Ok(AuthUser {
            user_id: claims.user_id,
            username: claims.username,
            role: claims.role,
        })
    }
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::extract(req))
    }
}

/// Utilisateur authentifié ET admin
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = AuthUser::extract(req).and_then(|user| {
            if user.is_admin() {
                Ok(AdminUser(user))
            } else {
                Err(AppError::Forbidden("Admin access required".to_string()))
            }
        });

        ready(result)
    }
}
