use sea_orm::*;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::dto::AccountWithOwner;
use crate::models::accounts;
use crate::repositories::{AccountRepository, UserRepository};
use crate::utils::token::{generate_secure_token, API_TOKEN_BYTES};

/// Nombre de tirages avant d'abandonner en cas de collision
pub const MAX_TOKEN_ATTEMPTS: usize = 5;

const TOKEN_TAKEN: &str = "api token already exists";

pub struct AccountService;

impl AccountService {
    pub async fn create_account(
        db: &DatabaseConnection,
        user_id: i32,
        name: &str,
    ) -> Result<accounts::Model, AppError> {
        if UserRepository::find_by_id(db, user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let api_token = Self::generate_unique_token(db).await?;

        let account = AccountRepository::create(db, user_id, name, &api_token)
            .await
            .map_err(|e| AppError::from_unique_violation(e, TOKEN_TAKEN))?;

        info!(account_id = account.id, user_id, "Account created");
        Ok(account)
    }

    pub async fn generate_unique_token(db: &DatabaseConnection) -> Result<String, AppError> {
        Self::generate_unique_token_with(db, || generate_secure_token(API_TOKEN_BYTES)).await
    }

    /// Boucle de tirage, le générateur est injectable pour les tests
    async fn generate_unique_token_with<F>(
        db: &DatabaseConnection,
        mut generate: F,
    ) -> Result<String, AppError>
    where
        F: FnMut() -> String,
    {
        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let token = generate();
            if !AccountRepository::token_exists(db, &token).await? {
                return Ok(token);
            }
            warn!(attempt, "API token collision, retrying");
        }

        Err(AppError::TokenGenerationFailed)
    }

    /// L'ancien token est remplacé et cesse immédiatement de fonctionner
    pub async fn regenerate_token(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<accounts::Model, AppError> {
        let account = Self::get_by_id(db, id).await?;
        let api_token = Self::generate_unique_token(db).await?;

        let account = AccountRepository::update_token(db, account, &api_token)
            .await
            .map_err(|e| AppError::from_unique_violation(e, TOKEN_TAKEN))?;

        info!(account_id = account.id, "API token regenerated");
        Ok(account)
    }

    /// Renomme si le nom est non vide, sinon renvoie le compte tel quel
    pub async fn update_account(
        db: &DatabaseConnection,
        id: i32,
        name: &str,
    ) -> Result<accounts::Model, AppError> {
        let account = Self::get_by_id(db, id).await?;
        if name.is_empty() || name == account.name {
            return Ok(account);
        }

        Ok(AccountRepository::update_name(db, account, name).await?)
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<accounts::Model>, AppError> {
        Ok(AccountRepository::find_by_id(db, id).await?)
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> Result<accounts::Model, AppError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))
    }

    pub async fn get_by_id_with_owner(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<AccountWithOwner, AppError> {
        AccountRepository::find_by_id_with_owner(db, id)
            .await?
            .map(AccountWithOwner::from)
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))
    }

    pub async fn get_by_user_id(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Vec<accounts::Model>, AppError> {
        Ok(AccountRepository::find_by_user_id(db, user_id).await?)
    }

    pub async fn get_all(db: &DatabaseConnection) -> Result<Vec<AccountWithOwner>, AppError> {
        let rows = AccountRepository::find_all_with_owner(db).await?;
        Ok(rows.into_iter().map(AccountWithOwner::from).collect())
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
        let account = Self::get_by_id(db, id).await?;
        AccountRepository::soft_delete(db, account).await?;
        Ok(())
    }

    pub async fn find_by_api_token(
        db: &DatabaseConnection,
        api_token: &str,
    ) -> Result<Option<accounts::Model>, AppError> {
        Ok(AccountRepository::find_by_token(db, api_token).await?)
    }
}
