use sea_orm::*;
use tracing::info;

use crate::errors::AppError;
use crate::models::dto::UpdateUserRequest;
use crate::models::users::{self, Role};
use crate::repositories::UserRepository;
use crate::utils::password::{hash_password, verify_password};

const USERNAME_TAKEN: &str = "username already exists";

pub struct UserService;

impl UserService {
    pub async fn create_user(
        db: &DatabaseConnection,
        username: &str,
        password: &str,
        role: &str,
        rounds: u32,
    ) -> Result<users::Model, AppError> {
        let role: Role = role.parse()?;

        // Pré-vérification indicative, la contrainte UNIQUE fait foi
        if UserRepository::username_exists(db, username).await? {
            return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
        }

        let password_hash = hash_password(password, rounds)?;

        UserRepository::create(db, username, &password_hash, role)
            .await
            .map_err(|e| AppError::from_unique_violation(e, USERNAME_TAKEN))
    }

    /// Même erreur que l'utilisateur soit inconnu ou le mot de passe faux
    pub async fn authenticate(
        db: &DatabaseConnection,
        username: &str,
        password: &str,
    ) -> Result<users::Model, AppError> {
        let invalid = || AppError::Unauthorized("invalid credentials".to_string());

        let user = UserRepository::find_by_username(db, username)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, &user.password_hash) {
            return Err(invalid());
        }

        Ok(user)
    }

    /// Mise à jour partielle ; les champs absents ne sont pas touchés
    pub async fn update_user(
        db: &DatabaseConnection,
        id: i32,
        changes: UpdateUserRequest,
        rounds: u32,
    ) -> Result<users::Model, AppError> {
        let user = Self::get_by_id(db, id).await?;
        let changes = changes.normalized();
        let mut active: users::ActiveModel = user.clone().into();
        let mut changed = false;

        if let Some(username) = changes.username.filter(|u| *u != user.username) {
            if UserRepository::username_exists(db, &username).await? {
                return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
            }
            active.username = Set(username);
            changed = true;
        }

        if let Some(password) = changes.password {
            active.password_hash = Set(hash_password(&password, rounds)?);
            changed = true;
        }

        if let Some(role) = changes.role {
            let role: Role = role.parse()?;
            active.role = Set(role.as_str().to_string());
            changed = true;
        }

        if !changed {
            return Ok(user);
        }

        UserRepository::update(db, active)
            .await
            .map_err(|e| AppError::from_unique_violation(e, USERNAME_TAKEN))
    }

    pub async fn delete_user(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
        let user = Self::get_by_id(db, id).await?;
        UserRepository::soft_delete(db, user).await?;
        Ok(())
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> Result<users::Model, AppError> {
        UserRepository::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<users::Model>, AppError> {
        Ok(UserRepository::find_all(db).await?)
    }

    /// Crée l'admin initial s'il n'existe aucun admin actif.
    /// Renvoie true si un compte a été créé.
    pub async fn ensure_admin_exists(
        db: &DatabaseConnection,
        username: &str,
        password: &str,
        rounds: u32,
    ) -> Result<bool, AppError> {
        if UserRepository::count_by_role(db, Role::Admin).await? > 0 {
            return Ok(false);
        }

        Self::create_user(db, username, password, Role::Admin.as_str(), rounds).await?;
        info!(username, "👤 Default admin user created");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{setup_db, TEST_ROUNDS};

    #[tokio::test]
    async fn test_create_then_authenticate() {
        let db = setup_db().await;
        let user = UserService::create_user(&db, "alice", "pw123456", "user", TEST_ROUNDS)
            .await
            .unwrap();
        assert_ne!(user.password_hash, "pw123456");

        let logged = UserService::authenticate(&db, "alice", "pw123456").await.unwrap();
        assert_eq!(logged.id, user.id);

        let wrong = UserService::authenticate(&db, "alice", "pw1234567").await.unwrap_err();
        let unknown = UserService::authenticate(&db, "nobody", "pw123456").await.unwrap_err();
        assert_eq!(wrong.to_string(), "invalid credentials");
        assert_eq!(unknown.to_string(), "invalid credentials");
    }

    #[tokio::test]
    async fn test_invalid_role_rejected() {
        let db = setup_db().await;
        let err = UserService::create_user(&db, "bob", "pw123456", "superuser", TEST_ROUNDS)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_concurrent_create_same_username() {
        let db = setup_db().await;

        let (first, second) = tokio::join!(
            UserService::create_user(&db, "twin", "pw123456", "user", TEST_ROUNDS),
            UserService::create_user(&db, "twin", "pw123456", "user", TEST_ROUNDS),
        );

        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(AppError::Conflict(msg)) if msg == USERNAME_TAKEN)));
    }

    #[tokio::test]
    async fn test_partial_update() {
        let db = setup_db().await;
        let user = UserService::create_user(&db, "ivan", "pw123456", "user", TEST_ROUNDS)
            .await
            .unwrap();
        UserService::create_user(&db, "judy", "pw123456", "user", TEST_ROUNDS)
            .await
            .unwrap();

        // Aucun champ : rien ne change
        let same = UserService::update_user(&db, user.id, UpdateUserRequest::default(), TEST_ROUNDS)
            .await
            .unwrap();
        assert_eq!(same, user);

        let taken = UpdateUserRequest {
            username: Some("judy".into()),
            ..Default::default()
        };
        let err = UserService::update_user(&db, user.id, taken, TEST_ROUNDS).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let changes = UpdateUserRequest {
            username: Some(String::new()),
            password: Some("newpass1".into()),
            role: Some("admin".into()),
        };
        let updated = UserService::update_user(&db, user.id, changes, TEST_ROUNDS).await.unwrap();
        assert_eq!(updated.username, "ivan");
        assert!(updated.is_admin());
        assert!(UserService::authenticate(&db, "ivan", "newpass1").await.is_ok());
        assert!(UserService::authenticate(&db, "ivan", "pw123456").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let db = setup_db().await;
        let user = UserService::create_user(&db, "kate", "pw123456", "user", TEST_ROUNDS)
            .await
            .unwrap();

        UserService::delete_user(&db, user.id).await.unwrap();
        assert!(matches!(
            UserService::get_by_id(&db, user.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            UserService::delete_user(&db, user.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(UserService::authenticate(&db, "kate", "pw123456").await.is_err());
    }

    #[tokio::test]
    async fn test_ensure_admin_exists_is_idempotent() {
        let db = setup_db().await;

        assert!(UserService::ensure_admin_exists(&db, "admin", "admin123", TEST_ROUNDS)
            .await
            .unwrap());
        assert!(!UserService::ensure_admin_exists(&db, "admin", "admin123", TEST_ROUNDS)
            .await
            .unwrap());

        let admins: Vec<_> = UserService::list_all(&db)
            .await
            .unwrap()
            .into_iter()
            .filter(|u| u.is_admin())
            .collect();
        assert_eq!(admins.len(), 1);
    }
}
