use chrono::Utc;
use sea_orm::*;

use crate::models::users::{self, Role};

pub struct UserRepository;

impl UserRepository {
    pub async fn create(
        db: &DatabaseConnection,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<users::Model, DbErr> {
        let user = users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(role.as_str().to_string()),
            deleted_at: Set(None),
            ..Default::default()
        };

        user.insert(db).await
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id)
            .filter(users::Column::DeletedAt.is_null())
            .one(db)
            .await
    }

    pub async fn find_by_username(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .filter(users::Column::DeletedAt.is_null())
            .one(db)
            .await
    }

    pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::DeletedAt.is_null())
            .order_by_asc(users::Column::Id)
            .all(db)
            .await
    }

    pub async fn update(
        db: &DatabaseConnection,
        user: users::ActiveModel,
    ) -> Result<users::Model, DbErr> {
        user.update(db).await
    }

    /// Marque la ligne supprimée ; le username reste réservé (contrainte UNIQUE)
    pub async fn soft_delete(db: &DatabaseConnection, user: users::Model) -> Result<(), DbErr> {
        let mut active: users::ActiveModel = user.into();
        active.deleted_at = Set(Some(Utc::now()));
        active.update(db).await?;
        Ok(())
    }

    pub async fn username_exists(db: &DatabaseConnection, username: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .filter(users::Column::DeletedAt.is_null())
            .count(db)
            .await?;

        Ok(count > 0)
    }

    pub async fn count_by_role(db: &DatabaseConnection, role: Role) -> Result<u64, DbErr> {
        users::Entity::find()
            .filter(users::Column::Role.eq(role.as_str()))
            .filter(users::Column::DeletedAt.is_null())
            .count(db)
            .await
    }
}
