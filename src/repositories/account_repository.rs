use chrono::Utc;
use sea_orm::*;

use crate::models::{accounts, users};

pub struct AccountRepository;

/// Un propriétaire supprimé (soft delete) n'est pas renvoyé
fn live_owner(
    (account, user): (accounts::Model, Option<users::Model>),
) -> (accounts::Model, Option<users::Model>) {
    (account, user.filter(|u| u.deleted_at.is_none()))
}

impl AccountRepository {
    pub async fn create(
        db: &DatabaseConnection,
        user_id: i32,
        name: &str,
        api_token: &str,
    ) -> Result<accounts::Model, DbErr> {
        let account = accounts::ActiveModel {
            user_id: Set(user_id),
            name: Set(name.to_string()),
            api_token: Set(api_token.to_string()),
            deleted_at: Set(None),
            ..Default::default()
        };

        account.insert(db).await
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find_by_id(id)
            .filter(accounts::Column::DeletedAt.is_null())
            .one(db)
            .await
    }

    pub async fn find_by_id_with_owner(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<(accounts::Model, Option<users::Model>)>, DbErr> {
        let row = accounts::Entity::find_by_id(id)
            .filter(accounts::Column::DeletedAt.is_null())
            .find_also_related(users::Entity)
            .one(db)
            .await?;

        Ok(row.map(live_owner))
    }

    pub async fn find_by_user_id(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Vec<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .filter(accounts::Column::DeletedAt.is_null())
            .order_by_asc(accounts::Column::Id)
            .all(db)
            .await
    }

    pub async fn find_by_token(
        db: &DatabaseConnection,
        api_token: &str,
    ) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::ApiToken.eq(api_token))
            .filter(accounts::Column::DeletedAt.is_null())
            .one(db)
            .await
    }

    pub async fn find_all_with_owner(
        db: &DatabaseConnection,
    ) -> Result<Vec<(accounts::Model, Option<users::Model>)>, DbErr> {
        let rows = accounts::Entity::find()
            .filter(accounts::Column::DeletedAt.is_null())
            .find_also_related(users::Entity)
            .order_by_asc(accounts::Column::Id)
            .all(db)
            .await?;

        Ok(rows.into_iter().map(live_owner).collect())
    }

    pub async fn update_name(
        db: &DatabaseConnection,
        account: accounts::Model,
        name: &str,
    ) -> Result<accounts::Model, DbErr> {
        let mut active: accounts::ActiveModel = account.into();
        active.name = Set(name.to_string());
        active.update(db).await
    }

    pub async fn update_token(
        db: &DatabaseConnection,
        account: accounts::Model,
        api_token: &str,
    ) -> Result<accounts::Model, DbErr> {
        let mut active: accounts::ActiveModel = account.into();
        active.api_token = Set(api_token.to_string());
        active.update(db).await
    }

    pub async fn soft_delete(db: &DatabaseConnection, account: accounts::Model) -> Result<(), DbErr> {
        let mut active: accounts::ActiveModel = account.into();
        active.deleted_at = Set(Some(Utc::now()));
        active.update(db).await?;
        Ok(())
    }

    /// Inclut les comptes supprimés : leur token occupe toujours l'index UNIQUE
    pub async fn token_exists(db: &DatabaseConnection, api_token: &str) -> Result<bool, DbErr> {
        let count = accounts::Entity::find()
            .filter(accounts::Column::ApiToken.eq(api_token))
            .count(db)
            .await?;

        Ok(count > 0)
    }
}
