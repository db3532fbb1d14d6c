use chrono::{DateTime, Utc};
use sea_orm::*;

use crate::models::statistics;
use crate::utils::pagination::Pagination;

pub struct StatisticRepository;

impl StatisticRepository {
    fn live_for_account(account_id: i32) -> Select<statistics::Entity> {
        statistics::Entity::find()
            .filter(statistics::Column::AccountId.eq(account_id))
            .filter(statistics::Column::DeletedAt.is_null())
            .order_by_desc(statistics::Column::Timestamp)
            .order_by_desc(statistics::Column::Id)
    }

    /// Renvoie la page demandée et le nombre total de lignes.
    /// Une page au-delà de la fin (ou dont l'offset déborde) est vide.
    async fn fetch_paginated(
        db: &DatabaseConnection,
        query: Select<statistics::Entity>,
        pagination: Pagination,
    ) -> Result<(Vec<statistics::Model>, u64), DbErr> {
        let total = query.clone().count(db).await?;

        let offset = match (pagination.page - 1).checked_mul(pagination.page_size) {
            Some(offset) if offset < total => offset,
            _ => return Ok((Vec::new(), total)),
        };

        let rows = query
            .offset(offset)
            .limit(pagination.page_size)
            .all(db)
            .await?;
        Ok((rows, total))
    }

    pub async fn create(
        db: &DatabaseConnection,
        account_id: i32,
        timestamp: DateTime<Utc>,
        daily_pl: f64,
        trades_today: i32,
        total_balance: f64,
    ) -> Result<statistics::Model, DbErr> {
        let statistic = statistics::ActiveModel {
            account_id: Set(account_id),
            timestamp: Set(timestamp),
            daily_pl: Set(daily_pl),
            trades_today: Set(trades_today),
            total_balance: Set(total_balance),
            deleted_at: Set(None),
            ..Default::default()
        };

        statistic.insert(db).await
    }

    pub async fn find_by_account_id(
        db: &DatabaseConnection,
        account_id: i32,
        pagination: Pagination,
    ) -> Result<(Vec<statistics::Model>, u64), DbErr> {
        Self::fetch_paginated(db, Self::live_for_account(account_id), pagination).await
    }

    /// Bornes incluses des deux côtés
    pub async fn find_by_date_range(
        db: &DatabaseConnection,
        account_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        pagination: Pagination,
    ) -> Result<(Vec<statistics::Model>, u64), DbErr> {
        let query = Self::live_for_account(account_id)
            .filter(statistics::Column::Timestamp.gte(start))
            .filter(statistics::Column::Timestamp.lte(end));

        Self::fetch_paginated(db, query, pagination).await
    }

    /// [start, end) sans pagination, utilisé pour le résumé du jour
    pub async fn find_in_window(
        db: &DatabaseConnection,
        account_id: i32,
        start: DateTime<Utc>,
        end_exclusive: DateTime<Utc>,
    ) -> Result<Vec<statistics::Model>, DbErr> {
        Self::live_for_account(account_id)
            .filter(statistics::Column::Timestamp.gte(start))
            .filter(statistics::Column::Timestamp.lt(end_exclusive))
            .all(db)
            .await
    }

    pub async fn find_latest(
        db: &DatabaseConnection,
        account_id: i32,
    ) -> Result<Option<statistics::Model>, DbErr> {
        Self::live_for_account(account_id).one(db).await
    }
}
