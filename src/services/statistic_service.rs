use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use sea_orm::*;

use crate::errors::AppError;
use crate::models::dto::{OverallSummary, TodaySummary};
use crate::models::statistics;
use crate::repositories::{AccountRepository, StatisticRepository};
use crate::utils::pagination::{Pagination, PaginationMeta};

pub struct StatisticService;

/// Minuit (heure locale du fuseau) converti en UTC.
/// Si minuit n'existe pas ce jour-là (changement d'heure), on le lit comme UTC.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

/// Journée calendaire locale contenant `now` : [minuit, minuit suivant)
pub fn local_day_bounds<Tz: TimeZone>(now: &DateTime<Tz>) -> (DateTime<Utc>, DateTime<Utc>) {
    let tz = now.timezone();
    let today = now.date_naive();
    let start = local_midnight(&tz, today);
    let end = today
        .succ_opt()
        .map(|tomorrow| local_midnight(&tz, tomorrow))
        .unwrap_or_else(|| start + Duration::hours(24));

    (start, end)
}

impl StatisticService {
    pub async fn create_statistic(
        db: &DatabaseConnection,
        account_id: i32,
        timestamp: DateTime<Utc>,
        daily_pl: f64,
        trades_today: i32,
        total_balance: f64,
    ) -> Result<statistics::Model, AppError> {
        if AccountRepository::find_by_id(db, account_id).await?.is_none() {
            return Err(AppError::NotFound("Account not found".to_string()));
        }

        Ok(StatisticRepository::create(db, account_id, timestamp, daily_pl, trades_today, total_balance).await?)
    }

    pub async fn list_by_date_range(
        db: &DatabaseConnection,
        account_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        pagination: Pagination,
    ) -> Result<(Vec<statistics::Model>, PaginationMeta), AppError> {
        let (rows, total) =
            StatisticRepository::find_by_date_range(db, account_id, start, end, pagination).await?;
        Ok((rows, PaginationMeta::new(pagination, total)))
    }

    pub async fn list_by_account_id(
        db: &DatabaseConnection,
        account_id: i32,
        pagination: Pagination,
    ) -> Result<(Vec<statistics::Model>, PaginationMeta), AppError> {
        let (rows, total) = StatisticRepository::find_by_account_id(db, account_id, pagination).await?;
        Ok((rows, PaginationMeta::new(pagination, total)))
    }

    /// Résumé de la journée en cours, heure locale du serveur
    pub async fn today_summary(db: &DatabaseConnection, account_id: i32) -> Result<TodaySummary, AppError> {
        Self::today_summary_at(db, account_id, Local::now()).await
    }

    pub async fn today_summary_at<Tz: TimeZone>(
        db: &DatabaseConnection,
        account_id: i32,
        now: DateTime<Tz>,
    ) -> Result<TodaySummary, AppError> {
        let (start, end) = local_day_bounds(&now);
        let rows = StatisticRepository::find_in_window(db, account_id, start, end).await?;

        // rows est trié du plus récent au plus ancien
        let summary = match rows.first() {
            None => TodaySummary {
                total_records: 0,
                latest_balance: 0.0,
                daily_pl: 0.0,
                trades_today: 0,
                latest_update: None,
                statistics: Vec::new(),
            },
            Some(latest) => TodaySummary {
                total_records: rows.len(),
                latest_balance: latest.total_balance,
                daily_pl: latest.daily_pl,
                trades_today: latest.trades_today,
                latest_update: Some(latest.timestamp),
                statistics: rows.clone(),
            },
        };

        Ok(summary)
    }

    pub async fn overall_summary(db: &DatabaseConnection, account_id: i32) -> Result<OverallSummary, AppError> {
        let summary = match StatisticRepository::find_latest(db, account_id).await? {
            None => OverallSummary {
                has_data: false,
                current_balance: 0.0,
                latest_pl: None,
                latest_trades: None,
                latest_update: None,
            },
            Some(latest) => OverallSummary {
                has_data: true,
                current_balance: latest.total_balance,
                latest_pl: Some(latest.daily_pl),
                latest_trades: Some(latest.trades_today),
                latest_update: Some(latest.timestamp),
            },
        };

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::AccountService;
    use crate::test_support::{create_user, setup_db};
    use chrono::FixedOffset;

    async fn seed_account(db: &DatabaseConnection) -> i32 {
        let user = create_user(db, "alice", "user").await;
        AccountService::create_account(db, user.id, "Main").await.unwrap().id
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_local_day_bounds() {
        let (start, end) = local_day_bounds(&utc(2024, 1, 15, 10, 30, 0));
        assert_eq!(start, utc(2024, 1, 15, 0, 0, 0));
        assert_eq!(end, utc(2024, 1, 16, 0, 0, 0));

        // 01:00 à UTC+2 : la journée locale commence la veille à 22:00 UTC
        let paris = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = paris.with_ymd_and_hms(2024, 6, 10, 1, 0, 0).unwrap();
        let (start, end) = local_day_bounds(&now);
        assert_eq!(start, utc(2024, 6, 9, 22, 0, 0));
        assert_eq!(end, utc(2024, 6, 10, 22, 0, 0));
    }

    #[tokio::test]
    async fn test_create_statistic_requires_account() {
        let db = setup_db().await;
        let err = StatisticService::create_statistic(&db, 42, Utc::now(), 1.0, 1, 1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_today_summary() {
        let db = setup_db().await;
        let account_id = seed_account(&db).await;
        let now = utc(2024, 1, 15, 18, 0, 0);

        let empty = StatisticService::today_summary_at(&db, account_id, now).await.unwrap();
        assert_eq!(empty.total_records, 0);
        assert_eq!(empty.latest_balance, 0.0);
        assert!(empty.latest_update.is_none());

        StatisticService::create_statistic(&db, account_id, utc(2024, 1, 14, 23, 0, 0), 9.0, 9, 9.0)
            .await
            .unwrap();
        StatisticService::create_statistic(&db, account_id, utc(2024, 1, 15, 8, 0, 0), 20.0, 1, 10370.0)
            .await
            .unwrap();
        StatisticService::create_statistic(&db, account_id, utc(2024, 1, 15, 10, 30, 0), 150.5, 3, 10500.0)
            .await
            .unwrap();

        let summary = StatisticService::today_summary_at(&db, account_id, now).await.unwrap();
        assert_eq!(summary.total_records, 2);
        assert_eq!(summary.latest_balance, 10500.0);
        assert_eq!(summary.daily_pl, 150.5);
        assert_eq!(summary.trades_today, 3);
        assert_eq!(summary.latest_update, Some(utc(2024, 1, 15, 10, 30, 0)));
        assert_eq!(summary.statistics.len(), 2);
    }

    #[tokio::test]
    async fn test_overall_summary() {
        let db = setup_db().await;
        let account_id = seed_account(&db).await;

        let empty = StatisticService::overall_summary(&db, account_id).await.unwrap();
        assert!(!empty.has_data);
        assert_eq!(empty.current_balance, 0.0);
        assert!(empty.latest_update.is_none());

        StatisticService::create_statistic(&db, account_id, utc(2023, 12, 1, 9, 0, 0), -12.5, 4, 980.0)
            .await
            .unwrap();
        let summary = StatisticService::overall_summary(&db, account_id).await.unwrap();
        assert!(summary.has_data);
        assert_eq!(summary.current_balance, 980.0);
        assert_eq!(summary.latest_pl, Some(-12.5));
        assert_eq!(summary.latest_trades, Some(4));
    }

    #[tokio::test]
    async fn test_list_pagination_meta() {
        let db = setup_db().await;
        let account_id = seed_account(&db).await;

        for minute in 0..25 {
            StatisticService::create_statistic(&db, account_id, utc(2024, 1, 15, 9, minute, 0), 0.0, 0, 100.0)
                .await
                .unwrap();
        }

        let (rows, meta) = StatisticService::list_by_account_id(&db, account_id, Pagination::new(2, 0))
            .await
            .unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(meta.page, 2);
        assert_eq!(meta.page_size, 20);
        assert_eq!(meta.total_items, 25);
        assert_eq!(meta.total_pages, 2);
    }
}
