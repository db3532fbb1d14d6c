use actix_web::{get, web, HttpResponse};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::DatabaseConnection;

use crate::errors::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::DateRangeQuery;
use crate::routes::invalid_id_config;
use crate::services::{AccountService, StatisticService};
use crate::utils::pagination::{Pagination, PaginationQuery};
use crate::utils::response::{ApiResponse, PaginatedResponse};

/// Un admin voit tout ; sinon le compte doit exister et appartenir à l'appelant.
/// Les deux échecs répondent 403.
async fn check_account_access(
    db: &DatabaseConnection,
    user: &AuthUser,
    account_id: i32,
) -> Result<(), AppError> {
    if user.is_admin() {
        return Ok(());
    }

    match AccountService::find_by_id(db, account_id).await? {
        Some(account) => user.ensure_can_access(account.user_id),
        None => Err(AppError::Forbidden("Access denied".to_string())),
    }
}

/// YYYY-MM-DD -> [début 00:00:00, fin 23:59:59] en UTC
fn date_range_bounds(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => (start, end),
        _ => {
            return Err(AppError::InvalidInput(
                "start_date and end_date are required".to_string(),
            ))
        }
    };

    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").map_err(|_| {
        AppError::InvalidInput("Invalid start_date format, use YYYY-MM-DD".to_string())
    })?;
    let end = NaiveDate::parse_from_str(end, "%Y-%m-%d").map_err(|_| {
        AppError::InvalidInput("Invalid end_date format, use YYYY-MM-DD".to_string())
    })?;

    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    Ok((
        start.and_time(NaiveTime::MIN).and_utc(),
        end.and_time(end_of_day).and_utc(),
    ))
}

#[get("/{account_id}")]
pub async fn list_statistics(
    user: AuthUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let account_id = path.into_inner();
    check_account_access(&db, &user, account_id).await?;

    let pagination = Pagination::from_query(&query);
    let (statistics, meta) = StatisticService::list_by_account_id(&db, account_id, pagination).await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse::new(
        "Statistics retrieved successfully",
        statistics,
        meta,
    )))
}

/// GET /api/statistics/{account_id}/range?start_date=&end_date= (fin incluse jusqu'à 23:59:59)
#[get("/{account_id}/range")]
pub async fn statistics_by_range(
    user: AuthUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, AppError> {
    let account_id = path.into_inner();
    check_account_access(&db, &user, account_id).await?;

    let (start, end) = date_range_bounds(query.start_date.as_deref(), query.end_date.as_deref())?;
    let pagination = Pagination::from_raw(query.page.as_deref(), query.page_size.as_deref());

    let (statistics, meta) =
        StatisticService::list_by_date_range(&db, account_id, start, end, pagination).await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse::new(
        "Statistics retrieved successfully",
        statistics,
        meta,
    )))
}

#[get("/{account_id}/today")]
pub async fn today_summary(
    user: AuthUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let account_id = path.into_inner();
    check_account_access(&db, &user, account_id).await?;

    let summary = StatisticService::today_summary(&db, account_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Today's summary retrieved successfully", summary)))
}

#[get("/{account_id}/summary")]
pub async fn overall_summary(
    user: AuthUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let account_id = path.into_inner();
    check_account_access(&db, &user, account_id).await?;

    let summary = StatisticService::overall_summary(&db, account_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Overall summary retrieved successfully", summary)))
}

pub fn statistics_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/statistics")
            .app_data(invalid_id_config("Invalid account ID"))
            .service(list_statistics)
            .service(statistics_by_range)
            .service(today_summary)
            .service(overall_summary),
    );
}
