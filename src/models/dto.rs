// Objets de requête / réponse de l'API (hors entités SeaORM)
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{accounts, statistics, users};

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub role: users::Role,
}

impl From<&users::Model> for UserInfo {
    fn from(user: &users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    pub role: String,
}

/// Mise à jour partielle : champ absent ou vide = inchangé
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: Option<String>,
    pub role: Option<String>,
}

impl UpdateUserRequest {
    /// Les chaînes vides sont traitées comme absentes
    pub fn normalized(self) -> Self {
        let keep = |value: Option<String>| value.filter(|v| !v.is_empty());
        Self {
            username: keep(self.username),
            password: keep(self.password),
            role: keep(self.role),
        }
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountRequest {
    pub user_id: i32,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
}

/// Compte + propriétaire (absent si l'utilisateur a été supprimé)
#[derive(Debug, Serialize)]
pub struct AccountWithOwner {
    #[serde(flatten)]
    pub account: accounts::Model,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<users::Model>,
}

impl From<(accounts::Model, Option<users::Model>)> for AccountWithOwner {
    fn from((account, user): (accounts::Model, Option<users::Model>)) -> Self {
        Self { account, user }
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct IngestStatisticRequest {
    pub timestamp: String, // RFC3339
    pub daily_profit_loss: f64,
    #[validate(range(min = 0, message = "total_trades_today must be >= 0"))]
    pub total_trades_today: i32,
    #[validate(range(min = 0.0, message = "total_balance must be >= 0"))]
    pub total_balance: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TodaySummary {
    pub total_records: usize,
    pub latest_balance: f64,
    pub daily_pl: f64,
    pub trades_today: i32,
    pub latest_update: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statistics: Vec<statistics::Model>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct OverallSummary {
    pub has_data: bool,
    pub current_balance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_pl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_trades: Option<i32>,
    pub latest_update: Option<DateTime<Utc>>,
}
