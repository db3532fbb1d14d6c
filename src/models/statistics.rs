// ============================================================================
// MODÈLE : STATISTICS
// ============================================================================
//
// Un snapshot de performance envoyé par le client de trading via le token API
// de son compte (POST /api/ingest/statistics).
//
// Colonnes:
//   - account_id (FK vers accounts)
//   - timestamp : horodatage fourni par le client (pas l'heure de réception)
//   - daily_pl : profit/perte du jour (peut être négatif)
//   - trades_today : nombre de trades du jour (>= 0)
//   - total_balance : solde total à cet instant (>= 0)
//
// Points d'attention:
//   - Pas d'endpoint de mise à jour : une statistique est immuable
//   - Index composite (account_id, timestamp) créé dans db.rs pour les plages
//
// ============================================================================

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "statistics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub account_id: i32,
    pub timestamp: DateTimeUtc,
    pub daily_pl: f64,
    pub trades_today: i32,
    pub total_balance: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    #[serde(skip)]
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Account,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}
