// connexion BD + création du schéma au démarrage

use std::time::Duration;

use sea_orm::sea_query::Index;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::models::{accounts, statistics, users};

pub async fn establish_connection(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.connection_url());
    options
        .max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(options).await
}

/// Crée les tables (ordre des FK : users -> accounts -> statistics) et les index.
/// Idempotent : rien n'est recréé si déjà présent.
pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, users::Entity).await?;
    create_table(db, accounts::Entity).await?;
    create_table(db, statistics::Entity).await?;

    let backend = db.get_database_backend();
    let indexes = [
        Index::create()
            .name("idx_account_timestamp")
            .table(statistics::Entity)
            .col(statistics::Column::AccountId)
            .col(statistics::Column::Timestamp)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_timestamp")
            .table(statistics::Entity)
            .col(statistics::Column::Timestamp)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_accounts_user_id")
            .table(accounts::Entity)
            .col(accounts::Column::UserId)
            .if_not_exists()
            .to_owned(),
    ];

    for index in indexes {
        db.execute(backend.build(&index)).await?;
    }

    info!("✅ Database schema ready");
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();

    db.execute(backend.build(&stmt)).await?;
    debug!(table = entity.table_name(), "table checked");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup_db;

    #[tokio::test]
    async fn test_setup_schema_is_idempotent() {
        let db = setup_db().await;
        setup_schema(&db).await.unwrap();
        setup_schema(&db).await.unwrap();
    }
}
