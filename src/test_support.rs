// Outils partagés par les tests : base SQLite en mémoire, utilisateurs, JWT

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::AuthConfig;
use crate::db::setup_schema;
use crate::models::users;
use crate::services::UserService;
use crate::utils::jwt;

/// Coût PBKDF2 réduit pour garder les tests rapides
pub const TEST_ROUNDS: u32 = 1_000;

pub const TEST_PASSWORD: &str = "pw123456";

pub async fn setup_db() -> DatabaseConnection {
    // Une seule connexion : chaque connexion SQLite :memory: a sa propre base
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    setup_schema(&db).await.unwrap();
    db
}

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".to_string(),
        jwt_expiration_hours: 24,
        password_rounds: TEST_ROUNDS,
    }
}

/// Crée un utilisateur avec le mot de passe `TEST_PASSWORD`
pub async fn create_user(db: &DatabaseConnection, username: &str, role: &str) -> users::Model {
    UserService::create_user(db, username, TEST_PASSWORD, role, TEST_ROUNDS)
        .await
        .unwrap()
}

/// Header `Authorization` prêt à insérer dans une TestRequest
pub fn bearer(user: &users::Model) -> (&'static str, String) {
    let config = auth_config();
    let token = jwt::generate_token(
        user.id,
        &user.username,
        user.role(),
        &config.jwt_secret,
        config.jwt_expiration_hours,
    )
    .unwrap();

    ("Authorization", format!("Bearer {token}"))
}

/// Application complète (toutes les routes) sur la base donnée
macro_rules! test_app {
    ($db:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($db))
                .app_data(actix_web::web::Data::new($crate::test_support::auth_config()))
                .configure($crate::routes::configure_routes),
        )
        .await
    };
}

pub(crate) use test_app;
