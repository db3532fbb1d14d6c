// ============================================================================
// CONFIGURATION
// ============================================================================
//
// Toutes les valeurs viennent des variables d'environnement (.env chargé
// par dotenv dans main.rs). Chaque valeur a un défaut utilisable en local.
//
// Variables:
//   - PORT, RUN_MODE (ou GIN_MODE) : serveur HTTP
//   - DATABASE_URL ou DB_HOST/DB_PORT/DB_USER/DB_PASSWORD/DB_NAME/SSLMODE
//   - DB_MAX_CONNECTIONS : taille du pool
//   - JWT_SECRET, JWT_EXPIRATION_HOURS : tokens de session
//   - ADMIN_USERNAME, ADMIN_PASSWORD : admin créé au démarrage si aucun admin
//   - PASSWORD_HASH_ROUNDS : coût PBKDF2
//   - LOG_LEVEL : niveau de log si RUST_LOG absent
//
// ============================================================================

use std::env;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-this-in-production";
const DEFAULT_EXPIRATION_HOURS: i64 = 24;
const DEFAULT_PASSWORD_ROUNDS: u32 = 100_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Debug,
    Release,
    Test,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Debug => "debug",
            RunMode::Release => "release",
            RunMode::Test => "test",
        }
    }

    /// Niveau de log par défaut pour ce mode
    pub fn default_log_level(&self) -> &'static str {
        match self {
            RunMode::Debug => "debug",
            RunMode::Release | RunMode::Test => "info",
        }
    }
}

impl FromStr for RunMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(RunMode::Debug),
            "release" => Ok(RunMode::Release),
            "test" => Ok(RunMode::Test),
            other => Err(ConfigError::InvalidValue("RUN_MODE".into(), other.into())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub run_mode: RunMode,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// URL de connexion PostgreSQL (DATABASE_URL est prioritaire)
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }

        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.user, self.password, self.host, self.port, self.name, self.ssl_mode
        )
    }
}

/// Paramètres partagés avec les handlers via `web::Data`
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub password_rounds: u32,
}

impl AuthConfig {
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub admin: AdminConfig,
    pub log_level: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construit la config depuis une fonction de lookup (testable sans toucher l'env)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let port_raw = get("PORT", "8080");
        let port = port_raw
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("PORT".into(), port_raw.clone()))?;

        let run_mode = lookup("RUN_MODE")
            .or_else(|| lookup("GIN_MODE"))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "debug".to_string())
            .parse::<RunMode>()?;

        let max_raw = get("DB_MAX_CONNECTIONS", "10");
        let max_connections = max_raw
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".into(), max_raw.clone()))?;

        // Une valeur invalide retombe sur 24h plutôt que d'échouer
        let jwt_expiration_hours = get("JWT_EXPIRATION_HOURS", "24")
            .parse::<i64>()
            .unwrap_or(DEFAULT_EXPIRATION_HOURS);

        let jwt_secret = get("JWT_SECRET", DEFAULT_JWT_SECRET);

        let password_rounds = get("PASSWORD_HASH_ROUNDS", "")
            .parse::<u32>()
            .ok()
            .filter(|r| *r > 0)
            .unwrap_or(DEFAULT_PASSWORD_ROUNDS);

        Ok(Config {
            server: ServerConfig { port, run_mode },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").filter(|v| !v.is_empty()),
                host: get("DB_HOST", "localhost"),
                port: get("DB_PORT", "5432"),
                user: get("DB_USER", "postgres"),
                password: get("DB_PASSWORD", "postgres"),
                name: get("DB_NAME", "xtrack"),
                ssl_mode: get("SSLMODE", "require"),
                max_connections,
            },
            auth: AuthConfig {
                jwt_secret,
                jwt_expiration_hours,
                password_rounds,
            },
            admin: AdminConfig {
                username: get("ADMIN_USERNAME", "admin"),
                password: get("ADMIN_PASSWORD", "admin123"),
            },
            log_level: lookup("LOG_LEVEL").filter(|v| !v.is_empty()),
        })
    }
}
