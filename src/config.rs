use std::{net::SocketAddr, path::PathBuf, str::FromStr};

use anyhow::Context;

pub const DEFAULT_ADMIN_KEY: &str = "universidad2023";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_FALLBACK_POSTER_URL: &str = "https://images.unsplash.com/photo-1536440136628-849c177e76a1?ixlib=rb-4.0.3&auto=format&fit=crop&w=1625&q=80";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => anyhow::bail!("unknown environment {other:?}"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StorageBackend {
    Sqlite,
    JsonFile,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sql" => Ok(StorageBackend::Sqlite),
            "json" | "file" => Ok(StorageBackend::JsonFile),
            other => anyhow::bail!("unknown storage backend {other:?}"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub environment: Environment,
    pub storage: StorageBackend,
    pub database_url: String,
    pub data_file: PathBuf,
    pub admin_key: String,
    pub admin_password: String,
    pub fallback_poster_url: String,
    pub cors_origin: String,
    pub session_ttl_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            environment: Environment::Development,
            storage: StorageBackend::Sqlite,
            database_url: "sqlite://cine.db?mode=rwc".to_string(),
            data_file: PathBuf::from("data/peliculas.json"),
            admin_key: DEFAULT_ADMIN_KEY.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            fallback_poster_url: DEFAULT_FALLBACK_POSTER_URL.to_string(),
            cors_origin: "*".to_string(),
            session_ttl_minutes: 120,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let environment: Environment = match std::env::var("APP_ENV") {
            Ok(value) => value.parse().context("APP_ENV")?,
            Err(_) => defaults.environment,
        };

        let storage: StorageBackend = match std::env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse().context("STORAGE_BACKEND")?,
            Err(_) => defaults.storage,
        };

        let database_url = std::env::var("DATABASE_URL").unwrap_or(defaults.database_url);
        let data_file = std::env::var("DATA_FILE").map(PathBuf::from).unwrap_or(defaults.data_file);
        let admin_key = std::env::var("ADMIN_KEY").unwrap_or(defaults.admin_key);
        let admin_password =
            std::env::var("SEED_ADMIN_PASSWORD").unwrap_or(defaults.admin_password);
        let fallback_poster_url =
            std::env::var("FALLBACK_POSTER_URL").unwrap_or(defaults.fallback_poster_url);
        let cors_origin = std::env::var("CORS_ORIGIN").unwrap_or(defaults.cors_origin);

        let session_ttl_minutes: i64 = match std::env::var("SESSION_TTL_MINUTES") {
            Ok(value) => value.parse().context("SESSION_TTL_MINUTES")?,
            Err(_) => defaults.session_ttl_minutes,
        };

        if admin_key.trim().is_empty() {
            anyhow::bail!("ADMIN_KEY must not be empty");
        }

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            environment,
            storage,
            database_url,
            data_file,
            admin_key,
            admin_password,
            fallback_poster_url,
            cors_origin,
            session_ttl_minutes: session_ttl_minutes.max(1),
        })
    }

    /// Logs the settings that still carry their well-known defaults.
    pub fn warn_on_defaults(&self) {
        if self.admin_key == DEFAULT_ADMIN_KEY {
            tracing::warn!("ADMIN_KEY not set, using the built-in admin key");
        }
        if self.admin_password == DEFAULT_ADMIN_PASSWORD {
            tracing::warn!("SEED_ADMIN_PASSWORD not set, seeding admin with the default password");
        }
        if self.environment.is_production() && self.cors_origin == "*" {
            tracing::warn!("CORS_ORIGIN is \"*\" in production");
        }
    }
}
