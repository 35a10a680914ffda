//! Durable storage for movies and users.
//!
//! Two interchangeable backends implement [`MovieStore`]: a SQLite database
//! managed through sea-orm, and a single JSON document on disk. Both list
//! movies newest first (descending id).

mod json_file;
mod sql;

use std::sync::Arc;

pub use json_file::JsonFileStore;
pub use sql::SqlStore;

use crate::{
    config::{Config, StorageBackend},
    error::AppResult,
    models::{Movie, MoviePatch, NewMovie, User},
};

#[async_trait::async_trait]
pub trait MovieStore: Send + Sync {
    async fn list_movies(&self) -> AppResult<Vec<Movie>>;

    async fn get_movie(&self, id: i64) -> AppResult<Option<Movie>>;

    /// Assigns `id` and `created_at`, persists, and returns the stored record.
    async fn insert_movie(&self, movie: NewMovie) -> AppResult<Movie>;

    /// Merges `patch` into the stored record in one atomic step.
    async fn update_movie(&self, id: i64, patch: &MoviePatch) -> AppResult<Option<Movie>>;

    /// Returns the removed id, or `None` when nothing matched.
    async fn delete_movie(&self, id: i64) -> AppResult<Option<i64>>;

    async fn count_movies(&self) -> AppResult<u64>;

    async fn find_user(&self, username: &str, password: &str) -> AppResult<Option<User>>;
}

pub async fn open(config: &Config) -> anyhow::Result<Arc<dyn MovieStore>> {
    let store: Arc<dyn MovieStore> = match config.storage {
        StorageBackend::Sqlite => {
            let db = crate::db::connect_and_migrate(&config.database_url).await?;
            crate::db::seed(&db, &config.admin_password).await?;
            tracing::info!(url = %config.database_url, "using sqlite store");
            Arc::new(SqlStore::new(db))
        },
        StorageBackend::JsonFile => {
            let store = JsonFileStore::open(&config.data_file, &config.admin_password).await?;
            tracing::info!(path = %config.data_file.display(), "using json file store");
            Arc::new(store)
        },
    };
    Ok(store)
}

pub(crate) fn now_rfc3339() -> String {
    jiff::Timestamp::now().to_string()
}
