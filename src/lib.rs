pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod extract;
pub mod frontend;
pub mod models;
pub mod routes;
pub mod seed;
pub mod store;
pub mod templates;

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{auth::SessionStore, catalog::CatalogService, config::Config, store::MovieStore};

pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: CatalogService,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Arc<Config>, store: Arc<dyn MovieStore>) -> Arc<Self> {
        let catalog = CatalogService::new(
            store,
            config.admin_key.clone(),
            config.fallback_poster_url.clone(),
        );
        let sessions = SessionStore::new(config.session_ttl_minutes);
        Arc::new(Self { config, catalog, sessions })
    }

    /// Opens the configured store (migrating and seeding it) and wires the services.
    pub async fn from_config(config: Config) -> anyhow::Result<Arc<Self>> {
        let store = store::open(&config).await?;
        Ok(Self::new(Arc::new(config), store))
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origin);

    Router::new()
        .route("/", get(routes::root))
        .route("/api/health", get(routes::health))
        .route("/api/peliculas", get(routes::list_movies).post(routes::create_movie))
        .route(
            "/api/peliculas/{id}",
            get(routes::get_movie).put(routes::update_movie).delete(routes::delete_movie),
        )
        .route("/api/login", post(routes::login))
        .route("/api/logout", post(routes::logout))
        .route("/api/session", get(routes::session))
        .fallback(routes::fallback)
        .method_not_allowed_fallback(routes::fallback)
        .layer(middleware::map_response_with_state(state.clone(), error::attach_internal_details))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origin.trim() == "*" {
        return layer.allow_origin(Any);
    }

    match HeaderValue::from_str(origin.trim()) {
        Ok(value) => layer.allow_origin(value).allow_credentials(true),
        Err(_) => {
            tracing::warn!(origin, "invalid CORS_ORIGIN, allowing any origin");
            layer.allow_origin(Any)
        },
    }
}
