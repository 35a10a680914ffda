use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use cine_universidad::{
    AppState, build_router,
    config::{Config, Environment, StorageBackend},
    error::{AppError, AppResult},
    models::{Movie, MoviePatch, NewMovie, User},
    store::MovieStore,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const ADMIN_KEY: &str = "universidad2023";
const FALLBACK: &str = "https://images.unsplash.com/photo-1536440136628-849c177e76a1?ixlib=rb-4.0.3&auto=format&fit=crop&w=1625&q=80";

async fn app_with(storage: StorageBackend, environment: Environment) -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        environment,
        storage,
        database_url: format!("sqlite://{}?mode=rwc", dir.path().join("cine.db").display()),
        data_file: dir.path().join("peliculas.json"),
        ..Config::default()
    };
    let state: Arc<AppState> = AppState::from_config(config).await.unwrap();
    (dir, build_router(state))
}

async fn app() -> (tempfile::TempDir, Router) {
    app_with(StorageBackend::Sqlite, Environment::Development).await
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_with(app, method, uri, body, None).await
}

async fn send_with(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_reports_environment() {
    let (_dir, app) = app().await;
    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["environment"], "development");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn create_delete_then_get_is_not_found() {
    for storage in [StorageBackend::Sqlite, StorageBackend::JsonFile] {
        let (_dir, app) = app_with(storage, Environment::Development).await;

        let (status, created) = send(
            &app,
            "POST",
            "/api/peliculas",
            Some(json!({
                "titulo": "X",
                "sinopsis": "Y",
                "fecha": "2024-01-01",
                "adminKey": ADMIN_KEY
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{storage:?}");
        assert_eq!(created["genero"], "No especificado");
        assert_eq!(created["duracion"], "120");
        assert_eq!(created["imagen"], FALLBACK);
        assert!(created["fechaCreacion"].is_string());

        let id = created["id"].as_i64().unwrap();
        let (status, fetched) = send(&app, "GET", &format!("/api/peliculas/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, deleted) = send(
            &app,
            "DELETE",
            &format!("/api/peliculas/{id}"),
            Some(json!({ "adminKey": ADMIN_KEY })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["success"], true);
        assert_eq!(deleted["id"], id);
        assert_eq!(deleted["peliculasRestantes"], 2);

        let (status, body) = send(&app, "GET", &format!("/api/peliculas/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Película no encontrada");
    }
}

#[tokio::test]
async fn wrong_admin_key_is_forbidden_and_changes_nothing() {
    let (_dir, app) = app().await;
    let (_, before) = send(&app, "GET", "/api/peliculas", None).await;
    let id = before[0]["id"].as_i64().unwrap();

    let bad = json!({ "titulo": "X", "sinopsis": "Y", "fecha": "2024-01-01", "adminKey": "nope" });
    let (status, body) = send(&app, "POST", "/api/peliculas", Some(bad.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Acceso no autorizado");

    let (status, _) = send(&app, "PUT", &format!("/api/peliculas/{id}"), Some(bad)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) =
        send(&app, "DELETE", &format!("/api/peliculas/{id}"), Some(json!({ "adminKey": "x" })))
            .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, after) = send(&app, "GET", "/api/peliculas", None).await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn empty_bodies_are_rejected_before_anything_else() {
    let (_dir, app) = app().await;

    let (status, body) = send(&app, "POST", "/api/peliculas", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Body vacío o mal formado");

    let (status, _) = send(&app, "PUT", "/api/peliculas/999", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", "/api/peliculas/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/peliculas", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_required_fields_list_them() {
    let (_dir, app) = app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/peliculas",
        Some(json!({ "titulo": "Solo título", "adminKey": ADMIN_KEY })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Faltan campos obligatorios");
    assert_eq!(body["camposRequeridos"], json!(["titulo", "sinopsis", "fecha"]));
}

#[tokio::test]
async fn poster_urls_pass_through_only_when_http() {
    let (_dir, app) = app().await;
    let base = json!({ "titulo": "X", "sinopsis": "Y", "fecha": "2024-01-01", "adminKey": ADMIN_KEY });

    let mut with_http = base.clone();
    with_http["imagen"] = json!("https://cdn.example/poster.jpg");
    let (_, created) = send(&app, "POST", "/api/peliculas", Some(with_http)).await;
    assert_eq!(created["imagen"], "https://cdn.example/poster.jpg");

    let mut relative = base;
    relative["imagen"] = json!("poster.jpg");
    let (_, created) = send(&app, "POST", "/api/peliculas", Some(relative)).await;
    assert_eq!(created["imagen"], FALLBACK);
}

#[tokio::test]
async fn update_merges_partial_fields() {
    let (_dir, app) = app().await;
    let (_, list) = send(&app, "GET", "/api/peliculas", None).await;
    let original = list[0].clone();
    let id = original["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/peliculas/{id}"),
        Some(json!({ "director": "Otra Persona", "duracion": "", "adminKey": ADMIN_KEY })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["director"], "Otra Persona");
    assert_eq!(updated["duracion"], original["duracion"]);
    assert_eq!(updated["titulo"], original["titulo"]);
    assert_eq!(updated["fechaCreacion"], original["fechaCreacion"]);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/peliculas/987654",
        Some(json!({ "director": "Nadie", "adminKey": ADMIN_KEY })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_checks_exact_credentials() {
    let (_dir, app) = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/login",
        Some(json!({ "username": "admin", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["role"], "admin");
    assert_eq!(body["username"], "admin");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    for (user, pass) in [("admin", "Admin123"), ("Admin", "admin123"), ("admin", "")] {
        let (status, body) =
            send(&app, "POST", "/api/login", Some(json!({ "username": user, "password": pass })))
                .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Credenciales incorrectas");
    }
}

#[tokio::test]
async fn admin_session_token_replaces_the_admin_key() {
    let (_dir, app) = app().await;
    let (_, login) = send(
        &app,
        "POST",
        "/api/login",
        Some(json!({ "username": "admin", "password": "admin123" })),
    )
    .await;
    let token = login["token"].as_str().unwrap().to_string();

    let (status, session) = send_with(&app, "GET", "/api/session", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["role"], "admin");

    let (status, created) = send_with(
        &app,
        "POST",
        "/api/peliculas",
        Some(json!({ "titulo": "Con token", "sinopsis": "S", "fecha": "2024-03-01" })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, _) =
        send_with(&app, "POST", "/api/logout", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_with(
        &app,
        "DELETE",
        &format!("/api/peliculas/{id}"),
        Some(json!({ "id": id })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send_with(&app, "GET", "/api/session", None, Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn delete_body_id_must_match_path() {
    let (_dir, app) = app().await;
    let (status, _) = send(
        &app,
        "DELETE",
        "/api/peliculas/1",
        Some(json!({ "id": 2, "adminKey": ADMIN_KEY })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_api_paths_echo_path_and_method() {
    let (_dir, app) = app().await;
    let (status, body) = send(&app, "GET", "/api/nada?x=1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Endpoint no encontrado");
    assert_eq!(body["path"], "/api/nada?x=1");
    assert_eq!(body["method"], "GET");

    let (status, _) = send(&app, "GET", "/api/peliculas/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn root_describes_the_api_in_development() {
    let (_dir, app) = app().await;
    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"]["peliculas"], "/api/peliculas");
}

#[tokio::test]
async fn production_serves_the_frontend_for_non_api_paths() {
    let (_dir, app) = app_with(StorageBackend::JsonFile, Environment::Production).await;

    for uri in ["/", "/cartelera", "/?genero=drama&pelicula=1"] {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let res = app.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "{uri}");
        let html = String::from_utf8(res.into_body().collect().await.unwrap().to_bytes().to_vec())
            .unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("El Padrino"));
    }

    let (status, body) = send(&app, "GET", "/api/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["method"], "GET");
}

#[tokio::test]
async fn unsupported_methods_on_api_paths_are_json_not_found() {
    let (_dir, app) = app().await;
    for (method, uri) in [("PATCH", "/api/peliculas"), ("POST", "/api/health"), ("PUT", "/api/login")]
    {
        let (status, body) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body["error"], "Endpoint no encontrado");
        assert_eq!(body["path"], uri);
        assert_eq!(body["method"], method);
    }
}

#[tokio::test]
async fn unparseable_query_on_unknown_api_path_still_gets_json() {
    let (_dir, app) = app().await;
    let (status, body) = send(&app, "GET", "/api/x?genero=a&genero=b", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["path"], "/api/x?genero=a&genero=b");
}

#[tokio::test]
async fn login_with_missing_or_non_string_credentials_is_unauthorized() {
    let (_dir, app) = app().await;
    for body in [
        json!({}),
        json!({ "username": 1, "password": "x" }),
        json!({ "username": "admin", "password": 123 }),
        json!([]),
    ] {
        let (status, res) = send(&app, "POST", "/api/login", Some(body.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{body}");
        assert_eq!(res["error"], "Credenciales incorrectas");
    }

    let (status, _) = send(&app, "POST", "/api/login", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn release_date_and_falsy_duration_follow_the_input() {
    let (_dir, app) = app().await;
    let (status, created) = send(
        &app,
        "POST",
        "/api/peliculas",
        Some(json!({
            "titulo": "Fechas",
            "sinopsis": "S",
            "fecha": "15/10/2023",
            "duracion": 0,
            "adminKey": ADMIN_KEY,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["fecha"], "15/10/2023");
    assert_eq!(created["duracion"], "120");
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/peliculas/{id}"),
        Some(json!({ "fecha": "2024-01-01T10:00:00Z", "duracion": false, "adminKey": ADMIN_KEY })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["fecha"], "2024-01-01T10:00:00Z");
    assert_eq!(updated["duracion"], "120");
}

struct BrokenStore;

#[async_trait::async_trait]
impl MovieStore for BrokenStore {
    async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        Err(AppError::Internal(anyhow::anyhow!("disco lleno")))
    }

    async fn get_movie(&self, _id: i64) -> AppResult<Option<Movie>> {
        Err(AppError::Internal(anyhow::anyhow!("disco lleno")))
    }

    async fn insert_movie(&self, _movie: NewMovie) -> AppResult<Movie> {
        Err(AppError::Internal(anyhow::anyhow!("disco lleno")))
    }

    async fn update_movie(&self, _id: i64, _patch: &MoviePatch) -> AppResult<Option<Movie>> {
        Err(AppError::Internal(anyhow::anyhow!("disco lleno")))
    }

    async fn delete_movie(&self, _id: i64) -> AppResult<Option<i64>> {
        Err(AppError::Internal(anyhow::anyhow!("disco lleno")))
    }

    async fn count_movies(&self) -> AppResult<u64> {
        Err(AppError::Internal(anyhow::anyhow!("disco lleno")))
    }

    async fn find_user(&self, _username: &str, _password: &str) -> AppResult<Option<User>> {
        Err(AppError::Internal(anyhow::anyhow!("disco lleno")))
    }
}

#[tokio::test]
async fn storage_failures_show_detail_only_outside_production() {
    for (environment, detail) in
        [(Environment::Development, Some("disco lleno")), (Environment::Production, None)]
    {
        let config = Config { environment, ..Config::default() };
        let app = build_router(AppState::new(Arc::new(config), Arc::new(BrokenStore)));

        let (status, body) = send(&app, "GET", "/api/peliculas", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Error interno del servidor");
        assert_eq!(body["message"].as_str(), detail, "{environment:?}");
    }
}
