use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState,
    auth::{self, SESSION_COOKIE},
    catalog::Credentials,
    error::{AppError, AppResult},
    extract::{CurrentSession, JsonBody},
    frontend::view::CatalogViewModel,
    models::{
        DeleteRequest, DeleteResponse, LoginRequest, LoginResponse, Movie, MovieFields,
        SessionInfo,
    },
    templates,
};

pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "OK",
        "timestamp": jiff::Timestamp::now().to_string(),
        "environment": state.config.environment.as_str(),
    }))
}

pub async fn root(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    uri: Uri,
) -> AppResult<Response> {
    if state.config.environment.is_production() {
        return Ok(frontend_page(&state, session, &uri).await?.into_response());
    }

    Ok(Json(json!({
        "message": "API de Películas Universitarias",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment.as_str(),
        "endpoints": {
            "peliculas": "/api/peliculas",
            "pelicula": "/api/peliculas/:id",
            "login": "/api/login",
            "logout": "/api/logout",
            "sesion": "/api/session",
            "salud": "/api/health",
        },
    }))
    .into_response())
}

pub async fn list_movies(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Movie>>> {
    Ok(Json(state.catalog.list().await?))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Movie>> {
    let id = parse_id(&id).ok_or(AppError::NotFound)?;
    Ok(Json(state.catalog.get(id).await?))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    JsonBody(fields): JsonBody<MovieFields>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let admin_key = fields.admin_key.clone();
    let creds = Credentials { admin_key: admin_key.as_deref(), session: session.as_ref() };
    let movie = state.catalog.create(fields, creds).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    CurrentSession(session): CurrentSession,
    JsonBody(fields): JsonBody<MovieFields>,
) -> AppResult<Json<Movie>> {
    let admin_key = fields.admin_key.clone();
    let creds = Credentials { admin_key: admin_key.as_deref(), session: session.as_ref() };
    let Some(id) = parse_id(&id) else {
        state.catalog.authorize(creds)?;
        return Err(AppError::NotFound);
    };
    Ok(Json(state.catalog.update(id, fields, creds).await?))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    CurrentSession(session): CurrentSession,
    JsonBody(body): JsonBody<DeleteRequest>,
) -> AppResult<Json<DeleteResponse>> {
    let creds = Credentials { admin_key: body.admin_key.as_deref(), session: session.as_ref() };
    let Some(id) = parse_id(&id) else {
        state.catalog.authorize(creds)?;
        return Err(AppError::NotFound);
    };
    if body.id.is_some_and(|body_id| body_id != id) {
        return Err(AppError::Validation("El id del cuerpo no coincide con la ruta".to_string()));
    }
    Ok(Json(state.catalog.delete(id, creds).await?))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: Bytes,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let req = LoginRequest::from_body(&body);
    let user = auth::login(state.catalog.store(), &req.username, &req.password).await?;
    let session = state.sessions.issue(&user).await;
    tracing::info!(username = %user.username, role = %user.role, "login");

    let cookie = Cookie::build((SESSION_COOKIE, session.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(state.sessions.ttl_seconds()))
        .build();

    let body = LoginResponse {
        success: true,
        username: user.username,
        role: user.role,
        message: "Login exitoso".to_string(),
        token: session.token,
    };
    Ok((jar.add(cookie), Json(body)))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    jar: CookieJar,
) -> (CookieJar, Json<serde_json::Value>) {
    if let Some(session) = session {
        state.sessions.revoke(&session.token).await;
        tracing::info!(username = %session.username, "logout");
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Json(json!({ "success": true, "message": "Sesión cerrada" })))
}

pub async fn session(CurrentSession(session): CurrentSession) -> AppResult<Json<SessionInfo>> {
    let session = session.ok_or(AppError::Unauthenticated)?;
    Ok(Json(SessionInfo { username: session.username, role: session.role }))
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    genero: Option<String>,
    pelicula: Option<String>,
}

pub async fn fallback(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    method: Method,
    uri: Uri,
) -> AppResult<Response> {
    let path = uri.path();
    let is_api = path == "/api" || path.starts_with("/api/");

    if !is_api && method == Method::GET && state.config.environment.is_production() {
        return Ok(frontend_page(&state, session, &uri).await?.into_response());
    }

    let body = json!({
        "error": if is_api { "Endpoint no encontrado" } else { "Ruta no encontrada" },
        "path": uri.to_string(),
        "method": method.as_str(),
    });
    Ok((StatusCode::NOT_FOUND, Json(body)).into_response())
}

/// Read-only catalog page. A query string that does not parse is ignored.
async fn frontend_page(
    state: &AppState,
    CurrentSession(session): CurrentSession,
    uri: &Uri,
) -> AppResult<Html<String>> {
    let q = Query::<PageQuery>::try_from_uri(uri).map(|Query(q)| q).unwrap_or_default();
    let mut vm = CatalogViewModel::new(state.catalog.list().await?);
    if session.as_ref().is_some_and(|s| s.is_admin()) {
        vm.login_succeeded();
    }
    if let Some(genre) = &q.genero {
        vm.set_filter(genre);
    }

    let detail = q
        .pelicula
        .as_deref()
        .and_then(parse_id)
        .and_then(|id| vm.find(id))
        .map(|movie| vm.detail(movie));

    Ok(Html(templates::index_page(&vm.render(), &vm.genres(), detail.as_ref())))
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}
