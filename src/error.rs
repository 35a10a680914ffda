use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;

const INTERNAL_ERROR: &str = "Error interno del servidor";

/// Message of the error behind a 500, carried as a response extension so the
/// router decides whether it reaches the client.
#[derive(Clone, Debug)]
pub struct InternalErrorDetail(pub String);

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Body vacío o mal formado")]
    EmptyBody,
    #[error("Body mal formado: {0}")]
    MalformedBody(String),
    #[error("Faltan campos obligatorios")]
    MissingFields { fields: Vec<&'static str> },
    #[error("{0}")]
    Validation(String),
    #[error("Acceso no autorizado")]
    Forbidden,
    #[error("Credenciales incorrectas")]
    InvalidCredentials,
    #[error("Sesión no válida o expirada")]
    Unauthenticated,
    #[error("Película no encontrada")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::EmptyBody
            | AppError::MalformedBody(_)
            | AppError::MissingFields { .. }
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::InvalidCredentials | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::MissingFields { fields } => {
                let body = json!({ "error": self.to_string(), "camposRequeridos": fields });
                (status, Json(body)).into_response()
            },
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "unhandled error");
                let mut res = (status, Json(json!({ "error": INTERNAL_ERROR }))).into_response();
                res.extensions_mut().insert(InternalErrorDetail(format!("{err:#}")));
                res
            },
            _ => (status, Json(json!({ "error": self.to_string() }))).into_response(),
        }
    }
}

/// Adds the underlying message to 500 bodies outside production.
pub async fn attach_internal_details(
    State(state): State<Arc<AppState>>,
    res: Response,
) -> Response {
    if state.config.environment.is_production() {
        return res;
    }
    let Some(InternalErrorDetail(detail)) = res.extensions().get::<InternalErrorDetail>().cloned()
    else {
        return res;
    };
    let body = json!({ "error": INTERNAL_ERROR, "message": detail });
    (res.status(), Json(body)).into_response()
}

pub type AppResult<T> = Result<T, AppError>;
