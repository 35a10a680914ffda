use std::{convert::Infallible, sync::Arc};

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::CookieJar;
use serde::de::DeserializeOwned;

use crate::{
    AppState,
    auth::{SESSION_COOKIE, Session},
    error::AppError,
};

/// JSON body that must be a non-empty object.
///
/// Absent, blank, non-JSON, non-object and `{}` bodies are all rejected with
/// `AppError::EmptyBody` before any field is looked at.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| AppError::MalformedBody(err.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::EmptyBody);
        }

        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|_| AppError::EmptyBody)?;
        match &value {
            serde_json::Value::Object(map) if !map.is_empty() => {},
            _ => return Err(AppError::EmptyBody),
        }

        let parsed =
            serde_json::from_value(value).map_err(|err| AppError::MalformedBody(err.to_string()))?;
        Ok(Self(parsed))
    }
}

/// The login session attached to the request, if any and still valid.
pub struct CurrentSession(pub Option<Session>);

impl FromRequestParts<Arc<AppState>> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            return Ok(Self(None));
        };
        Ok(Self(state.sessions.resolve(&token).await))
    }
}

/// Bearer token first, then the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}
