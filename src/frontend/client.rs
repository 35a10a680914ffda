use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};

use crate::models::{
    DeleteRequest, DeleteResponse, LoginRequest, LoginResponse, Movie, MovieFields, SessionInfo,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] wreq::Error),
    #[error("{message} ({status})")]
    Api { status: u16, message: String },
    #[error("No autorizado")]
    NotAdmin,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Thin JSON client for the `/api` surface.
#[derive(Clone)]
pub struct ApiClient {
    http: wreq::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` points at the API root, e.g. `http://localhost:3000/api`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = wreq::Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { http, base_url: base_url.into().trim_end_matches('/').to_string(), token: None })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub async fn list_movies(&self) -> Result<Vec<Movie>, ClientError> {
        let resp = self.http.get(self.url("/peliculas")).send().await?;
        decode(resp).await
    }

    pub async fn get_movie(&self, id: i64) -> Result<Movie, ClientError> {
        let resp = self.http.get(self.url(&format!("/peliculas/{id}"))).send().await?;
        decode(resp).await
    }

    pub async fn create_movie(&self, fields: &MovieFields) -> Result<Movie, ClientError> {
        self.send_json(wreq::Method::POST, "/peliculas", fields).await
    }

    pub async fn update_movie(&self, id: i64, fields: &MovieFields) -> Result<Movie, ClientError> {
        self.send_json(wreq::Method::PUT, &format!("/peliculas/{id}"), fields).await
    }

    pub async fn delete_movie(&self, id: i64) -> Result<DeleteResponse, ClientError> {
        let body = DeleteRequest { admin_key: None, id: Some(id) };
        self.send_json(wreq::Method::DELETE, &format!("/peliculas/{id}"), &body).await
    }

    /// Keeps the issued token for subsequent requests.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest { username: username.to_string(), password: password.to_string() };
        let res: LoginResponse = self.send_json(wreq::Method::POST, "/login", &body).await?;
        self.token = Some(res.token.clone());
        Ok(res)
    }

    pub async fn logout(&mut self) -> Result<(), ClientError> {
        let resp = self.authorized(self.http.post(self.url("/logout"))).send().await?;
        self.token = None;
        decode::<serde_json::Value>(resp).await.map(|_| ())
    }

    pub async fn session(&self) -> Result<SessionInfo, ClientError> {
        let resp = self.authorized(self.http.get(self.url("/session"))).send().await?;
        decode(resp).await
    }

    async fn send_json<B, T>(&self, method: wreq::Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.http.request(method, self.url(path)).json(body);
        let resp = self.authorized(req).send().await?;
        decode(resp).await
    }

    fn authorized(&self, req: wreq::RequestBuilder) -> wreq::RequestBuilder {
        match &self.token {
            Some(token) => req.header(wreq::header::AUTHORIZATION, format!("Bearer {token}")),
            None => req,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn decode<T: DeserializeOwned>(resp: wreq::Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let message = resp
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| status.to_string());
    Err(ClientError::Api { status: status.as_u16(), message })
}
