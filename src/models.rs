use serde::{Deserialize, Deserializer, Serialize};

pub const UNSPECIFIED: &str = "No especificado";
pub const DEFAULT_DURATION: &str = "120";
pub const DEFAULT_ROLE: &str = "user";
pub const ADMIN_ROLE: &str = "admin";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "sinopsis")]
    pub synopsis: String,
    #[serde(rename = "fecha")]
    pub release_date: String,
    #[serde(rename = "genero")]
    pub genre: String,
    #[serde(rename = "duracion")]
    pub duration: String,
    pub director: String,
    #[serde(rename = "actores")]
    pub cast: String,
    #[serde(rename = "imagen")]
    pub poster_url: String,
    #[serde(rename = "trailer", default)]
    pub trailer_url: String,
    #[serde(rename = "fechaCreacion", default)]
    pub created_at: String,
}

impl Movie {
    pub fn from_new(id: i64, created_at: String, new: NewMovie) -> Self {
        Self {
            id,
            title: new.title,
            synopsis: new.synopsis,
            release_date: new.release_date,
            genre: new.genre,
            duration: new.duration,
            director: new.director,
            cast: new.cast,
            poster_url: new.poster_url,
            trailer_url: new.trailer_url,
            created_at,
        }
    }

    /// Overwrites the fields present in `patch`; `id` and `created_at` never change.
    pub fn apply(&mut self, patch: &MoviePatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(synopsis) = &patch.synopsis {
            self.synopsis = synopsis.clone();
        }
        if let Some(date) = &patch.release_date {
            self.release_date = date.clone();
        }
        if let Some(genre) = &patch.genre {
            self.genre = genre.clone();
        }
        if let Some(duration) = &patch.duration {
            self.duration = duration.clone();
        }
        if let Some(director) = &patch.director {
            self.director = director.clone();
        }
        if let Some(cast) = &patch.cast {
            self.cast = cast.clone();
        }
        if let Some(poster) = &patch.poster_url {
            self.poster_url = poster.clone();
        }
        if let Some(trailer) = &patch.trailer_url {
            self.trailer_url = trailer.clone();
        }
    }
}

/// A validated movie without the server-assigned `id` and `created_at`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub synopsis: String,
    pub release_date: String,
    pub genre: String,
    pub duration: String,
    pub director: String,
    pub cast: String,
    pub poster_url: String,
    pub trailer_url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub synopsis: Option<String>,
    pub release_date: Option<String>,
    pub genre: Option<String>,
    pub duration: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(rename = "fechaCreacion", default)]
    pub created_at: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

/// Body of `POST /api/peliculas` and `PUT /api/peliculas/{id}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MovieFields {
    #[serde(rename = "titulo", default, deserialize_with = "text_field", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "sinopsis", default, deserialize_with = "text_field", skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    #[serde(rename = "fecha", default, deserialize_with = "text_field", skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(rename = "genero", default, deserialize_with = "text_field", skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(rename = "duracion", default, deserialize_with = "duration_field", skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "text_field", skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(rename = "actores", default, deserialize_with = "text_field", skip_serializing_if = "Option::is_none")]
    pub cast: Option<String>,
    #[serde(rename = "imagen", default, deserialize_with = "text_field", skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(rename = "trailer", default, deserialize_with = "text_field", skip_serializing_if = "Option::is_none")]
    pub trailer_url: Option<String>,
    #[serde(rename = "adminKey", default, skip_serializing_if = "Option::is_none")]
    pub admin_key: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DeleteRequest {
    #[serde(rename = "adminKey", default, skip_serializing_if = "Option::is_none")]
    pub admin_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
    pub id: i64,
    #[serde(rename = "peliculasRestantes")]
    pub remaining: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    /// Reads credentials from any body. Whatever is missing, non-JSON or not
    /// a string becomes empty, which no stored user matches.
    pub fn from_body(bytes: &[u8]) -> Self {
        let value: serde_json::Value = serde_json::from_slice(bytes).unwrap_or_default();
        let text = |key: &str| {
            value.get(key).and_then(|v| v.as_str()).unwrap_or_default().to_string()
        };
        Self { username: text("username"), password: text("password") }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub username: String,
    pub role: String,
    pub message: String,
    pub token: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub username: String,
    pub role: String,
}

/// Accepts strings and numbers; `null` counts as absent.
fn text_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

/// Like [`text_field`], but `0` and `false` also count as absent so the
/// default or previous duration applies.
fn duration_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => Ok(None),
        Some(serde_json::Value::Bool(true)) => Ok(Some("true".to_string())),
        Some(serde_json::Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}
