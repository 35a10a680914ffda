use std::sync::Arc;

use tracing::info;

use crate::{
    auth::Session,
    error::{AppError, AppResult},
    models::{
        DEFAULT_DURATION, DeleteResponse, Movie, MovieFields, MoviePatch, NewMovie, UNSPECIFIED,
    },
    store::MovieStore,
};

/// Who is asking for a mutation: the shared admin key from the body and/or
/// the session resolved from the request.
#[derive(Clone, Copy, Debug, Default)]
pub struct Credentials<'a> {
    pub admin_key: Option<&'a str>,
    pub session: Option<&'a Session>,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn MovieStore>,
    admin_key: String,
    fallback_poster_url: String,
}

impl CatalogService {
    pub fn new(store: Arc<dyn MovieStore>, admin_key: String, fallback_poster_url: String) -> Self {
        Self { store, admin_key, fallback_poster_url }
    }

    pub fn store(&self) -> &dyn MovieStore {
        &*self.store
    }

    pub async fn list(&self) -> AppResult<Vec<Movie>> {
        self.store.list_movies().await
    }

    pub async fn get(&self, id: i64) -> AppResult<Movie> {
        self.store.get_movie(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn create(&self, fields: MovieFields, creds: Credentials<'_>) -> AppResult<Movie> {
        self.authorize(creds)?;
        let new = self.new_movie(fields)?;
        let movie = self.store.insert_movie(new).await?;
        info!(movie_id = movie.id, title = %movie.title, "movie created");
        Ok(movie)
    }

    pub async fn update(
        &self,
        id: i64,
        fields: MovieFields,
        creds: Credentials<'_>,
    ) -> AppResult<Movie> {
        self.authorize(creds)?;
        let patch = self.patch(fields)?;
        let movie = self.store.update_movie(id, &patch).await?.ok_or(AppError::NotFound)?;
        info!(movie_id = id, "movie updated");
        Ok(movie)
    }

    pub async fn delete(&self, id: i64, creds: Credentials<'_>) -> AppResult<DeleteResponse> {
        self.authorize(creds)?;
        let id = self.store.delete_movie(id).await?.ok_or(AppError::NotFound)?;
        let remaining = self.store.count_movies().await?;
        info!(movie_id = id, remaining, "movie deleted");
        Ok(DeleteResponse {
            success: true,
            message: "Película eliminada exitosamente".to_string(),
            id,
            remaining,
        })
    }

    pub fn authorize(&self, creds: Credentials<'_>) -> AppResult<()> {
        if creds.session.is_some_and(Session::is_admin) {
            return Ok(());
        }
        if creds.admin_key == Some(self.admin_key.as_str()) {
            return Ok(());
        }
        info!(has_session = creds.session.is_some(), "mutation rejected");
        Err(AppError::Forbidden)
    }

    fn new_movie(&self, fields: MovieFields) -> AppResult<NewMovie> {
        let title = non_blank(fields.title);
        let synopsis = non_blank(fields.synopsis);
        let release_date = non_blank(fields.release_date);

        let (Some(title), Some(synopsis), Some(release_date)) = (title, synopsis, release_date)
        else {
            return Err(AppError::MissingFields { fields: vec!["titulo", "sinopsis", "fecha"] });
        };

        Ok(NewMovie {
            title,
            synopsis,
            release_date,
            genre: non_blank(fields.genre).unwrap_or_else(|| UNSPECIFIED.to_string()),
            duration: non_blank(fields.duration).unwrap_or_else(|| DEFAULT_DURATION.to_string()),
            director: non_blank(fields.director).unwrap_or_else(|| UNSPECIFIED.to_string()),
            cast: non_blank(fields.cast).unwrap_or_else(|| UNSPECIFIED.to_string()),
            poster_url: poster_or_fallback(fields.poster_url.as_deref(), &self.fallback_poster_url),
            trailer_url: fields.trailer_url.map(|t| t.trim().to_string()).unwrap_or_default(),
        })
    }

    fn patch(&self, fields: MovieFields) -> AppResult<MoviePatch> {
        let required = |value: Option<String>, name: &str| match value {
            None => Ok(None),
            Some(v) if v.trim().is_empty() => {
                Err(AppError::Validation(format!("El campo {name} no puede estar vacío")))
            },
            Some(v) => Ok(Some(v.trim().to_string())),
        };
        let optional = |value: Option<String>| {
            value.map(|v| non_blank(Some(v)).unwrap_or_else(|| UNSPECIFIED.to_string()))
        };

        Ok(MoviePatch {
            title: required(fields.title, "titulo")?,
            synopsis: required(fields.synopsis, "sinopsis")?,
            release_date: required(fields.release_date, "fecha")?,
            genre: optional(fields.genre),
            duration: non_blank(fields.duration),
            director: optional(fields.director),
            cast: optional(fields.cast),
            poster_url: fields
                .poster_url
                .map(|p| poster_or_fallback(Some(p.as_str()), &self.fallback_poster_url)),
            trailer_url: fields.trailer_url.map(|t| t.trim().to_string()),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Any poster that is missing or not `http`-prefixed is replaced, never rejected.
pub fn poster_or_fallback(url: Option<&str>, fallback: &str) -> String {
    match url.map(str::trim) {
        Some(url) if url.starts_with("http") => url.to_string(),
        _ => fallback.to_string(),
    }
}
