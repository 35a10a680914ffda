use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{MovieStore, now_rfc3339};
use crate::{
    error::AppResult,
    models::{ADMIN_ROLE, Movie, MoviePatch, NewMovie, User},
    seed,
};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    peliculas: Vec<Movie>,
    #[serde(default)]
    usuarios: Vec<User>,
}

struct State {
    doc: Document,
    last_id: i64,
}

/// Whole-document store. Every mutation runs under one lock, is written to a
/// temporary file and renamed into place, and only then becomes visible.
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<State>,
}

impl JsonFileStore {
    pub async fn open(path: &Path, admin_password: &str) -> anyhow::Result<Self> {
        let doc = match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice::<Document>(&bytes)
                .with_context(|| format!("parsing {}", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let doc = initial_document(admin_password);
                write_document(path, &doc).await?;
                tracing::info!(path = %path.display(), "data file initialised with sample data");
                doc
            },
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            },
        };

        let last_id = doc.peliculas.iter().map(|m| m.id).max().unwrap_or(0);
        Ok(Self { path: path.to_path_buf(), state: Mutex::new(State { doc, last_id }) })
    }

    async fn commit(&self, state: &mut State, doc: Document) -> AppResult<()> {
        write_document(&self.path, &doc).await?;
        state.doc = doc;
        Ok(())
    }
}

#[async_trait::async_trait]
impl MovieStore for JsonFileStore {
    async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        let state = self.state.lock().await;
        let mut movies = state.doc.peliculas.clone();
        movies.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(movies)
    }

    async fn get_movie(&self, id: i64) -> AppResult<Option<Movie>> {
        let state = self.state.lock().await;
        Ok(state.doc.peliculas.iter().find(|m| m.id == id).cloned())
    }

    async fn insert_movie(&self, movie: NewMovie) -> AppResult<Movie> {
        let mut state = self.state.lock().await;

        let id = next_id(state.last_id, jiff::Timestamp::now().as_millisecond());
        let movie = Movie::from_new(id, now_rfc3339(), movie);

        let mut doc = state.doc.clone();
        doc.peliculas.push(movie.clone());
        self.commit(&mut state, doc).await?;
        state.last_id = id;

        Ok(movie)
    }

    async fn update_movie(&self, id: i64, patch: &MoviePatch) -> AppResult<Option<Movie>> {
        let mut state = self.state.lock().await;

        let mut doc = state.doc.clone();
        let Some(movie) = doc.peliculas.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        movie.apply(patch);
        let updated = movie.clone();

        self.commit(&mut state, doc).await?;
        Ok(Some(updated))
    }

    async fn delete_movie(&self, id: i64) -> AppResult<Option<i64>> {
        let mut state = self.state.lock().await;

        let mut doc = state.doc.clone();
        let before = doc.peliculas.len();
        doc.peliculas.retain(|m| m.id != id);
        if doc.peliculas.len() == before {
            return Ok(None);
        }

        self.commit(&mut state, doc).await?;
        Ok(Some(id))
    }

    async fn count_movies(&self) -> AppResult<u64> {
        let state = self.state.lock().await;
        Ok(state.doc.peliculas.len() as u64)
    }

    async fn find_user(&self, username: &str, password: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .doc
            .usuarios
            .iter()
            .find(|u| u.username == username && u.password == password)
            .cloned())
    }
}

/// Millisecond timestamp ids, bumped past the largest id handed out so far.
fn next_id(last_id: i64, now_ms: i64) -> i64 {
    now_ms.max(last_id.saturating_add(1))
}

fn initial_document(admin_password: &str) -> Document {
    let created_at = now_rfc3339();
    let peliculas = seed::sample_movies()
        .into_iter()
        .zip(1..)
        .map(|(movie, id)| Movie::from_new(id, created_at.clone(), movie))
        .collect();
    let usuarios = vec![User {
        id: 1,
        username: seed::ADMIN_USERNAME.to_string(),
        password: admin_password.to_string(),
        role: ADMIN_ROLE.to_string(),
        created_at,
    }];
    Document { peliculas, usuarios }
}

async fn write_document(path: &Path, doc: &Document) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let bytes = serde_json::to_vec_pretty(doc)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
