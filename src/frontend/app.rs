use super::{
    client::{ApiClient, ClientError},
    storage::{ClientStorage, StoredSession},
    view::{CatalogView, CatalogViewModel, MovieDetail},
};
use crate::models::{ADMIN_ROLE, DeleteResponse, LoginResponse, Movie, MovieFields};

/// Catalog browser: view-model state kept in sync with the API and the
/// persisted admin flag.
pub struct CatalogApp {
    client: ApiClient,
    storage: ClientStorage,
    view: CatalogViewModel,
}

impl CatalogApp {
    pub fn new(client: ApiClient, storage: ClientStorage) -> Self {
        Self { client, storage, view: CatalogViewModel::default() }
    }

    /// Restores a stored admin session, then fetches the catalog.
    pub async fn start(client: ApiClient, storage: ClientStorage) -> Result<Self, ClientError> {
        let mut app = Self::new(client, storage);
        app.restore().await?;
        app.load().await?;
        Ok(app)
    }

    pub fn view_model(&self) -> &CatalogViewModel {
        &self.view
    }

    pub fn render(&self) -> CatalogView {
        self.view.render()
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        let movies = self.client.list_movies().await?;
        self.view.set_movies(movies);
        Ok(())
    }

    /// The stored flag is only trusted after the server confirms the token.
    pub async fn restore(&mut self) -> Result<bool, ClientError> {
        let stored = self.storage.load()?;
        let Some(token) = stored.token.filter(|_| stored.is_admin) else {
            if stored.is_admin {
                self.storage.clear()?;
            }
            return Ok(false);
        };

        self.client.set_token(Some(token));
        match self.client.session().await {
            Ok(info) if info.role == ADMIN_ROLE => {
                self.view.login_succeeded();
                Ok(true)
            },
            Ok(_) | Err(ClientError::Api { status: 401, .. }) => {
                tracing::debug!("stored session no longer valid");
                self.client.set_token(None);
                self.storage.clear()?;
                Ok(false)
            },
            Err(err) => Err(err),
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let res = self.client.login(username, password).await?;
        if res.role == ADMIN_ROLE {
            self.storage.save(&StoredSession { is_admin: true, token: Some(res.token.clone()) })?;
            self.view.login_succeeded();
        }
        Ok(res)
    }

    pub async fn logout(&mut self) -> Result<(), ClientError> {
        if let Err(err) = self.client.logout().await {
            tracing::warn!(error = %err, "logout request failed");
            self.client.set_token(None);
        }
        self.storage.clear()?;
        self.view.logged_out();
        Ok(())
    }

    pub fn filter(&mut self, genre: &str) -> CatalogView {
        self.view.set_filter(genre);
        self.view.render()
    }

    pub async fn show_detail(&self, id: i64) -> Result<MovieDetail, ClientError> {
        let movie = self.client.get_movie(id).await?;
        Ok(self.view.detail(&movie))
    }

    /// Prefilled form for editing an existing movie.
    pub async fn edit_form(&self, id: i64) -> Result<MovieFields, ClientError> {
        let movie = self.client.get_movie(id).await?;
        let date = movie.release_date.split('T').next().unwrap_or_default().to_string();
        Ok(MovieFields {
            title: Some(movie.title),
            synopsis: Some(movie.synopsis),
            release_date: Some(date),
            genre: Some(movie.genre),
            duration: Some(movie.duration),
            director: Some(movie.director),
            cast: Some(movie.cast),
            poster_url: Some(movie.poster_url),
            trailer_url: Some(movie.trailer_url),
            admin_key: None,
        })
    }

    /// Creates when `id` is `None`, updates otherwise, then reloads the list.
    pub async fn save(&mut self, id: Option<i64>, fields: MovieFields) -> Result<Movie, ClientError> {
        if !self.view.is_admin() {
            return Err(ClientError::NotAdmin);
        }
        let movie = match id {
            Some(id) => self.client.update_movie(id, &fields).await?,
            None => self.client.create_movie(&fields).await?,
        };
        self.load().await?;
        Ok(movie)
    }

    pub async fn delete(&mut self, id: i64) -> Result<DeleteResponse, ClientError> {
        if !self.view.is_admin() {
            return Err(ClientError::NotAdmin);
        }
        let res = self.client.delete_movie(id).await?;
        self.load().await?;
        Ok(res)
    }
}
