use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Unchanged},
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::{MovieStore, now_rfc3339};
use crate::{
    entities::{pelicula, usuario},
    error::AppResult,
    models::{Movie, MoviePatch, NewMovie, User},
};

#[derive(Clone)]
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl MovieStore for SqlStore {
    async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        let rows = pelicula::Entity::find()
            .order_by_desc(pelicula::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn get_movie(&self, id: i64) -> AppResult<Option<Movie>> {
        let row = pelicula::Entity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(Movie::from))
    }

    async fn insert_movie(&self, movie: NewMovie) -> AppResult<Movie> {
        let model = pelicula::ActiveModel {
            id: NotSet,
            titulo: Set(movie.title),
            sinopsis: Set(movie.synopsis),
            fecha: Set(movie.release_date),
            genero: Set(movie.genre),
            duracion: Set(movie.duration),
            director: Set(movie.director),
            actores: Set(movie.cast),
            imagen: Set(movie.poster_url),
            trailer: Set(movie.trailer_url),
            fecha_creacion: Set(now_rfc3339()),
        };
        let row = model.insert(&self.db).await?;
        Ok(row.into())
    }

    async fn update_movie(&self, id: i64, patch: &MoviePatch) -> AppResult<Option<Movie>> {
        let txn = self.db.begin().await?;

        let Some(row) = pelicula::Entity::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        let mut movie = Movie::from(row);
        movie.apply(patch);

        let model = pelicula::ActiveModel {
            id: Unchanged(movie.id),
            titulo: Set(movie.title),
            sinopsis: Set(movie.synopsis),
            fecha: Set(movie.release_date),
            genero: Set(movie.genre),
            duracion: Set(movie.duration),
            director: Set(movie.director),
            actores: Set(movie.cast),
            imagen: Set(movie.poster_url),
            trailer: Set(movie.trailer_url),
            fecha_creacion: Unchanged(movie.created_at),
        };
        let row = model.update(&txn).await?;

        txn.commit().await?;

        Ok(Some(row.into()))
    }

    async fn delete_movie(&self, id: i64) -> AppResult<Option<i64>> {
        let res = pelicula::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok((res.rows_affected > 0).then_some(id))
    }

    async fn count_movies(&self) -> AppResult<u64> {
        Ok(pelicula::Entity::find().count(&self.db).await?)
    }

    async fn find_user(&self, username: &str, password: &str) -> AppResult<Option<User>> {
        let row = usuario::Entity::find()
            .filter(usuario::Column::Username.eq(username))
            .filter(usuario::Column::Password.eq(password))
            .one(&self.db)
            .await?;
        Ok(row.map(User::from))
    }
}
