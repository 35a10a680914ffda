use sea_orm::entity::prelude::*;

use crate::models::Movie;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "peliculas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub titulo: String,
    pub sinopsis: String,
    pub fecha: String,
    pub genero: String,
    pub duracion: String,
    pub director: String,
    pub actores: String,
    pub imagen: String,
    pub trailer: String,
    pub fecha_creacion: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Movie {
    fn from(row: Model) -> Self {
        Movie {
            id: row.id,
            title: row.titulo,
            synopsis: row.sinopsis,
            release_date: row.fecha,
            genre: row.genero,
            duration: row.duracion,
            director: row.director,
            cast: row.actores,
            poster_url: row.imagen,
            trailer_url: row.trailer,
            created_at: row.fecha_creacion,
        }
    }
}
