use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Peliculas::Table)
                    .if_not_exists()
                    .col(pk_auto(Peliculas::Id))
                    .col(string_len(Peliculas::Titulo, 255))
                    .col(text(Peliculas::Sinopsis))
                    .col(string(Peliculas::Fecha))
                    .col(string_len(Peliculas::Genero, 100))
                    .col(string_len(Peliculas::Duracion, 10))
                    .col(string_len(Peliculas::Director, 255))
                    .col(text(Peliculas::Actores))
                    .col(text(Peliculas::Imagen))
                    .col(text(Peliculas::Trailer))
                    .col(string(Peliculas::FechaCreacion))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_peliculas_genero")
                    .table(Peliculas::Table)
                    .col(Peliculas::Genero)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Peliculas::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Peliculas {
    Table,
    Id,
    Titulo,
    Sinopsis,
    Fecha,
    Genero,
    Duracion,
    Director,
    Actores,
    Imagen,
    Trailer,
    FechaCreacion,
}
