use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Usuarios::Table)
                    .if_not_exists()
                    .col(pk_auto(Usuarios::Id))
                    .col(string_len_uniq(Usuarios::Username, 100))
                    .col(string_len(Usuarios::Password, 255))
                    .col(string_len(Usuarios::Role, 50).default("user"))
                    .col(string(Usuarios::FechaCreacion))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Usuarios::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Usuarios {
    Table,
    Id,
    Username,
    Password,
    Role,
    FechaCreacion,
}
