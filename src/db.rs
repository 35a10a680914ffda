use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set, Statement,
};

use crate::{
    entities::{pelicula, usuario},
    error::AppResult,
    models::ADMIN_ROLE,
    seed,
    store::now_rfc3339,
};

pub async fn connect_and_migrate(database_url: &str) -> AppResult<DatabaseConnection> {
    let db = Database::connect(database_url).await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA journal_mode=WAL".to_string(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA synchronous=NORMAL".to_string(),
    ))
    .await?;

    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Provisions the admin user and the sample catalog when they are missing.
pub async fn seed(db: &DatabaseConnection, admin_password: &str) -> AppResult<()> {
    let admin = usuario::Entity::find()
        .filter(usuario::Column::Username.eq(seed::ADMIN_USERNAME))
        .one(db)
        .await?;

    if admin.is_none() {
        let model = usuario::ActiveModel {
            id: NotSet,
            username: Set(seed::ADMIN_USERNAME.to_string()),
            password: Set(admin_password.to_string()),
            role: Set(ADMIN_ROLE.to_string()),
            fecha_creacion: Set(now_rfc3339()),
        };
        usuario::Entity::insert(model).exec(db).await?;
        tracing::info!(username = seed::ADMIN_USERNAME, "admin user created");
    }

    if pelicula::Entity::find().count(db).await? == 0 {
        let now = now_rfc3339();
        let models = seed::sample_movies().into_iter().map(|m| pelicula::ActiveModel {
            id: NotSet,
            titulo: Set(m.title),
            sinopsis: Set(m.synopsis),
            fecha: Set(m.release_date),
            genero: Set(m.genre),
            duracion: Set(m.duration),
            director: Set(m.director),
            actores: Set(m.cast),
            imagen: Set(m.poster_url),
            trailer: Set(m.trailer_url),
            fecha_creacion: Set(now.clone()),
        });
        pelicula::Entity::insert_many(models).exec(db).await?;
        tracing::info!("sample movies added");
    }

    Ok(())
}
