//! Table bootstrap derived from the entity definitions.

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};

use super::entity::{comment, like, post, post_tag, user};

/// Create every table that does not exist yet, parents before children.
pub async fn create_tables<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    create_table(db, user::Entity).await?;
    create_table(db, post::Entity).await?;
    create_table(db, comment::Entity).await?;
    create_table(db, like::Entity).await?;
    create_table(db, post_tag::Entity).await?;

    tracing::info!("Database schema ready");
    Ok(())
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}
