//! SeaORM adapter for finished match results.

use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{ActiveModelTrait, ConnectionTrait, NotSet, Schema, Set};

use crate::entities::game_results;

pub mod dto;

pub use dto::GameResultCreate;

// Adapter functions return DbErr; callers map to AppError via From<DbErr>.

pub async fn insert_game_result<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameResultCreate,
) -> Result<game_results::Model, sea_orm::DbErr> {
    let active = game_results::ActiveModel {
        id: NotSet,
        player1_id: Set(dto.player1_id),
        player2_id: Set(dto.player2_id),
        winner_id: Set(dto.winner_id),
        player1_score: Set(dto.player1_score),
        player2_score: Set(dto.player2_score),
        duration_seconds: Set(dto.duration_seconds),
        reason: Set(dto.reason),
        ended_at: Set(time::OffsetDateTime::now_utc()),
    };

    active.insert(conn).await
}

/// Create `game_results` when the database does not have it yet.
pub async fn ensure_table<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<(), sea_orm::DbErr> {
    let schema = Schema::new(conn.get_database_backend());
    let mut stmt: TableCreateStatement = schema.create_table_from_entity(game_results::Entity);
    stmt.if_not_exists();
    conn.execute(conn.get_database_backend().build(&stmt)).await?;
    Ok(())
}
