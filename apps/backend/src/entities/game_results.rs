use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "player1_id")]
    pub player1_id: String,
    #[sea_orm(column_name = "player2_id")]
    pub player2_id: String,
    #[sea_orm(column_name = "winner_id")]
    pub winner_id: String,
    #[sea_orm(column_name = "player1_score")]
    pub player1_score: i32,
    #[sea_orm(column_name = "player2_score")]
    pub player2_score: i32,
    #[sea_orm(column_name = "duration_seconds")]
    pub duration_seconds: i32,
    pub reason: String,
    #[sea_orm(column_name = "ended_at")]
    pub ended_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
