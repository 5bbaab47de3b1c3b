//! Persistence sink for finished matches.
//!
//! Only two-player games produce a record. Recording is best effort: the
//! game server hands the record over after `game:ended` went out and only
//! logs a failure.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::adapters::game_results_sea::{self, GameResultCreate};
use crate::domain::state::{GameState, UserId};
use crate::error::AppError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEndReason {
    ScoreReached,
    ImmediateWin,
    HostStopped,
}

impl GameEndReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            GameEndReason::ScoreReached => "score_reached",
            GameEndReason::ImmediateWin => "immediate_win",
            GameEndReason::HostStopped => "host_stopped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub player1_id: UserId,
    pub player2_id: UserId,
    pub winner_id: UserId,
    pub player1_score: u32,
    pub player2_score: u32,
    pub duration_seconds: u64,
    pub reason: GameEndReason,
}

impl MatchRecord {
    /// Record for a finished game, `None` unless exactly two players sat.
    pub fn from_final_state(
        state: &GameState,
        winner_id: &str,
        reason: GameEndReason,
        now_ms: i64,
    ) -> Option<Self> {
        let [p1, p2] = state.players.as_slice() else {
            return None;
        };
        let started = state.started_at.unwrap_or(state.created_at);
        let duration_seconds = u64::try_from((now_ms - started).max(0) / 1000).unwrap_or(0);

        Some(Self {
            player1_id: p1.user_id.clone(),
            player2_id: p2.user_id.clone(),
            winner_id: winner_id.to_string(),
            player1_score: p1.score,
            player2_score: p2.score,
            duration_seconds,
            reason,
        })
    }
}

#[async_trait]
pub trait MatchRecorder: Send + Sync {
    async fn record(&self, record: MatchRecord) -> Result<(), AppError>;
}

/// Writes the record to the log only. Used when no database is configured.
#[derive(Debug, Default)]
pub struct LogMatchRecorder;

#[async_trait]
impl MatchRecorder for LogMatchRecorder {
    async fn record(&self, record: MatchRecord) -> Result<(), AppError> {
        info!(
            player1_id = %record.player1_id,
            player2_id = %record.player2_id,
            winner_id = %record.winner_id,
            player1_score = record.player1_score,
            player2_score = record.player2_score,
            duration_seconds = record.duration_seconds,
            reason = record.reason.as_str(),
            "Match finished"
        );
        Ok(())
    }
}

/// Inserts one `game_results` row per match.
#[derive(Debug, Clone)]
pub struct SeaOrmMatchRecorder {
    db: DatabaseConnection,
}

impl SeaOrmMatchRecorder {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_i32(value: u64, field: &str) -> Result<i32, AppError> {
    i32::try_from(value).map_err(|_| AppError::internal(format!("{field} out of range: {value}")))
}

#[async_trait]
impl MatchRecorder for SeaOrmMatchRecorder {
    async fn record(&self, record: MatchRecord) -> Result<(), AppError> {
        let dto = GameResultCreate {
            player1_score: to_i32(record.player1_score.into(), "player1_score")?,
            player2_score: to_i32(record.player2_score.into(), "player2_score")?,
            duration_seconds: to_i32(record.duration_seconds, "duration_seconds")?,
            player1_id: record.player1_id,
            player2_id: record.player2_id,
            winner_id: record.winner_id,
            reason: record.reason.as_str().to_string(),
        };
        let row = game_results_sea::insert_game_result(&self.db, dto).await?;
        info!(result_id = row.id, "Match result stored");
        Ok(())
    }
}
