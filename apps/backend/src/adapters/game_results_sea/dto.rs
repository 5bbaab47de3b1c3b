//! DTOs for the game_results adapter.

/// Row to insert for one finished match.
#[derive(Debug, Clone)]
pub struct GameResultCreate {
    pub player1_id: String,
    pub player2_id: String,
    pub winner_id: String,
    pub player1_score: i32,
    pub player2_score: i32,
    pub duration_seconds: i32,
    pub reason: String,
}
