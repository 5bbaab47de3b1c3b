//! Round settlement for Stop and Last Chance declarations.

use serde::{Deserialize, Serialize};

use crate::domain::scoring::{calculate_color_bonus, calculate_score};
use crate::domain::state::{EndChoice, GameState, PlayerState, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRoundScore {
    pub user_id: UserId,
    pub name: String,
    pub card_points: u32,
    pub color_bonus: u32,
    pub total_points: u32,
    pub was_round_ender: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub player_scores: Vec<PlayerRoundScore>,
    pub round_ender: UserId,
    pub choice: EndChoice,
    pub round_ender_won: bool,
}

impl RoundResult {
    pub fn points_for(&self, user_id: &str) -> Option<u32> {
        self.player_scores
            .iter()
            .find(|s| s.user_id == user_id)
            .map(|s| s.total_points)
    }
}

/// Settle the declared round, `None` when no declaration was made.
pub fn calculate_round_scores(state: &GameState) -> Option<RoundResult> {
    let ender = state.round_ender.as_deref()?;
    let choice = state.end_choice?;

    let (player_scores, round_ender_won) = match choice {
        EndChoice::Stop => (settle_stop(&state.players, ender), true),
        EndChoice::LastChance => settle_last_chance(&state.players, ender),
    };

    Some(RoundResult {
        player_scores,
        round_ender: ender.to_string(),
        choice,
        round_ender_won,
    })
}

fn settle_stop(players: &[PlayerState], ender: &str) -> Vec<PlayerRoundScore> {
    players
        .iter()
        .map(|p| {
            let card_points = calculate_score(p);
            PlayerRoundScore {
                user_id: p.user_id.clone(),
                name: p.name.clone(),
                card_points,
                color_bonus: 0,
                total_points: card_points,
                was_round_ender: p.user_id == ender,
            }
        })
        .collect()
}

fn settle_last_chance(players: &[PlayerState], ender: &str) -> (Vec<PlayerRoundScore>, bool) {
    let ender_points = players
        .iter()
        .find(|p| p.user_id == ender)
        .map(calculate_score)
        .unwrap_or(0);
    let best_other = players
        .iter()
        .filter(|p| p.user_id != ender)
        .map(calculate_score)
        .max()
        .unwrap_or(0);
    let ender_won = ender_points > best_other;

    let scores = players
        .iter()
        .map(|p| {
            let card_points = calculate_score(p);
            let color_bonus = calculate_color_bonus(p);
            let was_round_ender = p.user_id == ender;
            let total_points = match (was_round_ender, ender_won) {
                (true, true) => card_points + color_bonus,
                (true, false) => color_bonus,
                (false, true) => color_bonus,
                (false, false) => card_points,
            };
            PlayerRoundScore {
                user_id: p.user_id.clone(),
                name: p.name.clone(),
                card_points,
                color_bonus,
                total_points,
                was_round_ender,
            }
        })
        .collect();

    (scores, ender_won)
}

/// Add each player's round total to their cumulative score.
pub fn apply_round_result(state: &GameState, result: &RoundResult) -> GameState {
    let mut next = state.clone();
    for player in &mut next.players {
        if let Some(points) = result.points_for(&player.user_id) {
            player.score += points;
        }
    }
    next
}

/// Highest cumulative score among players at or over the target; the
/// earliest seat wins ties.
pub fn leader_at_target(state: &GameState) -> Option<&PlayerState> {
    state
        .players
        .iter()
        .filter(|p| p.score >= state.target_score)
        .fold(None, |best: Option<&PlayerState>, p| match best {
            Some(b) if b.score >= p.score => Some(b),
            _ => Some(p),
        })
}

/// Highest cumulative score overall; the earliest seat wins ties.
pub fn overall_leader(state: &GameState) -> Option<&PlayerState> {
    state
        .players
        .iter()
        .fold(None, |best: Option<&PlayerState>, p| match best {
            Some(b) if b.score >= p.score => Some(b),
            _ => Some(p),
        })
}
