//! Hand-built cards and states for domain unit tests.

use uuid::Uuid;

use crate::domain::state::{GameState, GameStatus, PlayerState, RoundPhase, TurnState};
use crate::domain::{Card, CardColor, CardType};

fn kind_of(id: &str) -> CardType {
    let prefix = id.split('_').next().unwrap_or(id);
    CardType::ALL
        .into_iter()
        .find(|k| k.as_str() == prefix)
        .unwrap_or_else(|| panic!("unknown card prefix in {id}"))
}

/// Card from a catalog-style id (`crab_1`, `marine_imp`) in the given color.
pub fn card_in(id: &str, color: CardColor) -> Card {
    Card {
        id: id.to_string(),
        kind: kind_of(id),
        color,
        improve: id.ends_with("_imp"),
    }
}

/// Card from a catalog-style id, all in the same color.
pub fn card(id: &str) -> Card {
    card_in(id, CardColor::DarkBlue)
}

pub fn cards(ids: &[&str]) -> Vec<Card> {
    ids.iter().map(|id| card(id)).collect()
}

pub fn player_with(user_id: &str, hand: Vec<Card>) -> PlayerState {
    let mut p = PlayerState::new(user_id, format!("Player {user_id}"));
    p.hand = hand;
    p
}

/// A playing two-seat game with explicit containers, `p1` to act, phase `draw`.
pub fn two_player_game(p1_hand: Vec<Card>, p2_hand: Vec<Card>, deck: Vec<Card>) -> GameState {
    GameState {
        id: Uuid::nil(),
        room_code: "ABCDE".to_string(),
        status: GameStatus::Playing,
        players: vec![player_with("p1", p1_hand), player_with("p2", p2_hand)],
        current_player_index: 0,
        deck,
        discard_pile1: vec![card("shell_5")],
        discard_pile2: vec![card("octopus_5")],
        turn: TurnState::Idle,
        round_number: 1,
        round_phase: RoundPhase::Draw,
        round_ender: None,
        end_choice: None,
        last_chance_played: Vec::new(),
        created_at: 0,
        started_at: Some(0),
        target_score: 40,
        version: 0,
        turn_seq: 0,
    }
}

/// Same as [`two_player_game`] but already past the draw step.
pub fn in_play_duo(mut state: GameState) -> GameState {
    state.round_phase = RoundPhase::PlayDuo;
    state
}

/// Hand worth exactly 8 points: two crab duos, one boat duo, one fish duo.
pub fn eight_point_hand() -> Vec<Card> {
    cards(&[
        "crab_1", "crab_2", "crab_3", "crab_4", "boat_1", "boat_2", "fish_1", "fish_2",
    ])
}
