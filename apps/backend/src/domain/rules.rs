//! Fixed rule constants.

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Cards popped by a single deck draw.
pub const DECK_DRAW_COUNT: usize = 2;

/// Minimum card points required to end a round.
pub const MIN_POINTS_TO_END_ROUND: u32 = 7;

/// Sirene cards in `playedCards` that win the game outright.
pub const SIRENS_FOR_IMMEDIATE_WIN: usize = 4;

/// Cumulative score that ends the game, by player count.
pub fn target_score_for(player_count: usize) -> u32 {
    match player_count {
        2 => 40,
        3 => 35,
        _ => 30,
    }
}

pub fn valid_player_count(count: usize) -> bool {
    (MIN_PLAYERS..=MAX_PLAYERS).contains(&count)
}
