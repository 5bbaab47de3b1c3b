//! Domain layer: pure game logic types and helpers.

pub mod cards_types;
pub mod catalog;
pub mod effects;
pub mod engine;
pub mod room;
pub mod round_scoring;
pub mod rules;
pub mod scoring;
pub mod state;

#[cfg(test)]
pub(crate) mod fixtures;
#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_effects;
#[cfg(test)]
mod tests_props_engine;
#[cfg(test)]
mod tests_round_scoring;

// Re-exports for ergonomics
pub use cards_types::{Card, CardColor, CardType};
pub use state::{
    DuoEffect, EndChoice, GameState, GameStatus, PileIndex, PlayerState, RoomCode, RoundPhase,
    TurnState, UserId,
};
