//! Game state aggregate and its building blocks.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Card;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

pub type UserId = String;
pub type RoomCode = String;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Waiting,
    Playing,
    Ended,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Draw,
    PlayDuo,
    EndTurn,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndChoice {
    Stop,
    LastChance,
}

/// Which of the two discard piles. Travels as `1` or `2` on the wire.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PileIndex {
    One,
    Two,
}

impl TryFrom<u8> for PileIndex {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PileIndex::One),
            2 => Ok(PileIndex::Two),
            other => Err(DomainError::validation(
                ValidationKind::InvalidPile,
                format!("Invalid discard pile {other}"),
            )),
        }
    }
}

impl From<PileIndex> for u8 {
    fn from(pile: PileIndex) -> Self {
        match pile {
            PileIndex::One => 1,
            PileIndex::Two => 2,
        }
    }
}

/// Special effect triggered by a duo.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuoEffect {
    Crab,
    Boat,
    Fish,
    SharkSwimmer,
}

impl DuoEffect {
    pub const fn as_str(self) -> &'static str {
        match self {
            DuoEffect::Crab => "crab",
            DuoEffect::Boat => "boat",
            DuoEffect::Fish => "fish",
            DuoEffect::SharkSwimmer => "shark_swimmer",
        }
    }
}

/// A duo effect waiting for the acting player's follow-up choice.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingEffect {
    #[serde(rename = "type")]
    pub effect: DuoEffect,
    pub player_id: UserId,
    pub duo_cards: [String; 2],
}

/// Where the acting player's turn stands.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnState {
    Idle,
    AwaitingKeepChoice { cards: [Card; 2] },
    AwaitingEffectChoice { pending: PendingEffect },
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub user_id: UserId,
    pub name: String,
    pub hand: Vec<Card>,
    pub played_cards: Vec<Card>,
    pub score: u32,
    pub connected: bool,
}

impl PlayerState {
    pub fn new(user_id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            hand: Vec::new(),
            played_cards: Vec::new(),
            score: 0,
            connected: true,
        }
    }

    /// Hand followed by played cards.
    pub fn all_cards(&self) -> impl Iterator<Item = &Card> {
        self.hand.iter().chain(self.played_cards.iter())
    }

    pub fn hand_card(&self, card_id: &str) -> Option<&Card> {
        self.hand.iter().find(|c| c.id == card_id)
    }

    pub(crate) fn take_from_hand(&mut self, card_id: &str) -> Option<Card> {
        let pos = self.hand.iter().position(|c| c.id == card_id)?;
        Some(self.hand.remove(pos))
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub id: Uuid,
    pub room_code: RoomCode,
    pub status: GameStatus,
    pub players: Vec<PlayerState>,
    pub current_player_index: usize,
    /// Draw end is the back of the vector.
    pub deck: Vec<Card>,
    /// Top is the last element.
    pub discard_pile1: Vec<Card>,
    pub discard_pile2: Vec<Card>,
    pub turn: TurnState,
    pub round_number: u32,
    pub round_phase: RoundPhase,
    pub round_ender: Option<UserId>,
    pub end_choice: Option<EndChoice>,
    pub last_chance_played: Vec<UserId>,
    pub created_at: i64,
    pub started_at: Option<i64>,
    pub target_score: u32,
    /// Bumped by the session directory on every stored update.
    pub version: u64,
    /// Bumped by the session directory only when `turn` changes. Connection
    /// flags and membership updates leave it alone.
    pub turn_seq: u64,
}

impl GameState {
    pub fn current_player(&self) -> &PlayerState {
        &self.players[self.current_player_index]
    }

    pub(crate) fn current_player_mut(&mut self) -> &mut PlayerState {
        &mut self.players[self.current_player_index]
    }

    pub fn is_current_player(&self, user_id: &str) -> bool {
        self.current_player().user_id == user_id
    }

    pub fn player(&self, user_id: &str) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.user_id == user_id)
    }

    pub fn player_index(&self, user_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.user_id == user_id)
    }

    pub fn pile(&self, pile: PileIndex) -> &Vec<Card> {
        match pile {
            PileIndex::One => &self.discard_pile1,
            PileIndex::Two => &self.discard_pile2,
        }
    }

    pub(crate) fn pile_mut(&mut self, pile: PileIndex) -> &mut Vec<Card> {
        match pile {
            PileIndex::One => &mut self.discard_pile1,
            PileIndex::Two => &mut self.discard_pile2,
        }
    }

    pub fn drawn_cards(&self) -> Option<&[Card; 2]> {
        match &self.turn {
            TurnState::AwaitingKeepChoice { cards } => Some(cards),
            _ => None,
        }
    }

    pub fn pending_effect(&self) -> Option<&PendingEffect> {
        match &self.turn {
            TurnState::AwaitingEffectChoice { pending } => Some(pending),
            _ => None,
        }
    }

    pub fn is_turn_idle(&self) -> bool {
        matches!(self.turn, TurnState::Idle)
    }

    /// Every card in every container, drawn pair included.
    pub fn card_count(&self) -> usize {
        let drawn = self.drawn_cards().map_or(0, |c| c.len());
        self.deck.len()
            + self.discard_pile1.len()
            + self.discard_pile2.len()
            + drawn
            + self
                .players
                .iter()
                .map(|p| p.hand.len() + p.played_cards.len())
                .sum::<usize>()
    }
}

/// Reject unless `user_id` owns the turn.
pub fn require_turn(state: &GameState, user_id: &str) -> Result<(), DomainError> {
    if state.player(user_id).is_none() {
        return Err(DomainError::not_found(
            NotFoundKind::Player,
            "Not a player in this game",
        ));
    }
    if !state.is_current_player(user_id) {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            "Not your turn",
        ));
    }
    Ok(())
}
