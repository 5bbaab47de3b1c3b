//! Duo effect resolution.
//!
//! Every resolver takes the current state and returns an [`EffectOutcome`].
//! A failed outcome carries the input state unchanged.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::state::{DuoEffect, GameState, PendingEffect, PileIndex, TurnState, UserId};
use crate::domain::{Card, CardType};

/// Extra detail reported with `effect:executed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_card: Option<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drawn_card: Option<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stolen_card: Option<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_player_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_player_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectOutcome {
    pub state: GameState,
    pub success: bool,
    pub metadata: EffectMetadata,
}

impl EffectOutcome {
    fn failed(state: &GameState) -> Self {
        Self {
            state: state.clone(),
            success: false,
            metadata: EffectMetadata::default(),
        }
    }

    fn succeeded(state: GameState, metadata: EffectMetadata) -> Self {
        Self {
            state,
            success: true,
            metadata,
        }
    }
}

/// A player the shark/swimmer effect may steal from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectTarget {
    pub user_id: UserId,
    pub name: String,
    pub hand_count: usize,
}

/// Effect of a duo, `None` for an effect-less pair.
pub fn duo_effect_type(card1: &Card, card2: &Card) -> Option<DuoEffect> {
    match (card1.kind, card2.kind) {
        (CardType::Crab, CardType::Crab) => Some(DuoEffect::Crab),
        (CardType::Boat, CardType::Boat) => Some(DuoEffect::Boat),
        (CardType::Fish, CardType::Fish) => Some(DuoEffect::Fish),
        (CardType::Swimmer, CardType::Shark) | (CardType::Shark, CardType::Swimmer) => {
            Some(DuoEffect::SharkSwimmer)
        }
        _ => None,
    }
}

/// Take `card_id` from the named discard pile into the acting player's hand.
pub fn apply_crab_effect(state: &GameState, pile: PileIndex, card_id: &str) -> EffectOutcome {
    let Some(pos) = state.pile(pile).iter().position(|c| c.id == card_id) else {
        return EffectOutcome::failed(state);
    };

    let mut next = state.clone();
    let card = next.pile_mut(pile).remove(pos);
    next.current_player_mut().hand.push(card.clone());

    EffectOutcome::succeeded(
        next,
        EffectMetadata {
            selected_card: Some(card),
            ..EffectMetadata::default()
        },
    )
}

/// Pop one card off the deck into the acting player's hand.
pub fn apply_fish_effect(state: &GameState) -> EffectOutcome {
    if state.deck.is_empty() {
        return EffectOutcome::failed(state);
    }

    let mut next = state.clone();
    let Some(card) = next.deck.pop() else {
        return EffectOutcome::failed(state);
    };
    next.current_player_mut().hand.push(card.clone());

    EffectOutcome::succeeded(
        next,
        EffectMetadata {
            drawn_card: Some(card),
            ..EffectMetadata::default()
        },
    )
}

/// Move a uniformly random card from the target's hand to the acting player's.
pub fn apply_shark_swimmer_effect<R: Rng + ?Sized>(
    state: &GameState,
    target_id: &str,
    rng: &mut R,
) -> EffectOutcome {
    if state.is_current_player(target_id) {
        return EffectOutcome::failed(state);
    }
    let Some(target_idx) = state.player_index(target_id) else {
        return EffectOutcome::failed(state);
    };
    let target_hand_len = state.players[target_idx].hand.len();
    if target_hand_len == 0 {
        return EffectOutcome::failed(state);
    }

    let mut next = state.clone();
    let pick = rng.random_range(0..target_hand_len);
    let stolen = next.players[target_idx].hand.remove(pick);
    let target_name = next.players[target_idx].name.clone();
    next.current_player_mut().hand.push(stolen.clone());

    EffectOutcome::succeeded(
        next,
        EffectMetadata {
            stolen_card: Some(stolen),
            target_player_id: Some(target_id.to_string()),
            target_player_name: Some(target_name),
            ..EffectMetadata::default()
        },
    )
}

/// Opponents of the acting player holding at least one card.
pub fn possible_targets(state: &GameState) -> Vec<EffectTarget> {
    let acting = &state.current_player().user_id;
    state
        .players
        .iter()
        .filter(|p| &p.user_id != acting && !p.hand.is_empty())
        .map(|p| EffectTarget {
            user_id: p.user_id.clone(),
            name: p.name.clone(),
            hand_count: p.hand.len(),
        })
        .collect()
}

/// Park the turn until the acting player completes `effect`.
pub fn await_effect_choice(state: &GameState, effect: DuoEffect, duo_cards: [String; 2]) -> GameState {
    let mut next = state.clone();
    next.turn = TurnState::AwaitingEffectChoice {
        pending: PendingEffect {
            effect,
            player_id: state.current_player().user_id.clone(),
            duo_cards,
        },
    };
    next
}

/// Drop the pending effect, if any.
pub fn clear_pending_effect(state: &GameState) -> GameState {
    let mut next = state.clone();
    if next.pending_effect().is_some() {
        next.turn = TurnState::Idle;
    }
    next
}
