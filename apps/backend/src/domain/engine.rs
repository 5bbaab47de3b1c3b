//! Turn state machine: legality predicates and pure transitions.
//!
//! Every transition borrows the current state and returns a new one; the
//! caller decides whether to store it. A rejected action leaves the input
//! untouched and reports why through `DomainError`.

use uuid::Uuid;

use crate::domain::rules::{
    target_score_for, valid_player_count, DECK_DRAW_COUNT, MIN_POINTS_TO_END_ROUND,
};
use crate::domain::scoring::calculate_score;
use crate::domain::state::{
    EndChoice, GameState, GameStatus, PileIndex, PlayerState, RoomCode, RoundPhase, TurnState,
};
use crate::domain::{Card, CardType};
use crate::errors::domain::{DomainError, ValidationKind};

/// Seat the players and lay out a shuffled catalog: one card on each discard
/// pile, the rest in the deck, empty hands.
pub fn initialize_game(
    id: Uuid,
    room_code: RoomCode,
    players: Vec<PlayerState>,
    mut cards: Vec<Card>,
    now_ms: i64,
) -> Result<GameState, DomainError> {
    if !valid_player_count(players.len()) {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            "Need between 2 and 4 players",
        ));
    }
    if cards.len() < 2 {
        return Err(DomainError::validation_other(
            "Not enough cards to seed both discard piles",
        ));
    }

    let deck = cards.split_off(2);
    let mut seeds = cards.into_iter();
    let discard_pile1 = seeds.next().into_iter().collect();
    let discard_pile2 = seeds.next().into_iter().collect();
    let target_score = target_score_for(players.len());

    Ok(GameState {
        id,
        room_code,
        status: GameStatus::Playing,
        players,
        current_player_index: 0,
        deck,
        discard_pile1,
        discard_pile2,
        turn: TurnState::Idle,
        round_number: 1,
        round_phase: RoundPhase::Draw,
        round_ender: None,
        end_choice: None,
        last_chance_played: Vec::new(),
        created_at: now_ms,
        started_at: Some(now_ms),
        target_score,
        version: 0,
        turn_seq: 0,
    })
}

pub fn can_draw_from_deck(state: &GameState) -> bool {
    state.deck.len() >= DECK_DRAW_COUNT && state.round_phase == RoundPhase::Draw
}

pub fn can_draw_from_discard(state: &GameState, pile: PileIndex) -> bool {
    state.round_phase == RoundPhase::Draw && !state.pile(pile).is_empty()
}

/// Pop two cards off the deck and park them until the keep choice.
pub fn draw_from_deck(state: &GameState) -> Result<GameState, DomainError> {
    if state.round_phase != RoundPhase::Draw {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Cannot draw from deck",
        ));
    }
    if !can_draw_from_deck(state) {
        return Err(DomainError::validation(
            ValidationKind::DeckExhausted,
            "Cannot draw from deck",
        ));
    }

    let mut next = state.clone();
    let (Some(first), Some(second)) = (next.deck.pop(), next.deck.pop()) else {
        return Err(DomainError::validation(
            ValidationKind::DeckExhausted,
            "Cannot draw from deck",
        ));
    };
    next.turn = TurnState::AwaitingKeepChoice {
        cards: [first, second],
    };
    next.round_phase = RoundPhase::PlayDuo;
    Ok(next)
}

/// Take the top card of a discard pile straight into hand.
pub fn draw_from_discard(state: &GameState, pile: PileIndex) -> Result<GameState, DomainError> {
    if state.round_phase != RoundPhase::Draw {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Cannot draw from discard pile",
        ));
    }
    if !can_draw_from_discard(state, pile) {
        return Err(DomainError::validation(
            ValidationKind::PileEmpty,
            "Cannot draw from discard pile",
        ));
    }

    let mut next = state.clone();
    let Some(card) = next.pile_mut(pile).pop() else {
        return Err(DomainError::validation(
            ValidationKind::PileEmpty,
            "Cannot draw from discard pile",
        ));
    };
    next.current_player_mut().hand.push(card);
    next.round_phase = RoundPhase::PlayDuo;
    Ok(next)
}

/// Keep one of the two drawn cards and discard the other onto `discard_pile`.
pub fn keep_card(
    state: &GameState,
    card_to_keep: &str,
    discard_pile: PileIndex,
) -> Result<GameState, DomainError> {
    let Some([first, second]) = state.drawn_cards() else {
        return Err(DomainError::validation(
            ValidationKind::NoPendingChoice,
            "No cards to choose from",
        ));
    };

    let (kept, discarded) = if first.id == card_to_keep {
        (first.clone(), second.clone())
    } else if second.id == card_to_keep {
        (second.clone(), first.clone())
    } else {
        return Err(DomainError::validation(
            ValidationKind::InvalidCard,
            "Invalid card",
        ));
    };

    let mut next = state.clone();
    next.current_player_mut().hand.push(kept);
    next.pile_mut(discard_pile).push(discarded);
    next.turn = TurnState::Idle;
    Ok(next)
}

/// Same-type pairs of boat, crab or fish, or a swimmer with a shark.
pub fn is_duo_valid(card1: &Card, card2: &Card) -> bool {
    if !card1.kind.is_duo_type() || !card2.kind.is_duo_type() {
        return false;
    }
    match (card1.kind, card2.kind) {
        (CardType::Swimmer, CardType::Shark) | (CardType::Shark, CardType::Swimmer) => true,
        (CardType::Swimmer, CardType::Swimmer) | (CardType::Shark, CardType::Shark) => false,
        (a, b) => a == b,
    }
}

/// Both cards are distinct cards in the acting player's hand and form a duo.
pub fn can_play_duo(state: &GameState, card1: &Card, card2: &Card) -> bool {
    let player = state.current_player();
    card1.id != card2.id
        && player.hand_card(&card1.id).is_some()
        && player.hand_card(&card2.id).is_some()
        && is_duo_valid(card1, card2)
}

/// Move two cards from hand to `played_cards`. Effects and turn advance are
/// left to the caller.
pub fn play_duo(state: &GameState, id1: &str, id2: &str) -> Result<GameState, DomainError> {
    if state.round_phase != RoundPhase::PlayDuo {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Draw before playing a duo",
        ));
    }
    require_idle_turn(state)?;

    let player = state.current_player();
    let (Some(card1), Some(card2)) = (player.hand_card(id1), player.hand_card(id2)) else {
        return Err(DomainError::validation(
            ValidationKind::CardNotInHand,
            "Cards not in hand",
        ));
    };
    if !can_play_duo(state, card1, card2) {
        return Err(DomainError::validation(
            ValidationKind::InvalidDuo,
            "Invalid duo",
        ));
    }

    let mut next = state.clone();
    let acting = next.current_player_mut();
    for id in [id1, id2] {
        let Some(card) = acting.take_from_hand(id) else {
            return Err(DomainError::validation(
                ValidationKind::CardNotInHand,
                "Cards not in hand",
            ));
        };
        acting.played_cards.push(card);
    }
    Ok(next)
}

/// `user_id` (when given) owns the turn and the acting player holds at least
/// the minimum card points.
pub fn can_end_round(state: &GameState, user_id: Option<&str>) -> bool {
    if let Some(user_id) = user_id {
        if !state.is_current_player(user_id) {
            return false;
        }
    }
    calculate_score(state.current_player()) >= MIN_POINTS_TO_END_ROUND
}

/// Hand the turn to the next seat and reset the phase to `draw`.
pub fn pass_turn(state: &GameState) -> Result<GameState, DomainError> {
    if state.round_phase == RoundPhase::EndTurn {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Round is over",
        ));
    }
    require_idle_turn(state)?;

    let mut next = state.clone();
    advance_turn(&mut next);
    Ok(next)
}

/// Record the round-ending declaration and move to `end_turn`.
pub fn end_round(
    state: &GameState,
    user_id: &str,
    choice: EndChoice,
) -> Result<GameState, DomainError> {
    if state.round_phase == RoundPhase::EndTurn {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "Round is already over",
        ));
    }
    if !state.is_current_player(user_id) {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            "Not your turn",
        ));
    }
    require_idle_turn(state)?;
    if !can_end_round(state, Some(user_id)) {
        return Err(DomainError::validation(
            ValidationKind::InsufficientPoints,
            format!("Cannot end round - need at least {MIN_POINTS_TO_END_ROUND} points"),
        ));
    }

    let mut next = state.clone();
    next.round_ender = Some(user_id.to_string());
    next.end_choice = Some(choice);
    next.round_phase = RoundPhase::EndTurn;
    // Last Chance is settled immediately, so the ender's bet counts as played.
    if choice == EndChoice::LastChance {
        next.last_chance_played = vec![user_id.to_string()];
    }
    Ok(next)
}

/// Start the next round: clear the declaration, hand the first turn to the
/// seat after the current one.
pub fn reset_for_next_round(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.round_number += 1;
    next.round_ender = None;
    next.end_choice = None;
    next.last_chance_played.clear();
    advance_turn(&mut next);
    next
}

fn advance_turn(state: &mut GameState) {
    state.current_player_index = (state.current_player_index + 1) % state.players.len();
    state.round_phase = RoundPhase::Draw;
    state.turn = TurnState::Idle;
}

fn require_idle_turn(state: &GameState) -> Result<(), DomainError> {
    match &state.turn {
        TurnState::Idle => Ok(()),
        TurnState::AwaitingKeepChoice { .. } => Err(DomainError::validation(
            ValidationKind::TurnNotResolved,
            "Choose which drawn card to keep first",
        )),
        TurnState::AwaitingEffectChoice { .. } => Err(DomainError::validation(
            ValidationKind::TurnNotResolved,
            "Resolve the pending effect first",
        )),
    }
}
