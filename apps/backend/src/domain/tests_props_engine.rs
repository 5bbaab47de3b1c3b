//! Property tests for the turn state machine (pure domain).
//!
//! Properties tested:
//! - Cards are conserved across any sequence of legal actions
//! - Only the acting player may end the round or own the turn
//! - The drawn pair and a pending effect are never both present

use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::domain::catalog::{catalog_size, shuffled_with};
use crate::domain::effects::{
    apply_crab_effect, apply_fish_effect, apply_shark_swimmer_effect, await_effect_choice,
    clear_pending_effect, duo_effect_type, possible_targets,
};
use crate::domain::engine::{
    can_draw_from_deck, can_draw_from_discard, can_end_round, draw_from_deck, draw_from_discard,
    end_round, initialize_game, is_duo_valid, keep_card, pass_turn, play_duo,
    reset_for_next_round,
};
use crate::domain::state::{
    require_turn, DuoEffect, EndChoice, GameState, PileIndex, PlayerState, RoundPhase, TurnState,
};
use crate::domain::test_gens::seed;
use crate::domain::test_prelude;

fn new_game(players: usize, rng: &mut ChaCha8Rng) -> GameState {
    let seats = (0..players)
        .map(|i| PlayerState::new(format!("u{i}"), format!("User {i}")))
        .collect();
    initialize_game(Uuid::nil(), "PROPS".into(), seats, shuffled_with(rng), 0).unwrap()
}

fn random_pile(rng: &mut ChaCha8Rng) -> PileIndex {
    if rng.random_bool(0.5) {
        PileIndex::One
    } else {
        PileIndex::Two
    }
}

fn find_duo(state: &GameState) -> Option<(String, String)> {
    let hand = &state.current_player().hand;
    for (i, a) in hand.iter().enumerate() {
        for b in &hand[i + 1..] {
            if is_duo_valid(a, b) {
                return Some((a.id.clone(), b.id.clone()));
            }
        }
    }
    None
}

/// Resolve a freshly played duo the way the game flow does.
fn resolve_duo(state: GameState, effect: Option<DuoEffect>, ids: [String; 2]) -> GameState {
    match effect {
        None => pass_turn(&state).unwrap(),
        Some(DuoEffect::Boat) => state,
        Some(DuoEffect::Fish) => pass_turn(&apply_fish_effect(&state).state).unwrap(),
        Some(DuoEffect::Crab) => {
            if state.discard_pile1.is_empty() && state.discard_pile2.is_empty() {
                pass_turn(&state).unwrap()
            } else {
                await_effect_choice(&state, DuoEffect::Crab, ids)
            }
        }
        Some(DuoEffect::SharkSwimmer) => {
            if possible_targets(&state).is_empty() {
                pass_turn(&state).unwrap()
            } else {
                await_effect_choice(&state, DuoEffect::SharkSwimmer, ids)
            }
        }
    }
}

/// One random legal action.
fn step(state: &GameState, rng: &mut ChaCha8Rng) -> GameState {
    match &state.turn {
        TurnState::AwaitingKeepChoice { cards } => {
            let keep = cards[rng.random_range(0..2)].id.clone();
            keep_card(state, &keep, random_pile(rng)).unwrap()
        }
        TurnState::AwaitingEffectChoice { pending } => match pending.effect {
            DuoEffect::Crab => {
                let pile = if state.discard_pile1.is_empty() {
                    PileIndex::Two
                } else if state.discard_pile2.is_empty() {
                    PileIndex::One
                } else {
                    random_pile(rng)
                };
                let cards = state.pile(pile);
                let id = cards[rng.random_range(0..cards.len())].id.clone();
                let outcome = apply_crab_effect(state, pile, &id);
                assert!(outcome.success);
                pass_turn(&clear_pending_effect(&outcome.state)).unwrap()
            }
            _ => {
                let targets = possible_targets(state);
                let target = targets[rng.random_range(0..targets.len())].user_id.clone();
                let outcome = apply_shark_swimmer_effect(state, &target, rng);
                assert!(outcome.success);
                pass_turn(&clear_pending_effect(&outcome.state)).unwrap()
            }
        },
        TurnState::Idle => match state.round_phase {
            RoundPhase::Draw => {
                let roll = rng.random_range(0..3);
                if roll == 0 && can_draw_from_deck(state) {
                    draw_from_deck(state).unwrap()
                } else {
                    let pile = random_pile(rng);
                    if can_draw_from_discard(state, pile) {
                        draw_from_discard(state, pile).unwrap()
                    } else if can_draw_from_deck(state) {
                        draw_from_deck(state).unwrap()
                    } else {
                        pass_turn(state).unwrap()
                    }
                }
            }
            RoundPhase::PlayDuo => {
                let acting = state.current_player().user_id.clone();
                if can_end_round(state, Some(&acting)) && rng.random_bool(0.2) {
                    let choice = if rng.random_bool(0.5) {
                        EndChoice::Stop
                    } else {
                        EndChoice::LastChance
                    };
                    return end_round(state, &acting, choice).unwrap();
                }
                match find_duo(state) {
                    Some((a, b)) if rng.random_bool(0.7) => {
                        let hand = &state.current_player().hand;
                        let ca = hand.iter().find(|c| c.id == a).cloned().unwrap();
                        let cb = hand.iter().find(|c| c.id == b).cloned().unwrap();
                        let played = play_duo(state, &a, &b).unwrap();
                        resolve_duo(played, duo_effect_type(&ca, &cb), [a, b])
                    }
                    _ => pass_turn(state).unwrap(),
                }
            }
            RoundPhase::EndTurn => reset_for_next_round(state),
        },
    }
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: no card is ever duplicated or lost
    #[test]
    fn prop_cards_are_conserved(seed in seed(), players in 2usize..=4, steps in 1usize..200) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut state = new_game(players, &mut rng);
        let total = catalog_size();
        prop_assert_eq!(state.card_count(), total);

        for _ in 0..steps {
            state = step(&state, &mut rng);
            prop_assert_eq!(state.card_count(), total);
            prop_assert!(state.current_player_index < state.players.len());

            let mut ids: Vec<&str> = state
                .deck
                .iter()
                .chain(&state.discard_pile1)
                .chain(&state.discard_pile2)
                .chain(state.drawn_cards().into_iter().flatten())
                .chain(state.players.iter().flat_map(|p| p.hand.iter().chain(&p.played_cards)))
                .map(|c| c.id.as_str())
                .collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), total);
        }
    }

    /// Property: only the acting player owns the turn or may end the round
    #[test]
    fn prop_only_acting_player_may_act(seed in seed(), steps in 0usize..60) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut state = new_game(3, &mut rng);
        for _ in 0..steps {
            state = step(&state, &mut rng);
        }

        let acting = state.current_player().user_id.clone();
        prop_assert!(require_turn(&state, &acting).is_ok());
        for p in state.players.iter().filter(|p| p.user_id != acting) {
            prop_assert!(require_turn(&state, &p.user_id).is_err());
            prop_assert!(!can_end_round(&state, Some(&p.user_id)));
            prop_assert!(end_round(&state, &p.user_id, EndChoice::Stop).is_err());
        }
    }

    /// Property: the deck only shrinks during a game
    #[test]
    fn prop_deck_never_grows(seed in seed(), steps in 1usize..150) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut state = new_game(2, &mut rng);
        for _ in 0..steps {
            let before = state.deck.len();
            state = step(&state, &mut rng);
            prop_assert!(state.deck.len() <= before);
        }
    }
}
