use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::effects::{
    apply_crab_effect, apply_fish_effect, apply_shark_swimmer_effect, await_effect_choice,
    clear_pending_effect, duo_effect_type, possible_targets,
};
use crate::domain::fixtures::{card, cards, in_play_duo, two_player_game};
use crate::domain::state::{DuoEffect, PileIndex, TurnState};

#[test]
fn effect_type_by_pair() {
    assert_eq!(duo_effect_type(&card("crab_1"), &card("crab_2")), Some(DuoEffect::Crab));
    assert_eq!(duo_effect_type(&card("boat_1"), &card("boat_2")), Some(DuoEffect::Boat));
    assert_eq!(duo_effect_type(&card("fish_1"), &card("fish_2")), Some(DuoEffect::Fish));
    assert_eq!(
        duo_effect_type(&card("shark_1"), &card("swimmer_1")),
        Some(DuoEffect::SharkSwimmer)
    );
    assert_eq!(
        duo_effect_type(&card("swimmer_1"), &card("shark_1")),
        Some(DuoEffect::SharkSwimmer)
    );
    assert_eq!(duo_effect_type(&card("shell_1"), &card("shell_2")), None);
    assert_eq!(duo_effect_type(&card("crab_1"), &card("fish_1")), None);
}

#[test]
fn crab_takes_any_card_from_the_named_pile() {
    let mut state = in_play_duo(two_player_game(vec![], vec![], vec![]));
    state.discard_pile1 = cards(&["shell_1", "marine_1", "crab_5"]);

    let outcome = apply_crab_effect(&state, PileIndex::One, "marine_1");
    assert!(outcome.success);
    assert_eq!(outcome.state.discard_pile1, cards(&["shell_1", "crab_5"]));
    assert_eq!(outcome.state.players[0].hand, vec![card("marine_1")]);
    assert_eq!(outcome.metadata.selected_card, Some(card("marine_1")));
    assert_eq!(outcome.state.card_count(), state.card_count());
}

#[test]
fn crab_fails_for_card_in_other_pile() {
    let state = in_play_duo(two_player_game(vec![], vec![], vec![]));
    let outcome = apply_crab_effect(&state, PileIndex::One, "octopus_5");
    assert!(!outcome.success);
    assert_eq!(outcome.state, state);
}

#[test]
fn fish_draws_from_the_deck_end() {
    let state = in_play_duo(two_player_game(vec![], vec![], cards(&["boat_1", "boat_2"])));
    let outcome = apply_fish_effect(&state);
    assert!(outcome.success);
    assert_eq!(outcome.state.deck, cards(&["boat_1"]));
    assert_eq!(outcome.state.players[0].hand, vec![card("boat_2")]);
    assert_eq!(outcome.metadata.drawn_card, Some(card("boat_2")));
}

#[test]
fn fish_fails_on_empty_deck() {
    let state = in_play_duo(two_player_game(vec![], vec![], vec![]));
    let outcome = apply_fish_effect(&state);
    assert!(!outcome.success);
    assert_eq!(outcome.state, state);
}

#[test]
fn shark_swimmer_steals_one_card() {
    let state = in_play_duo(two_player_game(
        vec![],
        cards(&["shell_1", "shell_2", "octopus_1"]),
        vec![],
    ));
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let outcome = apply_shark_swimmer_effect(&state, "p2", &mut rng);

    assert!(outcome.success);
    assert_eq!(outcome.state.players[1].hand.len(), 2);
    assert_eq!(outcome.state.players[0].hand.len(), 1);
    let stolen = outcome.metadata.stolen_card.clone().unwrap();
    assert!(state.players[1].hand.contains(&stolen));
    assert!(!outcome.state.players[1].hand.contains(&stolen));
    assert_eq!(outcome.metadata.target_player_id.as_deref(), Some("p2"));
    assert_eq!(outcome.metadata.target_player_name.as_deref(), Some("Player p2"));
}

#[test]
fn shark_swimmer_is_deterministic_for_a_seeded_source() {
    let state = in_play_duo(two_player_game(
        vec![],
        cards(&["shell_1", "shell_2", "octopus_1", "boat_3"]),
        vec![],
    ));
    let a = apply_shark_swimmer_effect(&state, "p2", &mut ChaCha8Rng::seed_from_u64(9));
    let b = apply_shark_swimmer_effect(&state, "p2", &mut ChaCha8Rng::seed_from_u64(9));
    assert_eq!(a.metadata.stolen_card, b.metadata.stolen_card);
}

#[test]
fn shark_swimmer_rejects_self_unknown_and_empty_targets() {
    let state = in_play_duo(two_player_game(cards(&["shell_1"]), vec![], vec![]));
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert!(!apply_shark_swimmer_effect(&state, "p1", &mut rng).success);
    assert!(!apply_shark_swimmer_effect(&state, "ghost", &mut rng).success);
    let empty = apply_shark_swimmer_effect(&state, "p2", &mut rng);
    assert!(!empty.success);
    assert_eq!(empty.state, state);
}

#[test]
fn possible_targets_lists_opponents_with_cards() {
    let state = in_play_duo(two_player_game(cards(&["shell_1"]), vec![], vec![]));
    assert!(possible_targets(&state).is_empty());

    let state = in_play_duo(two_player_game(vec![], cards(&["shell_1", "shell_2"]), vec![]));
    let targets = possible_targets(&state);
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].user_id, "p2");
    assert_eq!(targets[0].hand_count, 2);
}

#[test]
fn pending_effect_round_trip() {
    let state = in_play_duo(two_player_game(vec![], vec![], vec![]));
    let parked = await_effect_choice(&state, DuoEffect::Crab, ["crab_1".into(), "crab_2".into()]);
    let pending = parked.pending_effect().unwrap();
    assert_eq!(pending.effect, DuoEffect::Crab);
    assert_eq!(pending.player_id, "p1");

    let cleared = clear_pending_effect(&parked);
    assert_eq!(cleared.turn, TurnState::Idle);
}
