use crate::domain::engine::end_round;
use crate::domain::fixtures::{cards, eight_point_hand, in_play_duo, two_player_game};
use crate::domain::round_scoring::{
    apply_round_result, calculate_round_scores, leader_at_target, overall_leader,
};
use crate::domain::state::{EndChoice, GameState};
use crate::domain::Card;

fn declared(opponent_hand: Vec<Card>, choice: EndChoice) -> GameState {
    let state = in_play_duo(two_player_game(eight_point_hand(), opponent_hand, vec![]));
    end_round(&state, "p1", choice).unwrap()
}

#[test]
fn no_declaration_settles_nothing() {
    let state = two_player_game(eight_point_hand(), vec![], vec![]);
    assert_eq!(calculate_round_scores(&state), None);
}

#[test]
fn stop_pays_card_points_to_everyone() {
    let state = declared(cards(&["crab_5", "crab_6"]), EndChoice::Stop);
    let result = calculate_round_scores(&state).unwrap();

    assert!(result.round_ender_won);
    assert_eq!(result.round_ender, "p1");
    assert!(result.player_scores.iter().all(|s| s.color_bonus == 0));
    assert_eq!(result.points_for("p1"), Some(8));
    assert_eq!(result.points_for("p2"), Some(2));
    assert!(result.player_scores[0].was_round_ender);
    assert!(!result.player_scores[1].was_round_ender);
}

#[test]
fn last_chance_won_pays_ender_bonus_and_others_bonus_only() {
    let state = declared(cards(&["crab_5", "crab_6"]), EndChoice::LastChance);
    let result = calculate_round_scores(&state).unwrap();

    assert!(result.round_ender_won);
    let ender = &result.player_scores[0];
    assert_eq!(ender.card_points, 8);
    assert_eq!(ender.color_bonus, 8);
    assert_eq!(ender.total_points, 16);
    let other = &result.player_scores[1];
    assert_eq!(other.card_points, 2);
    assert_eq!(other.total_points, other.color_bonus);
}

#[test]
fn last_chance_lost_pays_ender_bonus_only() {
    let shells = cards(&["shell_1", "shell_2", "shell_3", "shell_4", "shell_6", "shell_7"]);
    let state = declared(shells, EndChoice::LastChance);
    let result = calculate_round_scores(&state).unwrap();

    assert!(!result.round_ender_won);
    assert_eq!(result.points_for("p1"), Some(8));
    assert_eq!(result.player_scores[0].total_points, result.player_scores[0].color_bonus);
    assert_eq!(result.points_for("p2"), Some(10));
}

#[test]
fn last_chance_tie_counts_as_a_loss() {
    let state = declared(eight_point_hand_for_opponent(), EndChoice::LastChance);
    let result = calculate_round_scores(&state).unwrap();
    assert!(!result.round_ender_won);
    assert_eq!(result.player_scores[1].total_points, 8);
}

fn eight_point_hand_for_opponent() -> Vec<Card> {
    cards(&[
        "crab_5", "crab_6", "crab_7", "crab_8", "boat_3", "boat_4", "fish_3", "fish_4",
    ])
}

#[test]
fn settlement_accumulates_into_scores() {
    let mut state = declared(cards(&["crab_5", "crab_6"]), EndChoice::Stop);
    state.players[1].score = 5;
    let result = calculate_round_scores(&state).unwrap();
    let next = apply_round_result(&state, &result);
    assert_eq!(next.players[0].score, 8);
    assert_eq!(next.players[1].score, 7);
}

#[test]
fn leaders() {
    let mut state = two_player_game(vec![], vec![], vec![]);
    assert_eq!(overall_leader(&state).map(|p| p.user_id.as_str()), Some("p1"));
    assert!(leader_at_target(&state).is_none());

    state.players[0].score = 41;
    state.players[1].score = 45;
    assert_eq!(leader_at_target(&state).map(|p| p.user_id.as_str()), Some("p2"));

    state.players[0].score = 45;
    assert_eq!(leader_at_target(&state).map(|p| p.user_id.as_str()), Some("p1"));
    assert_eq!(overall_leader(&state).map(|p| p.user_id.as_str()), Some("p1"));
}
