// Game end by host stop, and what survives it.

use collection_wars_backend::services::game_flow::Delivery;
use collection_wars_backend::services::match_recorder::GameEndReason;
use collection_wars_backend::ws::protocol::{ClientMsg, ServerMsg};

use crate::support::game_setup::{event_names, player, seeded_service, start_game};

#[test]
fn host_stop_in_two_player_game_is_recorded() {
    let mut svc = seeded_service(21);
    let code = start_game(&mut svc, 2);

    let out = svc.handle(&player(1), ClientMsg::HostStop);
    assert_eq!(event_names(&out), ["game:ended"]);

    let record = out
        .iter()
        .find_map(|d| match d {
            Delivery::Persist(record) => Some(record.clone()),
            _ => None,
        })
        .expect("record for a two-player game");
    assert_eq!(record.reason, GameEndReason::HostStopped);
    // Nobody scored: the first seat wins the tie.
    assert_eq!(record.winner_id, record.player1_id);
    assert_eq!((record.player1_score, record.player2_score), (0, 0));

    assert_eq!(out.last(), Some(&Delivery::CloseChannel(code.clone())));
    assert_eq!(svc.directory().room_count(), 0);
    assert_eq!(svc.directory().game_count(), 0);
}

#[test]
fn three_player_games_are_not_recorded() {
    let mut svc = seeded_service(22);
    start_game(&mut svc, 3);

    let out = svc.handle(&player(1), ClientMsg::HostStop);
    assert!(out.iter().all(|d| !matches!(d, Delivery::Persist(_))));
    assert!(out.iter().any(|d| matches!(
        d,
        Delivery::Room {
            msg: ServerMsg::GameEnded { final_scores, .. },
            ..
        } if final_scores.len() == 3
    )));
}

#[test]
fn players_can_host_again_after_the_end() {
    let mut svc = seeded_service(23);
    start_game(&mut svc, 2);
    svc.handle(&player(1), ClientMsg::HostStop);

    let out = svc.handle(&player(2), ClientMsg::RoomCreate { max_players: 2 });
    assert_eq!(event_names(&out), ["room:created", "room:joined"]);
}
