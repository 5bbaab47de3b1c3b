// Bad frames and rejected commands never close the socket.

use std::time::Duration;

use serde_json::json;

use crate::support::websocket::{build_test_state, connect, start_test_server, start_two_player_game};

#[actix_web::test]
async fn malformed_frames_are_answered_and_survived() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(build_test_state(None, None).await?).await?;
    let mut client = connect(&server, "alice", "Alice").await?;

    for junk in [
        "not json at all",
        r#"{"event":"game:teleport"}"#,
        r#"{"event":"game:draw-from-discard","pileIndex":3}"#,
        r#"{"maxPlayers":2}"#,
    ] {
        client.send_text(junk).await?;
        let reply = client.recv_json().await?;
        assert_eq!(reply["event"], "game:invalid-action", "for {junk}");
        assert_eq!(reply["message"], "Malformed message");
    }

    client
        .send_json(&json!({"event": "room:get-info", "roomCode": "NOPE1"}))
        .await?;
    let reply = client.recv_json().await?;
    assert_eq!(reply["event"], "room:error");
    assert_eq!(reply["message"], "Room not found");

    server.stop().await;
    Ok(())
}

#[actix_web::test]
async fn rejection_goes_only_to_the_sender() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(build_test_state(None, None).await?).await?;
    let mut host = connect(&server, "host", "Hana").await?;
    let mut guest = connect(&server, "guest", "Gus").await?;
    start_two_player_game(&mut host, &mut guest).await?;

    guest.send_json(&json!({"event": "game:draw-from-deck"})).await?;
    let reply = guest.recv_json().await?;
    assert_eq!(reply["event"], "game:invalid-action");
    assert_eq!(reply["message"], "Not your turn");

    let nothing = host.recv_json_timeout(Duration::from_millis(150)).await;
    assert!(nothing.is_err(), "host should hear nothing");

    server.stop().await;
    Ok(())
}
