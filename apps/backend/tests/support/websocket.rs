// WebSocket test utilities

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use collection_wars_backend::infra::state::build_state;
use collection_wars_backend::routes;
use collection_wars_backend::services::match_recorder::MatchRecorder;
use collection_wars_backend::state::app_state::AppState;
use collection_wars_backend::state::security_config::SecurityConfig;
use collection_wars_backend::ws::hub::WsRegistry;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::json;

use crate::support::auth::mint_test_token;
use crate::support::websocket_client::WebSocketClient;

pub struct TestServer {
    pub handle: actix_web::dev::ServerHandle,
    pub addr: std::net::SocketAddr,
    pub state: AppState,
}

impl TestServer {
    pub fn security(&self) -> &SecurityConfig {
        &self.state.security
    }

    pub fn registry(&self) -> Arc<WsRegistry> {
        self.state.registry()
    }

    pub fn ws_url(&self, token: &str) -> String {
        format!("ws://{}/ws?token={}", self.addr, token)
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

/// State with a seeded shuffle, optional recorder and timeout.
pub async fn build_test_state(
    recorder: Option<Arc<dyn MatchRecorder>>,
    pending_timeout: Option<Duration>,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let mut builder = build_state()
        .with_security(SecurityConfig::new(b"ws-test-secret".to_vec()))
        .with_rng(Box::new(ChaCha8Rng::seed_from_u64(42)))
        .with_pending_timeout(pending_timeout);
    if let Some(recorder) = recorder {
        builder = builder.with_match_recorder(recorder);
    }
    Ok(builder.build().await?)
}

/// Start a real HTTP server bound to a random local port, serving the same
/// routes as production.
///
/// Must run inside an actix system (`#[actix_web::test]`): the game server
/// actor lives on the test's arbiter.
pub async fn start_test_server(state: AppState) -> Result<TestServer, Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let data = web::Data::new(state.clone());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .workers(1)
    .listen(listener)?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok(TestServer {
        handle,
        addr,
        state,
    })
}

pub async fn wait_for_connections(
    registry: &WsRegistry,
    expected: usize,
    timeout: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = tokio::time::Instant::now();
    loop {
        if registry.active_connections_count() == expected {
            return Ok(());
        }
        if start.elapsed() >= timeout {
            return Err(format!(
                "timeout waiting for active_connections_count == {expected} (got {})",
                registry.active_connections_count()
            )
            .into());
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

pub async fn connect(
    server: &TestServer,
    user_id: &str,
    name: &str,
) -> Result<WebSocketClient, Box<dyn std::error::Error>> {
    let token = mint_test_token(user_id, name, server.security());
    WebSocketClient::connect_retry(&server.ws_url(&token), Duration::from_secs(1)).await
}

/// Host creates a two-seat room and the guest joins; both inboxes are
/// drained up to the join announcement. Returns the room code.
pub async fn seat_two(
    host: &mut WebSocketClient,
    guest: &mut WebSocketClient,
) -> Result<String, Box<dyn std::error::Error>> {
    host.send_json(&json!({"event": "room:create", "maxPlayers": 2})).await?;
    let created = host.recv_event("room:created").await?;
    let code = created["roomCode"].as_str().unwrap_or_default().to_string();
    host.recv_event("room:joined").await?;

    guest
        .send_json(&json!({"event": "room:join", "roomCode": code}))
        .await?;
    guest.recv_event("room:player-joined").await?;
    host.recv_event("room:player-joined").await?;
    Ok(code)
}

/// `seat_two`, then the host starts the game; both inboxes are drained past
/// `game:started`.
pub async fn start_two_player_game(
    host: &mut WebSocketClient,
    guest: &mut WebSocketClient,
) -> Result<String, Box<dyn std::error::Error>> {
    let code = seat_two(host, guest).await?;
    host.send_json(&json!({"event": "room:start-game"})).await?;
    host.recv_event("game:started").await?;
    guest.recv_event("game:started").await?;
    Ok(code)
}
