// Handshake authentication and connection bookkeeping.

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use collection_wars_backend::routes;
use serde_json::Value;

use crate::support::auth::{bearer_header, mint_expired_token, mint_test_token};
use crate::support::websocket::{build_test_state, start_test_server, wait_for_connections};
use crate::support::websocket_client::WebSocketClient;

#[actix_web::test]
async fn upgrade_without_token_is_401() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(None, None).await?;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/ws").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "UNAUTHORIZED_MISSING_BEARER",
        StatusCode::UNAUTHORIZED,
        None,
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn upgrade_with_bad_tokens_is_401() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(None, None).await?;
    let expired = mint_expired_token("late", &state.security);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/ws?token=not-a-jwt")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "UNAUTHORIZED_INVALID_JWT",
        StatusCode::UNAUTHORIZED,
        None,
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!("/ws?token={expired}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "UNAUTHORIZED_EXPIRED_JWT",
        StatusCode::UNAUTHORIZED,
        None,
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn real_server_refuses_unauthenticated_sockets() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(build_test_state(None, None).await?).await?;

    let url = format!("ws://{}/ws", server.addr);
    let refused = WebSocketClient::connect_retry(&url, Duration::from_millis(200)).await;
    assert!(refused.is_err());
    assert_eq!(server.registry().active_connections_count(), 0);

    server.stop().await;
    Ok(())
}

#[actix_web::test]
async fn connections_are_counted_until_closed() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(build_test_state(None, None).await?).await?;
    let registry = server.registry();

    let token = mint_test_token("alice", "Alice", server.security());
    let mut by_query = WebSocketClient::connect_retry(&server.ws_url(&token), Duration::from_secs(1)).await?;
    let mut by_header = WebSocketClient::connect_with_authorization(
        &format!("ws://{}/ws", server.addr),
        &bearer_header("bob", "Bob", server.security()),
    )
    .await?;
    wait_for_connections(&registry, 2, Duration::from_secs(2)).await?;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(server.state.clone()))
            .configure(routes::configure),
    )
    .await;
    let req = test::TestRequest::get().uri("/health").to_request();
    let health: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["connections"], 2);

    by_query.close().await?;
    by_header.close().await?;
    wait_for_connections(&registry, 0, Duration::from_secs(2)).await?;

    server.stop().await;
    Ok(())
}
