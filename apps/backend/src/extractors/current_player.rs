use std::collections::HashMap;
use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::services::directory::DEFAULT_PLAYER_NAME;
use crate::state::app_state::AppState;

/// Identity attached to a realtime connection at handshake time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPlayer {
    pub user_id: String,
    pub display_name: String,
}

impl CurrentPlayer {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        let display_name = if display_name.trim().is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            display_name.trim().to_string()
        };
        Self {
            user_id: user_id.into(),
            display_name,
        }
    }
}

/// Token from `?token=` (browsers cannot set headers on a WebSocket
/// handshake) or from `Authorization: Bearer`.
fn token_from_request(req: &HttpRequest) -> Option<String> {
    let from_query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
        .ok()
        .and_then(|q| q.get("token").cloned())
        .filter(|t| !t.is_empty());
    if from_query.is_some() {
        return from_query;
    }

    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token.to_string()),
        _ => None,
    }
}

fn extract(req: &HttpRequest) -> Result<CurrentPlayer, AppError> {
    let token = token_from_request(req).ok_or_else(AppError::unauthorized_missing_bearer)?;
    let app_state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available".to_string()))?;

    let claims = verify_access_token(&token, &app_state.security)?;
    if claims.sub.trim().is_empty() {
        return Err(AppError::unauthorized_invalid_jwt());
    }
    Ok(CurrentPlayer::new(claims.sub, claims.name))
}

impl FromRequest for CurrentPlayer {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}
