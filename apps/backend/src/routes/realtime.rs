use actix_web::{web, Error, HttpRequest, HttpResponse};

use crate::extractors::current_player::CurrentPlayer;
use crate::state::app_state::AppState;
use crate::ws::session;

/// Upgrade an authenticated request to the game socket. The extractor has
/// already rejected requests without a valid token.
async fn connect(
    req: HttpRequest,
    stream: web::Payload,
    current_player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    session::upgrade(req, stream, current_player, app_state).await
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/ws", web::get().to(connect));
}
