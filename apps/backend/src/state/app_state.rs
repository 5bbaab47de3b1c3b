use std::sync::Arc;

use actix::Addr;

use super::security_config::SecurityConfig;
use crate::ws::hub::WsRegistry;
use crate::ws::server::GameServer;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
    /// Live websocket connections and room channels
    registry: Arc<WsRegistry>,
    /// Single writer for every room and game
    game_server: Addr<GameServer>,
}

impl AppState {
    pub fn new(
        security: SecurityConfig,
        registry: Arc<WsRegistry>,
        game_server: Addr<GameServer>,
    ) -> Self {
        Self {
            security,
            registry,
            game_server,
        }
    }

    pub fn registry(&self) -> Arc<WsRegistry> {
        self.registry.clone()
    }

    pub fn game_server(&self) -> Addr<GameServer> {
        self.game_server.clone()
    }
}
