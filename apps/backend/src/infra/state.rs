use std::sync::Arc;
use std::time::Duration;

use actix::Actor;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::error::AppError;
use crate::infra::db::connect_db;
use crate::services::game_flow::GameFlowService;
use crate::services::match_recorder::{LogMatchRecorder, MatchRecorder, SeaOrmMatchRecorder};
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;
use crate::ws::hub::WsRegistry;
use crate::ws::server::GameServer;

/// Builder for creating AppState instances (used in both tests and main).
///
/// `build` starts the game server actor, so it must run inside an actix
/// system.
pub struct StateBuilder {
    security_config: SecurityConfig,
    recorder: Option<Arc<dyn MatchRecorder>>,
    database_url: Option<String>,
    rng: Option<Box<dyn RngCore + Send>>,
    pending_timeout: Option<Duration>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            recorder: None,
            database_url: None,
            rng: None,
            pending_timeout: None,
        }
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    /// Use this recorder for finished matches. Takes precedence over
    /// `with_database_url`.
    pub fn with_match_recorder(mut self, recorder: Arc<dyn MatchRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn with_database_url(mut self, database_url: Option<String>) -> Self {
        self.database_url = database_url;
        self
    }

    pub fn with_rng(mut self, rng: Box<dyn RngCore + Send>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn with_pending_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.pending_timeout = timeout;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let recorder: Arc<dyn MatchRecorder> = match (self.recorder, self.database_url) {
            (Some(recorder), _) => recorder,
            (None, Some(url)) => Arc::new(SeaOrmMatchRecorder::new(connect_db(&url).await?)),
            (None, None) => Arc::new(LogMatchRecorder),
        };
        let rng = self
            .rng
            .unwrap_or_else(|| Box::new(StdRng::from_os_rng()));

        let registry = Arc::new(WsRegistry::new());
        let server = GameServer::new(
            GameFlowService::new(rng),
            registry.clone(),
            recorder,
            self.pending_timeout,
        )
        .start();

        Ok(AppState::new(self.security_config, registry, server))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
