//! The game server actor: the single owner of the game flow service.
//!
//! Commands from every session are funneled through this actor's mailbox and
//! handled one at a time to completion, which gives each room a single
//! writer and a single emission order.

use std::sync::Arc;
use std::time::Duration;

use actix::prelude::*;
use serde::Serialize;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::extractors::current_player::CurrentPlayer;
use crate::services::game_flow::{Delivery, GameFlowService};
use crate::services::match_recorder::MatchRecorder;
use crate::ws::hub::{HubEvent, WsRegistry};
use crate::ws::protocol::ClientMsg;

/// A parsed command from one connection.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ClientCommand {
    pub conn_id: Uuid,
    pub player: CurrentPlayer,
    pub msg: ClientMsg,
}

/// A session ended.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnected {
    pub conn_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerStats {
    pub rooms: usize,
    pub games: usize,
    pub connections: usize,
}

#[derive(Message)]
#[rtype(result = "ServerStats")]
pub struct GetStats;

pub struct GameServer {
    flow: GameFlowService,
    registry: Arc<WsRegistry>,
    recorder: Arc<dyn MatchRecorder>,
    /// `None` leaves parked turns waiting forever.
    pending_timeout: Option<Duration>,
}

impl GameServer {
    pub fn new(
        flow: GameFlowService,
        registry: Arc<WsRegistry>,
        recorder: Arc<dyn MatchRecorder>,
        pending_timeout: Option<Duration>,
    ) -> Self {
        Self {
            flow,
            registry,
            recorder,
            pending_timeout,
        }
    }

    /// Carry out deliveries in order. `origin` is the connection the command
    /// came from; timer-driven deliveries have none.
    fn dispatch(&mut self, origin: Option<Uuid>, deliveries: Vec<Delivery>, ctx: &mut Context<Self>) {
        for delivery in deliveries {
            match delivery {
                Delivery::Direct(msg) => {
                    if let (Some(conn_id), Some(event)) = (origin, HubEvent::encode(&msg)) {
                        self.registry.send_to_connection(conn_id, event);
                    }
                }
                Delivery::User { user_id, msg } => {
                    if let Some(event) = HubEvent::encode(&msg) {
                        self.registry.send_to_user(&user_id, event);
                    }
                }
                Delivery::Room { code, msg } => {
                    if let Some(event) = HubEvent::encode(&msg) {
                        self.registry.broadcast_room(&code, event);
                    }
                }
                Delivery::Subscribe(code) => {
                    if let Some(conn_id) = origin {
                        self.registry.subscribe(conn_id, &code);
                    }
                }
                Delivery::Unsubscribe(code) => {
                    if let Some(conn_id) = origin {
                        self.registry.unsubscribe(conn_id, &code);
                    }
                }
                Delivery::CloseChannel(code) => self.registry.close_room(&code),
                Delivery::Persist(record) => {
                    let recorder = self.recorder.clone();
                    actix::spawn(async move {
                        if let Err(err) = recorder.record(record).await {
                            error!(error = %err, "[GAME SERVER] failed to record match result");
                        }
                    });
                }
                Delivery::ScheduleTimeout { code, turn_seq } => {
                    let Some(after) = self.pending_timeout else {
                        continue;
                    };
                    ctx.run_later(after, move |actor, ctx| {
                        let out = actor.flow.expire_pending(&code, turn_seq);
                        if !out.is_empty() {
                            info!(room_code = %code, turn_seq, "[GAME SERVER] pending action timed out");
                        }
                        actor.dispatch(None, out, ctx);
                    });
                }
            }
        }
    }
}

impl Actor for GameServer {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!(pending_timeout = ?self.pending_timeout, "[GAME SERVER] started");
    }
}

impl Handler<ClientCommand> for GameServer {
    type Result = ();

    fn handle(&mut self, cmd: ClientCommand, ctx: &mut Self::Context) -> Self::Result {
        debug!(
            conn_id = %cmd.conn_id,
            user_id = %cmd.player.user_id,
            command = ?cmd.msg,
            "[GAME SERVER] command"
        );
        let out = self.flow.handle(&cmd.player, cmd.msg);
        self.dispatch(Some(cmd.conn_id), out, ctx);
    }
}

impl Handler<Disconnected> for GameServer {
    type Result = ();

    fn handle(&mut self, msg: Disconnected, ctx: &mut Self::Context) -> Self::Result {
        let Some((user_id, last)) = self.registry.unregister_connection(msg.conn_id) else {
            return;
        };
        if !last {
            return;
        }
        let out = self.flow.disconnect(&user_id);
        self.dispatch(None, out, ctx);
    }
}

impl Handler<GetStats> for GameServer {
    type Result = MessageResult<GetStats>;

    fn handle(&mut self, _msg: GetStats, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(ServerStats {
            rooms: self.flow.directory().room_count(),
            games: self.flow.directory().game_count(),
            connections: self.registry.active_connections_count(),
        })
    }
}
