use std::collections::HashSet;
use std::sync::Arc;

use actix::prelude::*;
use dashmap::DashMap;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::state::{RoomCode, UserId};
use crate::ws::protocol::ServerMsg;

/// A pre-serialized frame for one session. Serialized once per delivery and
/// shared between every recipient of a broadcast.
#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub struct HubEvent(pub Arc<str>);

impl HubEvent {
    pub fn encode(msg: &ServerMsg) -> Option<Self> {
        match serde_json::to_string(msg) {
            Ok(text) => Some(Self(Arc::from(text))),
            Err(err) => {
                warn!(error = %err, event = msg.event_name(), "[WS HUB] failed to serialize outbound message");
                None
            }
        }
    }
}

struct Connection {
    user_id: UserId,
    recipient: Recipient<HubEvent>,
}

/// Live connections and room channel subscriptions.
#[derive(Default)]
pub struct WsRegistry {
    connections: DashMap<Uuid, Connection>,
    user_connections: DashMap<UserId, HashSet<Uuid>>,
    rooms: DashMap<RoomCode, HashSet<Uuid>>,
}

impl WsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_connection(
        &self,
        user_id: &str,
        conn_id: Uuid,
        recipient: Recipient<HubEvent>,
    ) {
        self.connections.insert(
            conn_id,
            Connection {
                user_id: user_id.to_string(),
                recipient,
            },
        );
        self.user_connections
            .entry(user_id.to_string())
            .or_default()
            .insert(conn_id);
    }

    /// Forget the connection and all its subscriptions. Returns the user id
    /// and whether that user has no other live connection.
    pub fn unregister_connection(&self, conn_id: Uuid) -> Option<(UserId, bool)> {
        let (_, conn) = self.connections.remove(&conn_id)?;

        self.rooms.retain(|_, members| {
            members.remove(&conn_id);
            !members.is_empty()
        });

        let mut last = true;
        if let Some(mut conns) = self.user_connections.get_mut(&conn.user_id) {
            conns.remove(&conn_id);
            last = conns.is_empty();
        }
        if last {
            self.user_connections.remove(&conn.user_id);
        }
        Some((conn.user_id, last))
    }

    pub fn subscribe(&self, conn_id: Uuid, code: &str) {
        self.rooms
            .entry(code.to_string())
            .or_default()
            .insert(conn_id);
    }

    pub fn unsubscribe(&self, conn_id: Uuid, code: &str) {
        if let Some(mut members) = self.rooms.get_mut(code) {
            members.remove(&conn_id);
        }
        self.rooms.remove_if(code, |_, members| members.is_empty());
    }

    pub fn close_room(&self, code: &str) {
        if let Some((_, members)) = self.rooms.remove(code) {
            debug!(room_code = %code, connections = members.len(), "[WS HUB] room channel closed");
        }
    }

    pub fn send_to_connection(&self, conn_id: Uuid, event: HubEvent) {
        if let Some(conn) = self.connections.get(&conn_id) {
            conn.recipient.do_send(event);
        }
    }

    pub fn send_to_user(&self, user_id: &str, event: HubEvent) {
        let Some(conns) = self.user_connections.get(user_id) else {
            return;
        };
        for conn_id in conns.iter() {
            self.send_to_connection(*conn_id, event.clone());
        }
    }

    pub fn broadcast_room(&self, code: &str, event: HubEvent) {
        let Some(members) = self.rooms.get(code) else {
            return;
        };
        for conn_id in members.iter() {
            self.send_to_connection(*conn_id, event.clone());
        }
    }

    pub fn is_subscribed(&self, conn_id: Uuid, code: &str) -> bool {
        self.rooms
            .get(code)
            .is_some_and(|members| members.contains(&conn_id))
    }

    pub fn active_connections_count(&self) -> usize {
        self.connections.len()
    }
}
