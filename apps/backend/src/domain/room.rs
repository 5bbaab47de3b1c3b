//! Room membership record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::state::{RoomCode, UserId};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Waiting,
    Playing,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub code: RoomCode,
    pub host_id: UserId,
    /// Seat order; the game's player order follows it.
    pub players: Vec<UserId>,
    pub player_names: BTreeMap<UserId, String>,
    pub max_players: usize,
    pub status: RoomStatus,
}

impl Room {
    pub fn new(code: RoomCode, host_id: UserId, max_players: usize) -> Self {
        Self {
            code,
            players: vec![host_id.clone()],
            host_id,
            player_names: BTreeMap::new(),
            max_players,
            status: RoomStatus::Waiting,
        }
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.players.iter().any(|p| p == user_id)
    }

    pub fn is_host(&self, user_id: &str) -> bool {
        self.host_id == user_id
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players
    }
}
