//! In-memory session directory: live rooms, their games, and which room
//! each player sits in.
//!
//! The directory is the only owner of `GameState`. Callers read snapshots
//! and submit pure transforms through [`SessionDirectory::update_game_state`],
//! so a stored game is always a complete state between two operations.

use std::collections::HashMap;

use rand::Rng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::catalog::shuffled_with;
use crate::domain::engine::initialize_game;
use crate::domain::room::{Room, RoomStatus};
use crate::domain::rules::{valid_player_count, MAX_PLAYERS, MIN_PLAYERS};
use crate::domain::state::{GameState, PlayerState, RoomCode, UserId};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::utils::room_code::generate_room_code;

pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";

/// What happened to a room after a member left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub code: RoomCode,
    /// The room had no members left and was deleted with its game.
    pub room_closed: bool,
    /// Set when the leaving player was host and someone inherited the role.
    pub new_host: Option<UserId>,
}

#[derive(Debug, Default)]
pub struct SessionDirectory {
    rooms: HashMap<RoomCode, Room>,
    games: HashMap<RoomCode, GameState>,
    player_rooms: HashMap<UserId, RoomCode>,
    player_names: HashMap<UserId, String>,
}

impl SessionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_player_name(&mut self, user_id: &str, name: &str) {
        let name = name.trim();
        let name = if name.is_empty() {
            DEFAULT_PLAYER_NAME
        } else {
            name
        };
        self.player_names
            .insert(user_id.to_string(), name.to_string());
    }

    pub fn player_name(&self, user_id: &str) -> String {
        self.player_names
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string())
    }

    /// Open a room with `host_id` as its only member. The code is regenerated
    /// until it is unused among live rooms.
    pub fn create_room<R: Rng + ?Sized>(
        &mut self,
        host_id: &str,
        max_players: usize,
        rng: &mut R,
    ) -> Result<Room, DomainError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&max_players) {
            return Err(DomainError::validation(
                ValidationKind::InvalidPlayerCount,
                format!("maxPlayers must be between {MIN_PLAYERS} and {MAX_PLAYERS}"),
            ));
        }
        if self.player_rooms.contains_key(host_id) {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyInRoom,
                "Already in a room",
            ));
        }

        let code = loop {
            let candidate = generate_room_code(rng);
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
            debug!(room_code = %candidate, "Room code collision, regenerating");
        };

        let mut room = Room::new(code.clone(), host_id.to_string(), max_players);
        room.player_names
            .insert(host_id.to_string(), self.player_name(host_id));
        self.rooms.insert(code.clone(), room.clone());
        self.player_rooms.insert(host_id.to_string(), code.clone());

        info!(room_code = %code, host_id, max_players, "Room created");
        Ok(room)
    }

    pub fn room(&self, code: &str) -> Option<Room> {
        self.rooms.get(code).cloned()
    }

    /// Add `player_id` to the room. Joining a room one already belongs to is a
    /// no-op that returns the room.
    pub fn join_room(&mut self, code: &str, player_id: &str) -> Result<Room, DomainError> {
        let name = self.player_name(player_id);
        let current = self.player_rooms.get(player_id).cloned();

        let room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Room, "Room not found"))?;

        if room.is_member(player_id) {
            return Ok(room.clone());
        }
        if current.is_some() {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyInRoom,
                "Already in another room",
            ));
        }
        if room.status != RoomStatus::Waiting {
            return Err(DomainError::conflict(
                ConflictKind::RoomNotWaiting,
                "Game already started",
            ));
        }
        if room.is_full() {
            return Err(DomainError::conflict(ConflictKind::RoomFull, "Room is full"));
        }

        room.players.push(player_id.to_string());
        room.player_names.insert(player_id.to_string(), name);
        let joined = room.clone();
        self.player_rooms
            .insert(player_id.to_string(), code.to_string());

        info!(room_code = %code, player_id, "Player joined room");
        Ok(joined)
    }

    /// Remove the player from whatever room they are in. An emptied room is
    /// deleted together with its game.
    pub fn leave_room(&mut self, player_id: &str) -> Option<LeaveOutcome> {
        let code = self.player_rooms.remove(player_id)?;
        let room = self.rooms.get_mut(&code)?;

        room.players.retain(|p| p != player_id);
        room.player_names.remove(player_id);

        if room.players.is_empty() {
            self.rooms.remove(&code);
            self.games.remove(&code);
            info!(room_code = %code, "Last player left, room deleted");
            return Some(LeaveOutcome {
                code,
                room_closed: true,
                new_host: None,
            });
        }

        let mut new_host = None;
        if room.host_id == player_id {
            if let Some(next) = room.players.first() {
                room.host_id = next.clone();
                new_host = Some(next.clone());
            }
        }

        info!(room_code = %code, player_id, ?new_host, "Player left room");
        Some(LeaveOutcome {
            code,
            room_closed: false,
            new_host,
        })
    }

    pub fn room_of(&self, player_id: &str) -> Option<&RoomCode> {
        self.player_rooms.get(player_id)
    }

    /// Build and store the opening state for the room's members in seat order,
    /// and mark the room as playing.
    pub fn create_game_state<R: Rng + ?Sized>(
        &mut self,
        code: &str,
        rng: &mut R,
        now_ms: i64,
    ) -> Result<&GameState, DomainError> {
        let room = self
            .rooms
            .get(code)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Room, "Room not found"))?;
        if !valid_player_count(room.players.len()) {
            return Err(DomainError::validation(
                ValidationKind::InvalidPlayerCount,
                format!("Need at least {MIN_PLAYERS} players"),
            ));
        }

        let players = room
            .players
            .iter()
            .map(|id| {
                let name = room
                    .player_names
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| self.player_name(id));
                PlayerState::new(id.clone(), name)
            })
            .collect();

        let state = initialize_game(
            Uuid::new_v4(),
            code.to_string(),
            players,
            shuffled_with(rng),
            now_ms,
        )?;

        if let Some(room) = self.rooms.get_mut(code) {
            room.status = RoomStatus::Playing;
        }
        info!(room_code = %code, game_id = %state.id, "Game state created");
        self.games.insert(code.to_string(), state);
        self.games
            .get(code)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Game, "Game not found"))
    }

    pub fn game_state(&self, code: &str) -> Option<&GameState> {
        self.games.get(code)
    }

    /// Replace the stored game with `updater`'s result. A rejected update
    /// leaves the stored game untouched; an accepted one bumps `version`,
    /// and `turn_seq` too when the turn sub-state moved.
    pub fn update_game_state<F>(&mut self, code: &str, updater: F) -> Result<&GameState, DomainError>
    where
        F: FnOnce(&GameState) -> Result<GameState, DomainError>,
    {
        self.update_game_state_with(code, |state| updater(state).map(|next| (next, ())))
            .map(|(state, ())| state)
    }

    /// Like [`Self::update_game_state`] for transforms that also yield a value.
    pub fn update_game_state_with<F, T>(
        &mut self,
        code: &str,
        updater: F,
    ) -> Result<(&GameState, T), DomainError>
    where
        F: FnOnce(&GameState) -> Result<(GameState, T), DomainError>,
    {
        let slot = self
            .games
            .get_mut(code)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Game, "Game not found"))?;

        let (mut next, extra) = updater(&*slot)?;
        next.version = slot.version + 1;
        next.turn_seq = if next.turn == slot.turn {
            slot.turn_seq
        } else {
            slot.turn_seq + 1
        };
        *slot = next;
        let stored: &GameState = slot;
        Ok((stored, extra))
    }

    /// Drop the room, its game and every membership pointing at it.
    pub fn close_room(&mut self, code: &str) -> Vec<UserId> {
        self.games.remove(code);
        let Some(room) = self.rooms.remove(code) else {
            return Vec::new();
        };
        for player in &room.players {
            self.player_rooms.remove(player);
        }
        info!(room_code = %code, "Room closed");
        room.players
    }

    /// Flag the player's seat in a running game. Returns the room code when a
    /// game was updated.
    pub fn set_connected(&mut self, user_id: &str, connected: bool) -> Option<RoomCode> {
        let code = self.player_rooms.get(user_id)?.clone();
        let already = self
            .games
            .get(&code)?
            .player(user_id)
            .map(|p| p.connected)?;
        if already == connected {
            return None;
        }
        self.update_game_state(&code, |state| {
            let mut next = state.clone();
            if let Some(idx) = next.player_index(user_id) {
                next.players[idx].connected = connected;
            }
            Ok(next)
        })
        .ok()?;
        Some(code)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }
}
