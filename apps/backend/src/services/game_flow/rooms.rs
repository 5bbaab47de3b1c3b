use tracing::info;

use super::{Delivery, GameFlowService};
use crate::domain::room::RoomStatus;
use crate::domain::rules::MIN_PLAYERS;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::extractors::current_player::CurrentPlayer;
use crate::utils::room_code::normalize_room_code;
use crate::utils::time::now_millis;
use crate::ws::protocol::ServerMsg;

impl GameFlowService {
    pub(super) fn create_room(
        &mut self,
        caller: &CurrentPlayer,
        max_players: usize,
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        self.directory
            .set_player_name(&caller.user_id, &caller.display_name);
        let room = self
            .directory
            .create_room(&caller.user_id, max_players, &mut *self.rng)?;

        out.push(Delivery::Subscribe(room.code.clone()));
        out.push(Delivery::Direct(ServerMsg::RoomCreated {
            room_code: room.code.clone(),
        }));
        out.push(Delivery::Direct(ServerMsg::RoomJoined { room }));
        Ok(())
    }

    pub(super) fn join_room(
        &mut self,
        caller: &CurrentPlayer,
        raw_code: &str,
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        let code = normalize_room_code(raw_code);
        self.directory
            .set_player_name(&caller.user_id, &caller.display_name);
        let already_member = self
            .directory
            .room(&code)
            .is_some_and(|room| room.is_member(&caller.user_id));
        let room = self.directory.join_room(&code, &caller.user_id)?;

        out.push(Delivery::Subscribe(code.clone()));
        out.push(Delivery::Direct(ServerMsg::RoomJoined { room: room.clone() }));
        if !already_member {
            out.push(Delivery::Room {
                code,
                msg: ServerMsg::RoomPlayerJoined {
                    player_id: caller.user_id.clone(),
                    player_name: self.directory.player_name(&caller.user_id),
                    room,
                },
            });
        }
        Ok(())
    }

    pub(super) fn leave_room(
        &mut self,
        caller: &CurrentPlayer,
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        if self.directory.room_of(&caller.user_id).is_none() {
            return Err(DomainError::validation(
                ValidationKind::NotInRoom,
                "Not in a room",
            ));
        }

        // A seat in a running game stays; it is only flagged as gone.
        let flagged = self.directory.set_connected(&caller.user_id, false);
        let state_update = flagged.and_then(|code| self.state_broadcast(&code));

        let Some(outcome) = self.directory.leave_room(&caller.user_id) else {
            return Ok(());
        };

        out.push(Delivery::Unsubscribe(outcome.code.clone()));
        if outcome.room_closed {
            out.push(Delivery::CloseChannel(outcome.code));
            return Ok(());
        }

        out.push(Delivery::Room {
            code: outcome.code,
            msg: ServerMsg::RoomPlayerLeft {
                player_id: caller.user_id.clone(),
            },
        });
        out.extend(state_update);
        Ok(())
    }

    pub(super) fn room_info(
        &self,
        raw_code: &str,
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        let room = self
            .directory
            .room(&normalize_room_code(raw_code))
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Room, "Room not found"))?;
        out.push(Delivery::Direct(ServerMsg::RoomInfo { room }));
        Ok(())
    }

    pub(super) fn start_game(
        &mut self,
        caller: &CurrentPlayer,
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        let code = self
            .directory
            .room_of(&caller.user_id)
            .cloned()
            .ok_or_else(|| DomainError::validation(ValidationKind::NotInRoom, "Not in a room"))?;
        let room = self
            .directory
            .room(&code)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Room, "Room not found"))?;

        if !room.is_host(&caller.user_id) {
            return Err(DomainError::validation(
                ValidationKind::NotHost,
                "Only host can start game",
            ));
        }
        if room.status != RoomStatus::Waiting {
            return Err(DomainError::conflict(
                ConflictKind::RoomNotWaiting,
                "Game already started",
            ));
        }
        if room.players.len() < MIN_PLAYERS {
            return Err(DomainError::validation(
                ValidationKind::InvalidPlayerCount,
                format!("Need at least {MIN_PLAYERS} players"),
            ));
        }

        let state = self
            .directory
            .create_game_state(&code, &mut *self.rng, now_millis())?;
        info!(room_code = %code, players = state.players.len(), "Game started");

        out.push(Delivery::Room {
            code,
            msg: ServerMsg::GameStarted {
                game_state: state.clone(),
            },
        });
        Ok(())
    }

    /// Re-attach a member's connection and send it the current state.
    pub(super) fn get_state(
        &mut self,
        caller: &CurrentPlayer,
        raw_code: &str,
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        let code = normalize_room_code(raw_code);
        let room = self
            .directory
            .room(&code)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Room, "Room not found"))?;
        if !room.is_member(&caller.user_id) {
            return Err(DomainError::validation(
                ValidationKind::NotInRoom,
                "Not a member of this room",
            ));
        }
        self.game(&code)?;

        out.push(Delivery::Subscribe(code.clone()));
        if let Some(updated) = self.directory.set_connected(&caller.user_id, true) {
            out.extend(self.state_broadcast(&updated));
        }
        let state = self.game(&code)?;
        out.push(Delivery::Direct(ServerMsg::state_update(state)));
        Ok(())
    }
}
