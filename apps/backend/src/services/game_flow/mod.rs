//! Game flow orchestration service - bridges protocol messages with the pure
//! domain engine and the session directory.
//!
//! Every inbound command is handled to completion: validate, read the stored
//! snapshot, submit a transform, then describe what must be sent where as a
//! list of [`Delivery`] values. The service performs no I/O itself; the game
//! server actor turns deliveries into socket frames, timers and persistence.

mod effects;
mod rooms;
mod rounds;
mod turns;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info};

use crate::domain::state::{GameState, GameStatus, RoomCode, UserId};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::extractors::current_player::CurrentPlayer;
use crate::services::directory::SessionDirectory;
use crate::services::match_recorder::MatchRecord;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// One outbound effect of handling a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// To the connection that sent the command.
    Direct(ServerMsg),
    /// To every connection of one user.
    User { user_id: UserId, msg: ServerMsg },
    /// To every connection subscribed to the room channel.
    Room { code: RoomCode, msg: ServerMsg },
    /// Attach the sending connection to the room channel.
    Subscribe(RoomCode),
    /// Detach the sending connection from the room channel.
    Unsubscribe(RoomCode),
    /// Detach every connection from the room channel.
    CloseChannel(RoomCode),
    /// Hand a finished match to the recorder.
    Persist(MatchRecord),
    /// Resolve the parked sub-state later if the turn is still at `turn_seq`.
    ScheduleTimeout { code: RoomCode, turn_seq: u64 },
}

pub struct GameFlowService {
    directory: SessionDirectory,
    rng: Box<dyn RngCore + Send>,
}

impl Default for GameFlowService {
    fn default() -> Self {
        Self::new(Box::new(StdRng::from_os_rng()))
    }
}

impl GameFlowService {
    pub fn new(rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            directory: SessionDirectory::new(),
            rng,
        }
    }

    pub fn directory(&self) -> &SessionDirectory {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut SessionDirectory {
        &mut self.directory
    }

    /// Handle one client command. Rejections become a direct `room:error` for
    /// room commands and `game:invalid-action` for everything else; a rejected
    /// command never changes stored state.
    pub fn handle(&mut self, caller: &CurrentPlayer, msg: ClientMsg) -> Vec<Delivery> {
        let room_command = msg.is_room_command();
        let mut out = Vec::new();

        let result = match msg {
            ClientMsg::RoomCreate { max_players } => self.create_room(caller, max_players, &mut out),
            ClientMsg::RoomJoin { room_code } => self.join_room(caller, &room_code, &mut out),
            ClientMsg::RoomLeave => self.leave_room(caller, &mut out),
            ClientMsg::RoomGetInfo { room_code } => self.room_info(&room_code, &mut out),
            ClientMsg::RoomStartGame => self.start_game(caller, &mut out),
            ClientMsg::GameGetState { room_code } => self.get_state(caller, &room_code, &mut out),
            ClientMsg::DrawFromDeck => self.draw_from_deck(caller, &mut out),
            ClientMsg::DrawFromDiscard { pile_index } => {
                self.draw_from_discard(caller, pile_index, &mut out)
            }
            ClientMsg::KeepCard {
                card_id,
                discard_pile_index,
            } => self.keep_card(caller, &card_id, discard_pile_index, &mut out),
            ClientMsg::PlayDuo { card_ids } => self.play_duo(caller, &card_ids, &mut out),
            ClientMsg::PassTurn => self.pass_turn(caller, &mut out),
            ClientMsg::EndRound { choice } => self.end_round(caller, choice, &mut out),
            ClientMsg::HostContinue => self.host_continue(caller, &mut out),
            ClientMsg::HostStop => self.host_stop(caller, &mut out),
            ClientMsg::CrabSelectPile { pile_index } => {
                self.crab_select_pile(caller, pile_index, &mut out)
            }
            ClientMsg::CrabSelectCard {
                card_id,
                pile_index,
            } => self.crab_select_card(caller, &card_id, pile_index, &mut out),
            ClientMsg::SharkSwimmerSelectTarget { target_player_id } => {
                self.shark_swimmer_select_target(caller, &target_player_id, &mut out)
            }
        };

        if let Err(err) = result {
            debug!(user_id = %caller.user_id, error = %err, "Command rejected");
            let message = err.detail().to_string();
            // Partial output of a rejected command is never sent.
            out.clear();
            out.push(Delivery::Direct(if room_command {
                ServerMsg::RoomError { message }
            } else {
                ServerMsg::GameInvalidAction { message }
            }));
        }
        out
    }

    /// The caller's connection went away for good.
    pub fn disconnect(&mut self, user_id: &str) -> Vec<Delivery> {
        let Some(code) = self.directory.set_connected(user_id, false) else {
            return Vec::new();
        };
        info!(room_code = %code, user_id, "Player marked disconnected");
        self.state_broadcast(&code).into_iter().collect()
    }

    /// Room the caller sits in with a game in progress.
    fn active_game(&self, caller: &CurrentPlayer) -> Result<RoomCode, DomainError> {
        let code = self
            .directory
            .room_of(&caller.user_id)
            .cloned()
            .ok_or_else(|| DomainError::validation(ValidationKind::NotInRoom, "Not in a room"))?;
        let state = self.game(&code)?;
        if state.status != GameStatus::Playing {
            return Err(DomainError::conflict(
                ConflictKind::GameAlreadyWon,
                "Game is over",
            ));
        }
        Ok(code)
    }

    fn game(&self, code: &str) -> Result<&GameState, DomainError> {
        self.directory
            .game_state(code)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Game, "Game not started"))
    }

    fn state_broadcast(&self, code: &str) -> Option<Delivery> {
        self.directory.game_state(code).map(|state| Delivery::Room {
            code: code.to_string(),
            msg: ServerMsg::state_update(state),
        })
    }

    fn broadcast_state(code: &str, state: &GameState, out: &mut Vec<Delivery>) {
        out.push(Delivery::Room {
            code: code.to_string(),
            msg: ServerMsg::state_update(state),
        });
    }
}
