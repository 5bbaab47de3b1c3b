use std::collections::BTreeMap;

use tracing::info;

use super::{Delivery, GameFlowService};
use crate::domain::engine;
use crate::domain::round_scoring::{
    apply_round_result, calculate_round_scores, leader_at_target, overall_leader,
};
use crate::domain::scoring::has_winning_condition;
use crate::domain::state::{require_turn, EndChoice, GameStatus, RoomCode, RoundPhase, UserId};
use crate::errors::domain::{
    ConflictKind, DomainError, NotFoundKind, ValidationKind,
};
use crate::extractors::current_player::CurrentPlayer;
use crate::services::match_recorder::{GameEndReason, MatchRecord};
use crate::utils::time::now_millis;
use crate::ws::protocol::ServerMsg;

impl GameFlowService {
    pub(super) fn end_round(
        &mut self,
        caller: &CurrentPlayer,
        choice: EndChoice,
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        let code = self.active_game(caller)?;
        let immediate_win = {
            let state = self.game(&code)?;
            require_turn(state, &caller.user_id)?;
            has_winning_condition(state.current_player())
        };
        if immediate_win {
            info!(room_code = %code, user_id = %caller.user_id, "Four sirens played");
            return self.finish_game(&code, caller.user_id.clone(), GameEndReason::ImmediateWin, out);
        }

        let declared = self
            .directory
            .update_game_state(&code, |s| engine::end_round(s, &caller.user_id, choice))?;
        Self::broadcast_state(&code, declared, out);

        let result = calculate_round_scores(declared).ok_or_else(|| {
            DomainError::validation(ValidationKind::PhaseMismatch, "Round has no declaration")
        })?;
        let state = self
            .directory
            .update_game_state(&code, |s| Ok(apply_round_result(s, &result)))?;
        info!(
            room_code = %code,
            round = state.round_number,
            ender = %result.round_ender,
            ender_won = result.round_ender_won,
            "Round settled"
        );

        if let Some(leader) = leader_at_target(state) {
            let winner = leader.user_id.clone();
            return self.finish_game(&code, winner, GameEndReason::ScoreReached, out);
        }

        let scores: BTreeMap<UserId, u32> = result
            .player_scores
            .iter()
            .map(|s| (s.user_id.clone(), s.total_points))
            .collect();
        out.push(Delivery::Room {
            code,
            msg: ServerMsg::RoundEnded {
                scores,
                game_state: state.clone(),
                round_result: result,
            },
        });
        Ok(())
    }

    pub(super) fn host_continue(
        &mut self,
        caller: &CurrentPlayer,
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        let code = self.hosted_game(caller, "Only host can continue")?;
        {
            let state = self.game(&code)?;
            if state.round_phase != RoundPhase::EndTurn {
                return Err(DomainError::validation(
                    ValidationKind::PhaseMismatch,
                    "Round is not over",
                ));
            }
            if leader_at_target(state).is_some() {
                return Err(DomainError::conflict(
                    ConflictKind::GameAlreadyWon,
                    "Game is already won",
                ));
            }
        }

        let state = self
            .directory
            .update_game_state(&code, |s| Ok(engine::reset_for_next_round(s)))?;
        info!(room_code = %code, round = state.round_number, "Next round");

        out.push(Delivery::Room {
            code: code.clone(),
            msg: ServerMsg::RoundContinueRequested,
        });
        Self::broadcast_state(&code, state, out);
        Ok(())
    }

    pub(super) fn host_stop(
        &mut self,
        caller: &CurrentPlayer,
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        let code = self.hosted_game(caller, "Only host can stop")?;
        let winner = overall_leader(self.game(&code)?)
            .map(|p| p.user_id.clone())
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, "No players"))?;
        self.finish_game(&code, winner, GameEndReason::HostStopped, out)
    }

    /// The caller's running game, provided they host its room.
    fn hosted_game(
        &self,
        caller: &CurrentPlayer,
        not_host: &'static str,
    ) -> Result<RoomCode, DomainError> {
        let code = self.active_game(caller)?;
        let is_host = self
            .directory
            .room(&code)
            .is_some_and(|room| room.is_host(&caller.user_id));
        if !is_host {
            return Err(DomainError::validation(ValidationKind::NotHost, not_host));
        }
        Ok(code)
    }

    /// End the game: announce the winner, hand two-player results to the
    /// recorder, then dissolve the room.
    fn finish_game(
        &mut self,
        code: &str,
        winner_id: UserId,
        reason: GameEndReason,
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        let state = self.directory.update_game_state(code, |s| {
            let mut next = s.clone();
            next.status = GameStatus::Ended;
            Ok(next)
        })?;

        let final_scores: BTreeMap<UserId, u32> = state
            .players
            .iter()
            .map(|p| (p.user_id.clone(), p.score))
            .collect();
        let record = MatchRecord::from_final_state(state, &winner_id, reason, now_millis());
        info!(room_code = %code, winner_id = %winner_id, reason = reason.as_str(), "Game ended");

        out.push(Delivery::Room {
            code: code.to_string(),
            msg: ServerMsg::GameEnded {
                winner_id,
                final_scores,
            },
        });
        out.extend(record.map(Delivery::Persist));

        self.directory.close_room(code);
        out.push(Delivery::CloseChannel(code.to_string()));
        Ok(())
    }
}
