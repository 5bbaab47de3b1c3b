use tracing::debug;

use super::{Delivery, GameFlowService};
use crate::domain::effects::clear_pending_effect;
use crate::domain::engine;
use crate::domain::state::{require_turn, PileIndex, TurnState};
use crate::domain::GameStatus;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::extractors::current_player::CurrentPlayer;
use crate::ws::protocol::ServerMsg;

impl GameFlowService {
    pub(super) fn draw_from_deck(
        &mut self,
        caller: &CurrentPlayer,
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        let code = self.active_game(caller)?;
        let state = self.directory.update_game_state(&code, |s| {
            require_turn(s, &caller.user_id)?;
            engine::draw_from_deck(s)
        })?;
        let cards = state.drawn_cards().cloned().ok_or_else(|| {
            DomainError::validation(ValidationKind::NoPendingChoice, "No cards to choose from")
        })?;

        out.push(Delivery::Direct(ServerMsg::GameCardsDrawn { cards }));
        Self::broadcast_state(&code, state, out);
        out.push(Delivery::ScheduleTimeout {
            turn_seq: state.turn_seq,
            code,
        });
        Ok(())
    }

    pub(super) fn draw_from_discard(
        &mut self,
        caller: &CurrentPlayer,
        pile: PileIndex,
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        let code = self.active_game(caller)?;
        let state = self.directory.update_game_state(&code, |s| {
            require_turn(s, &caller.user_id)?;
            engine::draw_from_discard(s, pile)
        })?;
        Self::broadcast_state(&code, state, out);
        Ok(())
    }

    pub(super) fn keep_card(
        &mut self,
        caller: &CurrentPlayer,
        card_id: &str,
        discard_pile: PileIndex,
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        let code = self.active_game(caller)?;
        let state = self.directory.update_game_state(&code, |s| {
            require_turn(s, &caller.user_id)?;
            engine::keep_card(s, card_id, discard_pile)
        })?;
        Self::broadcast_state(&code, state, out);
        Ok(())
    }

    pub(super) fn pass_turn(
        &mut self,
        caller: &CurrentPlayer,
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        let code = self.active_game(caller)?;
        let state = self.directory.update_game_state(&code, |s| {
            require_turn(s, &caller.user_id)?;
            engine::pass_turn(s)
        })?;
        Self::broadcast_state(&code, state, out);
        Ok(())
    }

    /// Auto-resolve a parked sub-state that is still at `turn_seq`. A keep
    /// choice keeps the first drawn card and discards the second on pile 1;
    /// a pending effect is dropped and the turn passes.
    pub fn expire_pending(&mut self, code: &str, turn_seq: u64) -> Vec<Delivery> {
        let Some(state) = self.directory.game_state(code) else {
            return Vec::new();
        };
        if state.turn_seq != turn_seq || state.status != GameStatus::Playing {
            return Vec::new();
        }

        let mut out = Vec::new();
        let result = match state.turn.clone() {
            TurnState::Idle => return out,
            TurnState::AwaitingKeepChoice { cards } => {
                let [keep, _] = cards;
                self.directory
                    .update_game_state(code, |s| engine::keep_card(s, &keep.id, PileIndex::One))
            }
            TurnState::AwaitingEffectChoice { pending } => {
                out.push(Delivery::User {
                    user_id: pending.player_id.clone(),
                    msg: ServerMsg::EffectFailed {
                        effect_type: pending.effect,
                        reason: "timed out".to_string(),
                    },
                });
                self.directory
                    .update_game_state(code, |s| engine::pass_turn(&clear_pending_effect(s)))
            }
        };

        match result {
            Ok(state) => {
                debug!(room_code = %code, turn_seq, "Parked turn auto-resolved");
                Self::broadcast_state(code, state, &mut out);
                out
            }
            Err(err) => {
                debug!(room_code = %code, error = %err, "Auto-resolve rejected");
                Vec::new()
            }
        }
    }
}
