//! Duo play and the follow-up choices of crab and shark/swimmer effects.

use tracing::{debug, info};

use super::{Delivery, GameFlowService};
use crate::domain::effects::{
    apply_crab_effect, apply_fish_effect, apply_shark_swimmer_effect, await_effect_choice,
    clear_pending_effect, duo_effect_type, possible_targets, EffectMetadata, EffectTarget,
};
use crate::domain::engine;
use crate::domain::state::{require_turn, DuoEffect, GameState, PileIndex};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::extractors::current_player::CurrentPlayer;
use crate::ws::protocol::ServerMsg;

/// How a freshly played duo left the turn.
enum DuoResolution {
    /// No follow-up; the turn continues or has passed.
    Done {
        effect: Option<DuoEffect>,
        metadata: EffectMetadata,
    },
    /// The effect could not run; the duo still counts and the turn passed.
    Failed { effect: DuoEffect, reason: &'static str },
    /// Waiting for the crab pile choice.
    AwaitCrab,
    /// Waiting for the shark/swimmer target choice.
    AwaitTarget(Vec<EffectTarget>),
}

fn require_pending(state: &GameState, effect: DuoEffect) -> Result<(), DomainError> {
    match state.pending_effect() {
        Some(pending) if pending.effect == effect => Ok(()),
        _ => Err(DomainError::validation(
            ValidationKind::NoPendingChoice,
            format!("No {} effect pending", effect.as_str()),
        )),
    }
}

/// Play the duo and run as much of its effect as needs no further input.
fn resolve_duo(
    state: &GameState,
    ids: &[String; 2],
) -> Result<(GameState, DuoResolution), DomainError> {
    let acting = state.current_player();
    let effect = match (acting.hand_card(&ids[0]), acting.hand_card(&ids[1])) {
        (Some(a), Some(b)) => duo_effect_type(a, b),
        _ => None,
    };
    let played = engine::play_duo(state, &ids[0], &ids[1])?;

    let Some(effect) = effect else {
        return Ok((
            played,
            DuoResolution::Done {
                effect: None,
                metadata: EffectMetadata::default(),
            },
        ));
    };

    match effect {
        DuoEffect::Fish => {
            let outcome = apply_fish_effect(&played);
            let next = engine::pass_turn(&outcome.state)?;
            let resolution = if outcome.success {
                DuoResolution::Done {
                    effect: Some(effect),
                    metadata: outcome.metadata,
                }
            } else {
                DuoResolution::Failed {
                    effect,
                    reason: "deck is empty",
                }
            };
            Ok((next, resolution))
        }
        DuoEffect::Boat => Ok((
            played,
            DuoResolution::Done {
                effect: Some(effect),
                metadata: EffectMetadata::default(),
            },
        )),
        DuoEffect::Crab => {
            if played.discard_pile1.is_empty() && played.discard_pile2.is_empty() {
                let next = engine::pass_turn(&played)?;
                return Ok((
                    next,
                    DuoResolution::Failed {
                        effect,
                        reason: "discard piles are empty",
                    },
                ));
            }
            let parked = await_effect_choice(&played, effect, ids.clone());
            Ok((parked, DuoResolution::AwaitCrab))
        }
        DuoEffect::SharkSwimmer => {
            let targets = possible_targets(&played);
            if targets.is_empty() {
                let next = engine::pass_turn(&played)?;
                return Ok((
                    next,
                    DuoResolution::Failed {
                        effect,
                        reason: "no opponent has cards",
                    },
                ));
            }
            let parked = await_effect_choice(&played, effect, ids.clone());
            Ok((parked, DuoResolution::AwaitTarget(targets)))
        }
    }
}

impl GameFlowService {
    pub(super) fn play_duo(
        &mut self,
        caller: &CurrentPlayer,
        card_ids: &[String; 2],
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        let code = self.active_game(caller)?;
        let (state, resolution) = self.directory.update_game_state_with(&code, |s| {
            require_turn(s, &caller.user_id)?;
            resolve_duo(s, card_ids)
        })?;

        Self::broadcast_state(&code, state, out);
        match resolution {
            DuoResolution::Done { effect, metadata } => {
                info!(room_code = %code, user_id = %caller.user_id, effect = ?effect, "Duo played");
                if let Some(effect_type) = effect {
                    out.push(Delivery::Direct(ServerMsg::EffectExecuted {
                        effect_type,
                        metadata,
                    }));
                }
            }
            DuoResolution::Failed { effect, reason } => {
                info!(room_code = %code, effect = effect.as_str(), reason, "Duo effect failed");
                out.push(Delivery::Direct(ServerMsg::EffectFailed {
                    effect_type: effect,
                    reason: reason.to_string(),
                }));
            }
            DuoResolution::AwaitCrab => {
                out.push(Delivery::Direct(ServerMsg::EffectCrabChoosePile));
                out.push(Delivery::ScheduleTimeout {
                    turn_seq: state.turn_seq,
                    code,
                });
            }
            DuoResolution::AwaitTarget(possible_targets) => {
                out.push(Delivery::Direct(ServerMsg::EffectSharkSwimmerChooseTarget {
                    possible_targets,
                }));
                out.push(Delivery::ScheduleTimeout {
                    turn_seq: state.turn_seq,
                    code,
                });
            }
        }
        Ok(())
    }

    /// Show the chosen pile. An empty pile is reported and the effect stays
    /// pending.
    pub(super) fn crab_select_pile(
        &mut self,
        caller: &CurrentPlayer,
        pile: PileIndex,
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        let code = self.active_game(caller)?;
        let state = self.game(&code)?;
        require_turn(state, &caller.user_id)?;
        require_pending(state, DuoEffect::Crab)?;

        let cards = state.pile(pile).clone();
        if cards.is_empty() {
            out.push(Delivery::Direct(ServerMsg::EffectFailed {
                effect_type: DuoEffect::Crab,
                reason: "discard pile is empty".to_string(),
            }));
            return Ok(());
        }
        out.push(Delivery::Direct(ServerMsg::EffectCrabShowCards {
            pile_index: pile,
            cards,
        }));
        Ok(())
    }

    pub(super) fn crab_select_card(
        &mut self,
        caller: &CurrentPlayer,
        card_id: &str,
        pile: PileIndex,
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        let code = self.active_game(caller)?;
        let result = self.directory.update_game_state_with(&code, |s| {
            require_turn(s, &caller.user_id)?;
            require_pending(s, DuoEffect::Crab)?;
            let outcome = apply_crab_effect(s, pile, card_id);
            if !outcome.success {
                return Err(DomainError::validation(
                    ValidationKind::InvalidCard,
                    "card not found in discard pile",
                ));
            }
            let next = engine::pass_turn(&clear_pending_effect(&outcome.state))?;
            Ok((next, outcome.metadata))
        });

        Self::report_effect(&code, DuoEffect::Crab, &ValidationKind::InvalidCard, result, out)
    }

    pub(super) fn shark_swimmer_select_target(
        &mut self,
        caller: &CurrentPlayer,
        target_id: &str,
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        let code = self.active_game(caller)?;
        let rng = &mut self.rng;
        let result = self.directory.update_game_state_with(&code, |s| {
            require_turn(s, &caller.user_id)?;
            require_pending(s, DuoEffect::SharkSwimmer)?;
            let outcome = apply_shark_swimmer_effect(s, target_id, &mut **rng);
            if !outcome.success {
                return Err(DomainError::validation(
                    ValidationKind::InvalidTarget,
                    "invalid target or target has no cards",
                ));
            }
            let next = engine::pass_turn(&clear_pending_effect(&outcome.state))?;
            Ok((next, outcome.metadata))
        });

        Self::report_effect(
            &code,
            DuoEffect::SharkSwimmer,
            &ValidationKind::InvalidTarget,
            result,
            out,
        )
    }

    /// A resolved effect broadcasts and confirms to the actor; an unusable
    /// choice of kind `retry_kind` is reported and the effect stays pending.
    fn report_effect(
        code: &str,
        effect: DuoEffect,
        retry_kind: &ValidationKind,
        result: Result<(&GameState, EffectMetadata), DomainError>,
        out: &mut Vec<Delivery>,
    ) -> Result<(), DomainError> {
        match result {
            Ok((state, metadata)) => {
                info!(room_code = %code, effect = effect.as_str(), "Duo effect resolved");
                Self::broadcast_state(code, state, out);
                out.push(Delivery::Direct(ServerMsg::EffectExecuted {
                    effect_type: effect,
                    metadata,
                }));
                Ok(())
            }
            Err(err) if err.is_validation(retry_kind) => {
                debug!(room_code = %code, effect = effect.as_str(), "Effect choice unusable");
                out.push(Delivery::Direct(ServerMsg::EffectFailed {
                    effect_type: effect,
                    reason: err.detail().to_string(),
                }));
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
