use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::effects::{EffectMetadata, EffectTarget};
use crate::domain::room::Room;
use crate::domain::round_scoring::RoundResult;
use crate::domain::state::{DuoEffect, EndChoice, GameState, PileIndex, RoomCode, UserId};
use crate::domain::Card;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all_fields = "camelCase")]
pub enum ClientMsg {
    #[serde(rename = "room:create")]
    RoomCreate { max_players: usize },
    #[serde(rename = "room:join")]
    RoomJoin { room_code: RoomCode },
    #[serde(rename = "room:leave")]
    RoomLeave,
    #[serde(rename = "room:get-info")]
    RoomGetInfo { room_code: RoomCode },
    #[serde(rename = "room:start-game")]
    RoomStartGame,

    #[serde(rename = "game:get-state")]
    GameGetState { room_code: RoomCode },
    #[serde(rename = "game:draw-from-deck")]
    DrawFromDeck,
    #[serde(rename = "game:draw-from-discard")]
    DrawFromDiscard { pile_index: PileIndex },
    #[serde(rename = "game:keep-card")]
    KeepCard {
        card_id: String,
        discard_pile_index: PileIndex,
    },
    #[serde(rename = "game:play-duo")]
    PlayDuo { card_ids: [String; 2] },
    #[serde(rename = "game:pass-turn")]
    PassTurn,
    #[serde(rename = "game:end-round")]
    EndRound { choice: EndChoice },

    #[serde(rename = "round:host-continue")]
    HostContinue,
    #[serde(rename = "round:host-stop")]
    HostStop,

    #[serde(rename = "effect:crab-select-pile")]
    CrabSelectPile { pile_index: PileIndex },
    #[serde(rename = "effect:crab-select-card")]
    CrabSelectCard {
        card_id: String,
        pile_index: PileIndex,
    },
    #[serde(rename = "effect:shark-swimmer-select-target")]
    SharkSwimmerSelectTarget { target_player_id: UserId },
}

impl ClientMsg {
    /// Messages of the `room:` family answer failures with `room:error`.
    pub fn is_room_command(&self) -> bool {
        matches!(
            self,
            ClientMsg::RoomCreate { .. }
                | ClientMsg::RoomJoin { .. }
                | ClientMsg::RoomLeave
                | ClientMsg::RoomGetInfo { .. }
                | ClientMsg::RoomStartGame
        )
    }
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all_fields = "camelCase")]
pub enum ServerMsg {
    #[serde(rename = "room:created")]
    RoomCreated { room_code: RoomCode },
    #[serde(rename = "room:joined")]
    RoomJoined { room: Room },
    #[serde(rename = "room:player-joined")]
    RoomPlayerJoined {
        player_id: UserId,
        player_name: String,
        room: Room,
    },
    #[serde(rename = "room:player-left")]
    RoomPlayerLeft { player_id: UserId },
    #[serde(rename = "room:error")]
    RoomError { message: String },
    #[serde(rename = "room:info")]
    RoomInfo { room: Room },

    #[serde(rename = "game:started")]
    GameStarted { game_state: GameState },
    #[serde(rename = "game:state-update")]
    GameStateUpdate { game_state: GameState },
    #[serde(rename = "game:invalid-action")]
    GameInvalidAction { message: String },
    #[serde(rename = "game:cards-drawn")]
    GameCardsDrawn { cards: [Card; 2] },
    #[serde(rename = "game:ended")]
    GameEnded {
        winner_id: UserId,
        final_scores: BTreeMap<UserId, u32>,
    },

    #[serde(rename = "round:ended")]
    RoundEnded {
        scores: BTreeMap<UserId, u32>,
        game_state: GameState,
        round_result: RoundResult,
    },
    #[serde(rename = "round:continue-requested")]
    RoundContinueRequested,

    #[serde(rename = "effect:crab-choose-pile")]
    EffectCrabChoosePile,
    #[serde(rename = "effect:crab-show-cards")]
    EffectCrabShowCards {
        pile_index: PileIndex,
        cards: Vec<Card>,
    },
    #[serde(rename = "effect:shark-swimmer-choose-target")]
    EffectSharkSwimmerChooseTarget { possible_targets: Vec<EffectTarget> },
    #[serde(rename = "effect:executed")]
    EffectExecuted {
        effect_type: DuoEffect,
        metadata: EffectMetadata,
    },
    #[serde(rename = "effect:failed")]
    EffectFailed {
        effect_type: DuoEffect,
        reason: String,
    },
}

impl ServerMsg {
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerMsg::RoomCreated { .. } => "room:created",
            ServerMsg::RoomJoined { .. } => "room:joined",
            ServerMsg::RoomPlayerJoined { .. } => "room:player-joined",
            ServerMsg::RoomPlayerLeft { .. } => "room:player-left",
            ServerMsg::RoomError { .. } => "room:error",
            ServerMsg::RoomInfo { .. } => "room:info",
            ServerMsg::GameStarted { .. } => "game:started",
            ServerMsg::GameStateUpdate { .. } => "game:state-update",
            ServerMsg::GameInvalidAction { .. } => "game:invalid-action",
            ServerMsg::GameCardsDrawn { .. } => "game:cards-drawn",
            ServerMsg::GameEnded { .. } => "game:ended",
            ServerMsg::RoundEnded { .. } => "round:ended",
            ServerMsg::RoundContinueRequested => "round:continue-requested",
            ServerMsg::EffectCrabChoosePile => "effect:crab-choose-pile",
            ServerMsg::EffectCrabShowCards { .. } => "effect:crab-show-cards",
            ServerMsg::EffectSharkSwimmerChooseTarget { .. } => "effect:shark-swimmer-choose-target",
            ServerMsg::EffectExecuted { .. } => "effect:executed",
            ServerMsg::EffectFailed { .. } => "effect:failed",
        }
    }

    pub fn state_update(state: &GameState) -> Self {
        ServerMsg::GameStateUpdate {
            game_state: state.clone(),
        }
    }
}
