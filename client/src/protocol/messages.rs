use crate::session::GameState;
use serde::{Deserialize, Serialize};

/// Server to client events
///
/// Every event travels as one JSON text frame, externally tagged with a
/// snake_case `type` field. Transport-level connect/disconnect are not wire
/// events; they surface from the socket lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A fresh mission has been generated for this client
    InitialMission {
        persona: String,
        first_message: String,
        max_turns: u32,
        technical_goal: String,
        personality_trait: String,
    },
    /// The server still holds the session and resumes the mission itself.
    /// `first_message` is the last persona message, for transcript rebuild.
    ResumeMission {
        persona: String,
        first_message: String,
        current_turn: u32,
        max_turns: u32,
    },
    /// The server rebuilt its session from the state we offered
    SessionRestored,
    /// The server holds no matching session and cannot recover ours.
    /// Terminal for the current mission.
    ServerLostSession,
    /// The server discarded any prior session; a fresh mission follows
    ServerRequestsNewGame,
    /// The persona replied; `turn` is the 1-based turn now being played
    NewBotMessage {
        message: String,
        turn: u32,
        max_turns: u32,
    },
    /// Mission finished. `score` is only present on wins.
    GameOver {
        win: bool,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score: Option<u32>,
    },
    /// Forward-compatibility: events this client does not understand
    #[serde(other)]
    Unknown,
}

/// Client to server events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Reconnection offer: whether we believe a mission is active, and the
    /// cached state the server may rebuild its session from.
    /// The server reads `hasGame`/`gameState` in camelCase; the snapshot
    /// fields inside stay snake_case.
    ClientHasGame {
        #[serde(rename = "hasGame")]
        has_game: bool,
        #[serde(rename = "gameState", default, skip_serializing_if = "Option::is_none")]
        game_state: Option<GameState>,
    },
    /// A line typed by the player
    PlayerMessage { message: String },
}

impl ServerEvent {
    /// Get the event type name for metrics
    pub fn message_type(&self) -> &'static str {
        match self {
            ServerEvent::InitialMission { .. } => "initial_mission",
            ServerEvent::ResumeMission { .. } => "resume_mission",
            ServerEvent::SessionRestored => "session_restored",
            ServerEvent::ServerLostSession => "server_lost_session",
            ServerEvent::ServerRequestsNewGame => "server_requests_new_game",
            ServerEvent::NewBotMessage { .. } => "new_bot_message",
            ServerEvent::GameOver { .. } => "game_over",
            ServerEvent::Unknown => "unknown",
        }
    }
}

impl ClientEvent {
    /// Get the event type name for metrics
    pub fn message_type(&self) -> &'static str {
        match self {
            ClientEvent::ClientHasGame { .. } => "client_has_game",
            ClientEvent::PlayerMessage { .. } => "player_message",
        }
    }
}
