use crate::protocol::{ClientEvent, ServerEvent};
use crate::session::state::GameState;
use metrics::counter;
use tracing::{debug, info, warn};

/// Where the client believes the mission stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No mission underway (startup, mission ended, or awaiting a fresh one)
    Idle,
    /// A mission is believed active
    Active,
    /// The server declared the session unrecoverable. Dead end: the cache is
    /// gone and input stays disabled until the process restarts.
    Lost,
}

/// Reconciles the client's belief about the active mission with the server
/// on every connection event.
///
/// The server is the sole source of truth. This component owns the cached
/// snapshot exclusively and applies events strictly in transport-delivery
/// order, so a scripted event sequence fully determines its state and the
/// offers it produces.
#[derive(Debug)]
pub struct SessionReconciler {
    connected: bool,
    ever_connected: bool,
    phase: Phase,
    cached: Option<GameState>,
}

impl SessionReconciler {
    pub fn new() -> Self {
        Self {
            connected: false,
            ever_connected: false,
            phase: Phase::Idle,
            cached: None,
        }
    }

    /// Transport established a connection. Always produces the offer to send:
    /// the cached snapshot when a mission is believed active, otherwise a
    /// plain "no game" announcement.
    pub fn on_connect(&mut self) -> ClientEvent {
        let reconnect = self.ever_connected;
        self.connected = true;
        self.ever_connected = true;

        let game_state = match (self.phase, &self.cached) {
            (Phase::Active, Some(state)) => Some(state.clone()),
            _ => None,
        };
        let has_game = game_state.is_some();

        if reconnect {
            info!(has_game, "reconnected, offering session state");
        } else {
            debug!("first connection, no session to offer");
        }
        counter!("missionchat_offers_total", "has_game" => if has_game { "true" } else { "false" })
            .increment(1);

        ClientEvent::ClientHasGame {
            has_game,
            game_state,
        }
    }

    /// Transport dropped. The cache survives so it can be re-offered.
    pub fn on_disconnect(&mut self) {
        self.connected = false;
        debug!(phase = ?self.phase, "transport dropped");
    }

    /// Apply a server event to the local belief
    pub fn apply(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::InitialMission {
                persona,
                max_turns,
                technical_goal,
                personality_trait,
                ..
            } => self.on_mission_started(GameState::new_mission(
                persona.clone(),
                technical_goal.clone(),
                personality_trait.clone(),
                *max_turns,
            )),
            ServerEvent::ResumeMission {
                persona,
                current_turn,
                max_turns,
                ..
            } => self.on_mission_resumed(persona, *current_turn, *max_turns),
            ServerEvent::SessionRestored => self.on_session_restored(),
            ServerEvent::ServerLostSession => self.on_session_lost(),
            ServerEvent::ServerRequestsNewGame => self.on_new_game_requested(),
            ServerEvent::NewBotMessage {
                turn, max_turns, ..
            } => self.on_turn_advanced(*turn, *max_turns),
            ServerEvent::GameOver { win, .. } => self.on_mission_ended(*win),
            ServerEvent::Unknown => {}
        }
    }

    /// A fresh mission started; the snapshot replaces whatever was cached
    pub fn on_mission_started(&mut self, state: GameState) {
        info!(max_turns = state.max_turns, "mission started");
        counter!("missionchat_missions_started_total").increment(1);
        self.cached = Some(state);
        self.phase = Phase::Active;
    }

    /// The server restored the mission from its own session. The payload does
    /// not carry the goal or trait, so previously cached values are kept.
    pub fn on_mission_resumed(&mut self, persona: &str, current_turn: u32, max_turns: u32) {
        info!(current_turn, "mission resumed by server");
        let mut state = self.cached.take().unwrap_or_else(|| {
            GameState::new_mission(persona.to_string(), String::new(), String::new(), max_turns)
        });
        state.persona = persona.to_string();
        state.record_turn(current_turn, max_turns);
        self.cached = Some(state);
        self.phase = Phase::Active;
    }

    /// The server rebuilt its session from our offered snapshot
    pub fn on_session_restored(&mut self) {
        info!("session restored from offered state");
        counter!("missionchat_sessions_restored_total").increment(1);
        self.phase = Phase::Active;
    }

    /// The server cannot recover the session. Irrevocable for this run.
    pub fn on_session_lost(&mut self) {
        warn!("server lost the session, discarding local state");
        counter!("missionchat_sessions_lost_total").increment(1);
        self.cached = None;
        self.phase = Phase::Lost;
    }

    /// The server discarded any prior session and will start fresh. Not an
    /// error: the cache is dropped and a new mission is expected to follow.
    pub fn on_new_game_requested(&mut self) {
        info!("server requested a new game, dropping cached state");
        self.cached = None;
        self.phase = Phase::Idle;
    }

    /// A persona reply advanced the mission to `turn` (1-based)
    pub fn on_turn_advanced(&mut self, turn: u32, max_turns: u32) {
        counter!("missionchat_turns_total").increment(1);
        match &mut self.cached {
            Some(state) => state.record_turn(turn, max_turns),
            None => debug!(turn, "turn advance with no cached mission, ignoring"),
        }
    }

    /// Mission finished, win or lose. Terminal for the mission only.
    pub fn on_mission_ended(&mut self, win: bool) {
        info!(win, "mission ended");
        counter!("missionchat_missions_ended_total", "outcome" => if win { "won" } else { "lost" })
            .increment(1);
        self.cached = None;
        self.phase = Phase::Idle;
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_active_game(&self) -> bool {
        self.phase == Phase::Active && self.cached.is_some()
    }

    pub fn cached_state(&self) -> Option<&GameState> {
        self.cached.as_ref()
    }

    /// Whether the player may type: connected, mission active, session alive
    pub fn input_allowed(&self) -> bool {
        self.connected && self.has_active_game()
    }
}

impl Default for SessionReconciler {
    fn default() -> Self {
        Self::new()
    }
}
