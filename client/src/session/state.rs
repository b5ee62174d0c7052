use serde::{Deserialize, Serialize};

/// Marker the server embeds in the persona string when it appends the
/// personality annotation, e.g. "a retiree learning tech (Personality: anxious)"
pub const PERSONALITY_MARKER: &str = "(Personality:";

/// Client-held snapshot of the active mission.
///
/// Best-effort cache, never authoritative: the server owns the real session
/// and this copy exists only so a reconnecting client can offer it back.
/// All string fields are opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub persona: String,
    pub technical_goal: String,
    pub personality_trait: String,
    /// Completed turns. Always <= max_turns.
    pub turn_count: u32,
    /// Turn budget for the mission
    pub max_turns: u32,
}

impl GameState {
    /// Build the snapshot for a freshly started mission
    pub fn new_mission(
        persona: String,
        technical_goal: String,
        personality_trait: String,
        max_turns: u32,
    ) -> Self {
        Self {
            persona,
            technical_goal,
            personality_trait,
            turn_count: 0,
            max_turns: max_turns.max(1),
        }
    }

    /// Record a turn-advance notification.
    ///
    /// `turn` is the 1-based turn now being played, so completed turns are
    /// `turn - 1`. Clamped so `turn_count <= max_turns` holds even against a
    /// misbehaving server.
    pub fn record_turn(&mut self, turn: u32, max_turns: u32) {
        if max_turns > 0 {
            self.max_turns = max_turns;
        }
        self.turn_count = turn.saturating_sub(1).min(self.max_turns);
    }

    /// Split the persona into its description and the trailing personality
    /// annotation, if the marker is present.
    pub fn split_persona(&self) -> (&str, Option<&str>) {
        split_persona(&self.persona)
    }
}

/// Split a persona string on the personality marker.
///
/// Returns the trimmed description and, when the marker is present, the
/// annotation with the closing paren stripped.
pub fn split_persona(persona: &str) -> (&str, Option<&str>) {
    match persona.split_once(PERSONALITY_MARKER) {
        Some((description, annotation)) => {
            let annotation = annotation.trim().trim_end_matches(')').trim();
            let annotation = (!annotation.is_empty()).then_some(annotation);
            (description.trim(), annotation)
        }
        None => (persona.trim(), None),
    }
}
