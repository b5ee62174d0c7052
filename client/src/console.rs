//! Line-oriented terminal front-end.
//!
//! Prints the transcript and status transitions, and gates player input
//! while a reply is pending. Deliberately thin: everything the browser
//! client did with DOM, animation, and styling is out of scope here.

use crate::protocol::ServerEvent;
use crate::session::split_persona;

pub struct Console {
    awaiting_reply: bool,
    input_open: bool,
}

impl Console {
    pub fn new() -> Self {
        Self {
            awaiting_reply: false,
            input_open: false,
        }
    }

    /// Whether a typed line should be sent right now
    pub fn ready_for_input(&self) -> bool {
        self.input_open && !self.awaiting_reply
    }

    pub fn connecting(&self, url: &str) {
        status(&format!("connecting to {url}..."));
    }

    pub fn reconnecting(&self) {
        status("connection lost, reconnecting...");
    }

    pub fn connected(&self, reconnect: bool) {
        if reconnect {
            status("link re-established");
        } else {
            status("link established, waiting for mission...");
        }
    }

    /// A player line was accepted and sent; block input until the reply lands
    pub fn player_sent(&mut self) {
        self.awaiting_reply = true;
        status("processing...");
    }

    pub fn input_rejected(&self) {
        if self.awaiting_reply {
            status("still waiting for a reply");
        } else {
            status("input is disabled right now");
        }
    }

    pub fn render(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::InitialMission {
                persona,
                first_message,
                max_turns,
                ..
            } => {
                self.awaiting_reply = false;
                self.input_open = true;
                status("mission initialized");
                print_persona_banner(persona);
                status(&format!("turn 1/{max_turns}"));
                transcript("them", first_message);
            }
            ServerEvent::ResumeMission {
                persona,
                first_message,
                current_turn,
                max_turns,
            } => {
                self.awaiting_reply = false;
                self.input_open = true;
                status(&format!("mission resumed at turn {current_turn}/{max_turns}"));
                print_persona_banner(persona);
                transcript("them", first_message);
            }
            ServerEvent::SessionRestored => {
                self.awaiting_reply = false;
                self.input_open = true;
                status("session restored, pick up where you left off");
            }
            ServerEvent::ServerLostSession => {
                self.awaiting_reply = false;
                self.input_open = false;
                status("the server could not recover your session");
                status("restart missionchat to begin a new mission");
            }
            ServerEvent::ServerRequestsNewGame => {
                self.awaiting_reply = false;
                self.input_open = false;
                status("server is preparing a fresh mission...");
            }
            ServerEvent::NewBotMessage {
                message,
                turn,
                max_turns,
            } => {
                self.awaiting_reply = false;
                transcript("them", message);
                status(&format!("turn {turn}/{max_turns}"));
            }
            ServerEvent::GameOver {
                win,
                message,
                score,
            } => {
                self.awaiting_reply = false;
                self.input_open = false;
                if *win {
                    match score {
                        Some(score) => status(&format!("mission complete (score: {score})")),
                        None => status("mission complete"),
                    }
                } else {
                    status("mission failed");
                }
                transcript("them", message);
                status("run missionchat again for a new mission");
            }
            ServerEvent::Unknown => {}
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

fn status(text: &str) {
    println!("  [{text}]");
}

fn transcript(speaker: &str, text: &str) {
    println!("{speaker}> {text}");
}

fn print_persona_banner(persona: &str) {
    let (description, annotation) = split_persona(persona);
    status(&format!("you are helping: {description}"));
    if let Some(trait_label) = annotation {
        status(&format!("personality: {trait_label}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mission() -> ServerEvent {
        ServerEvent::InitialMission {
            persona: "a small business owner (Personality: scattered)".to_string(),
            first_message: "hi so my printer is haunted".to_string(),
            max_turns: 5,
            technical_goal: "wants to connect the printer to wifi".to_string(),
            personality_trait: "scattered".to_string(),
        }
    }

    #[test]
    fn test_input_closed_until_mission_starts() {
        let mut console = Console::new();
        assert!(!console.ready_for_input());

        console.render(&mission());
        assert!(console.ready_for_input());
    }

    #[test]
    fn test_input_gated_while_awaiting_reply() {
        let mut console = Console::new();
        console.render(&mission());

        console.player_sent();
        assert!(!console.ready_for_input());

        console.render(&ServerEvent::NewBotMessage {
            message: "ok trying that".to_string(),
            turn: 2,
            max_turns: 5,
        });
        assert!(console.ready_for_input());
    }

    #[test]
    fn test_input_closes_on_game_over_and_session_loss() {
        let mut console = Console::new();
        console.render(&mission());

        console.render(&ServerEvent::GameOver {
            win: false,
            message: "i give up".to_string(),
            score: None,
        });
        assert!(!console.ready_for_input());

        let mut console = Console::new();
        console.render(&mission());
        console.render(&ServerEvent::ServerLostSession);
        assert!(!console.ready_for_input());
    }
}
