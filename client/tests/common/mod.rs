//! Common Test Utilities for Integration Tests
//!
//! A scripted in-process game server: tests accept the client's connection,
//! assert on the events it sends, and feed it server events.

use futures_util::{SinkExt, StreamExt};
use missionchat_client::config::{Config, ReconnectConfig};
use missionchat_client::net::{ClientRuntime, NetError};
use missionchat_client::protocol::{ClientEvent, ServerEvent};
use missionchat_client::session::GameState;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{WebSocketStream, accept_async, tungstenite::Message};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Listening side of the scripted server
pub struct MockGameServer {
    listener: TcpListener,
    url: String,
}

impl MockGameServer {
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        Self { listener, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Accept the next client connection and complete the handshake
    pub async fn accept(&self) -> ServerPeer {
        let (stream, _) = tokio::time::timeout(RECV_TIMEOUT, self.listener.accept())
            .await
            .expect("timed out waiting for the client to connect")
            .expect("accept failed");
        let ws = accept_async(stream).await.expect("websocket handshake failed");
        ServerPeer { ws }
    }
}

/// One accepted client connection. Dropping it cuts the transport without a
/// close handshake, like a network failure.
pub struct ServerPeer {
    ws: WebSocketStream<TcpStream>,
}

impl ServerPeer {
    pub async fn send(&mut self, event: &ServerEvent) {
        let json = serde_json::to_string(event).unwrap();
        self.ws
            .send(Message::Text(json.into()))
            .await
            .expect("failed to send server event");
    }

    /// Receive the next client event, skipping non-text frames
    pub async fn recv(&mut self) -> ClientEvent {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .expect("timed out waiting for a client event")
                .expect("client closed the connection")
                .expect("websocket error");
            if let Message::Text(text) = frame {
                return serde_json::from_str(&text).expect("unparseable client event");
            }
        }
    }

    /// Expect the reconnection offer and return its parts
    pub async fn recv_offer(&mut self) -> (bool, Option<GameState>) {
        match self.recv().await {
            ClientEvent::ClientHasGame {
                has_game,
                game_state,
            } => (has_game, game_state),
            other => panic!("expected client_has_game, got {:?}", other),
        }
    }
}

/// Config with short reconnect delays so tests stay fast
pub fn test_config(url: &str) -> Config {
    Config {
        server_url: url.to_string(),
        reconnect: ReconnectConfig {
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_millis(200),
            multiplier: 2.0,
            max_attempts: 5,
        },
    }
}

/// Spawn the client runtime against `url`.
///
/// Returns the player-input sender and the runtime handle. Keep the sender
/// alive for the duration of the test: dropping it reads as stdin EOF.
pub fn spawn_client(url: &str) -> (mpsc::Sender<String>, JoinHandle<Result<(), NetError>>) {
    let (input_tx, input_rx) = mpsc::channel(8);
    let runtime = ClientRuntime::new(test_config(url), input_rx);
    (input_tx, tokio::spawn(runtime.run()))
}

pub fn initial_mission(max_turns: u32) -> ServerEvent {
    ServerEvent::InitialMission {
        persona: "a busy office worker (Personality: impatient)".to_string(),
        first_message: "this folder won't email, it says too big. fix it fast.".to_string(),
        max_turns,
        technical_goal: "wants to zip a folder to email it".to_string(),
        personality_trait: "impatient".to_string(),
    }
}

pub fn bot_message(turn: u32, max_turns: u32) -> ServerEvent {
    ServerEvent::NewBotMessage {
        message: "right-click you say. where.".to_string(),
        turn,
        max_turns,
    }
}

pub fn game_over(win: bool) -> ServerEvent {
    ServerEvent::GameOver {
        win,
        message: if win {
            "oh it worked. thanks i guess.".to_string()
        } else {
            "forget it, i'll ask my nephew.".to_string()
        },
        score: win.then_some(2),
    }
}

/// Initialize test logging for detailed output
#[allow(dead_code)]
pub fn init_test_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "missionchat_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
