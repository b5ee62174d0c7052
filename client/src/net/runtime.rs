use crate::config::Config;
use crate::console::Console;
use crate::net::backoff::Backoff;
use crate::net::connection::{Connection, NetError};
use crate::protocol::{ClientEvent, ServerEvent};
use crate::session::SessionReconciler;
use metrics::counter;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{info, warn};
use uuid::Uuid;

/// Why the event pump stopped for the current connection
enum ExitReason {
    /// Transport dropped; reconnect with backoff
    Disconnected,
    /// The mission finished; a new one needs a fresh run
    MissionOver,
    /// The server declared the session unrecoverable
    SessionLost,
    /// Stdin closed; the player is gone
    InputClosed,
}

/// Owns the reconciler, the console, and the connection lifecycle.
///
/// All events — inbound frames and player input — are applied on this one
/// task in arrival order, so the reconciler never needs a lock.
pub struct ClientRuntime {
    config: Config,
    reconciler: SessionReconciler,
    console: Console,
    input_rx: mpsc::Receiver<String>,
}

impl ClientRuntime {
    pub fn new(config: Config, input_rx: mpsc::Receiver<String>) -> Self {
        Self {
            config,
            reconciler: SessionReconciler::new(),
            console: Console::new(),
            input_rx,
        }
    }

    /// Connect, reconcile, and play until the mission resolves or the
    /// transport gives out for good.
    pub async fn run(mut self) -> Result<(), NetError> {
        let mut backoff = Backoff::new(self.config.reconnect.clone());
        let mut reconnect = false;

        loop {
            if reconnect {
                self.console.reconnecting();
            } else {
                self.console.connecting(&self.config.server_url);
            }

            match Connection::open(&self.config.server_url).await {
                Ok(mut conn) => {
                    let attempt = Uuid::new_v4();
                    info!(%attempt, url = %self.config.server_url, "connected");
                    counter!("missionchat_connects_total").increment(1);
                    backoff.reset();
                    self.console.connected(reconnect);
                    reconnect = true;

                    let offer = self.reconciler.on_connect();
                    let exit = match conn.send(&offer).await {
                        Ok(()) => self.pump(&mut conn).await,
                        Err(err) => {
                            warn!(%attempt, %err, "failed to send session offer");
                            ExitReason::Disconnected
                        }
                    };

                    match exit {
                        ExitReason::MissionOver | ExitReason::SessionLost => {
                            conn.close().await;
                            return Ok(());
                        }
                        ExitReason::InputClosed => {
                            info!("input closed, shutting down");
                            conn.close().await;
                            return Ok(());
                        }
                        ExitReason::Disconnected => {
                            self.reconciler.on_disconnect();
                            warn!(%attempt, "connection dropped");
                        }
                    }
                }
                Err(err) => {
                    warn!(%err, "connection attempt failed");
                }
            }

            match backoff.next_delay() {
                Some(delay) => sleep(delay).await,
                None => {
                    return Err(NetError::RetriesExhausted {
                        attempts: backoff.attempts(),
                    });
                }
            }
        }
    }

    /// Pump server events and player input over one live connection
    async fn pump(&mut self, conn: &mut Connection) -> ExitReason {
        loop {
            tokio::select! {
                frame = conn.next_event() => match frame {
                    Ok(Some(event)) => {
                        counter!("missionchat_server_events_total", "type" => event.message_type())
                            .increment(1);
                        self.reconciler.apply(&event);
                        self.console.render(&event);
                        match event {
                            ServerEvent::GameOver { .. } => return ExitReason::MissionOver,
                            ServerEvent::ServerLostSession => return ExitReason::SessionLost,
                            _ => {}
                        }
                    }
                    Ok(None) => return ExitReason::Disconnected,
                    Err(err) => {
                        warn!(%err, "transport error");
                        return ExitReason::Disconnected;
                    }
                },
                line = self.input_rx.recv() => match line {
                    Some(line) => {
                        let message = line.trim();
                        if message.is_empty() {
                            continue;
                        }
                        if !self.reconciler.input_allowed() || !self.console.ready_for_input() {
                            self.console.input_rejected();
                            continue;
                        }
                        self.console.player_sent();
                        let event = ClientEvent::PlayerMessage {
                            message: message.to_string(),
                        };
                        if let Err(err) = conn.send(&event).await {
                            warn!(%err, "failed to send player message");
                            return ExitReason::Disconnected;
                        }
                    }
                    None => return ExitReason::InputClosed,
                },
            }
        }
    }
}
