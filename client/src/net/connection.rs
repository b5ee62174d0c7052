use crate::protocol::{ClientEvent, ServerEvent};
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite, tungstenite::Message,
};
use tracing::{debug, warn};

/// Errors from the transport layer
#[derive(Debug, Error)]
pub enum NetError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: Box<tungstenite::Error>,
    },

    #[error("websocket transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    #[error("failed to encode outbound event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("gave up reconnecting after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

/// A live WebSocket connection to the game server.
///
/// Serializes outbound `ClientEvent`s and parses inbound frames into
/// `ServerEvent`s. Frames that fail to parse are logged and skipped; they
/// must never take the connection down.
pub struct Connection {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Connection {
    pub async fn open(url: &str) -> Result<Self, NetError> {
        let (ws, _) = connect_async(url).await.map_err(|source| NetError::Connect {
            url: url.to_string(),
            source: Box::new(source),
        })?;
        Ok(Self { ws })
    }

    pub async fn send(&mut self, event: &ClientEvent) -> Result<(), NetError> {
        let json = serde_json::to_string(event)?;
        self.ws.send(Message::Text(json.into())).await?;
        Ok(())
    }

    /// Receive the next server event. `Ok(None)` means the peer closed the
    /// connection cleanly.
    pub async fn next_event(&mut self) -> Result<Option<ServerEvent>, NetError> {
        while let Some(frame) = self.ws.next().await {
            match frame? {
                Message::Text(text) => match serde_json::from_str::<ServerEvent>(&text) {
                    Ok(event) => return Ok(Some(event)),
                    Err(err) => warn!(%err, "skipping unparseable frame"),
                },
                Message::Close(_) => return Ok(None),
                // Pings are answered by the websocket layer; the protocol
                // carries no binary frames.
                other => debug!(kind = ?other, "ignoring non-text frame"),
            }
        }
        Ok(None)
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}
