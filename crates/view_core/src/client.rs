use anyhow::{anyhow, bail, Context, Result};
use futures::{SinkExt, StreamExt};
use shared::protocol::{ControlMessage, ViewEvent};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{info, warn};
use url::Url;

use crate::state::ViewState;

/// WebSocket connection from the view to whatever drives it. Incoming
/// control messages are folded into a [`ViewState`] published on a watch
/// channel, so readers always see the latest state.
pub struct ViewClient {
    state: watch::Receiver<ViewState>,
    outbound: mpsc::Sender<ViewEvent>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl ViewClient {
    /// Connects and announces the view with a `connected` event.
    pub async fn connect(server_url: &str) -> Result<Self> {
        let url = Url::parse(server_url).with_context(|| format!("invalid url: {server_url}"))?;
        if !matches!(url.scheme(), "ws" | "wss") {
            bail!("server url must start with ws:// or wss://, got {server_url}");
        }

        let (ws_stream, _) = connect_async(url.as_str())
            .await
            .with_context(|| format!("failed to connect websocket: {url}"))?;
        info!(%url, "view connected");
        let (mut ws_writer, mut ws_reader) = ws_stream.split();

        let (state_tx, state_rx) = watch::channel(ViewState::default());
        let (outbound_tx, mut outbound_rx) = mpsc::channel::<ViewEvent>(32);

        let writer = tokio::spawn(async move {
            while let Some(event) = outbound_rx.recv().await {
                let text = match event.to_json() {
                    Ok(text) => text,
                    Err(err) => {
                        warn!(%err, ?event, "failed to encode view event");
                        continue;
                    }
                };
                if let Err(err) = ws_writer.send(Message::Text(text)).await {
                    warn!(%err, "websocket send failed");
                    break;
                }
            }
            let _ = ws_writer.close().await;
        });

        let reader = tokio::spawn(async move {
            while let Some(frame) = ws_reader.next().await {
                match frame {
                    Ok(Message::Text(text)) => match ControlMessage::from_json(&text) {
                        Ok(message) => state_tx.send_modify(|state| state.apply(message)),
                        Err(err) => warn!(%err, %text, "ignoring invalid control message"),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(err) => {
                        warn!(%err, "websocket receive failed");
                        break;
                    }
                }
            }
            info!("view connection closed");
        });

        outbound_tx
            .send(ViewEvent::Connected)
            .await
            .map_err(|_| anyhow!("view connection closed before handshake"))?;

        Ok(Self {
            state: state_rx,
            outbound: outbound_tx,
            reader,
            writer,
        })
    }

    /// A receiver that wakes on every state change. It reports an error
    /// from `changed()` once the connection is gone.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    pub fn latest(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub async fn send(&self, event: ViewEvent) -> Result<()> {
        self.outbound
            .send(event)
            .await
            .map_err(|_| anyhow!("view connection closed"))
    }
}

impl Drop for ViewClient {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
