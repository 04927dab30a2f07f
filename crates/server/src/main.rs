use std::{future::IntoFuture, net::SocketAddr};

use anyhow::Context;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
    Router,
};
use sensor::TouchListener;
use shared::{
    domain::{SessionId, TouchSample},
    protocol::ViewEvent,
};
use tokio::{
    net::TcpListener,
    sync::{broadcast, mpsc},
};
use tracing::{error, info, warn};

mod app_state;
mod config;
mod session;

use app_state::AppState;
use config::{load_settings, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings()?;
    info!(
        path = %settings.settings_path.display(),
        participant = config::peek_participant(&settings.participant_path())?,
        slides = settings.plan.slides.len(),
        "loaded survey settings"
    );

    let (touch_tx, touch_rx) = mpsc::channel(1024);
    let sensor = TouchListener::bind(&settings.osc_bind)
        .await
        .with_context(|| format!("failed to bind OSC socket {}", settings.osc_bind))?;
    info!(addr = %sensor.local_addr()?, "listening for touch input");
    tokio::spawn(async move {
        if let Err(err) = sensor.run(touch_tx).await {
            error!(%err, "touch listener stopped");
        }
    });

    let addr: SocketAddr = settings.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "server listening");

    let session = run(&settings, listener, touch_rx).await?;
    info!(%session, "exiting");
    Ok(())
}

/// Serves views on `listener` until one full session has been recorded.
async fn run(
    settings: &Settings,
    listener: TcpListener,
    touches: mpsc::Receiver<TouchSample>,
) -> anyhow::Result<SessionId> {
    let (outbound, _) = broadcast::channel(256);
    let (inbound, events) = mpsc::channel(64);
    let view = outbound.clone();
    let app = build_router(AppState { outbound, inbound });

    tokio::select! {
        served = axum::serve(listener, app).into_future() => {
            served?;
            anyhow::bail!("server stopped before the session finished")
        }
        session = session::run_session(settings, events, touches, &view) => session,
    }
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_connection(state, socket))
}

async fn ws_connection(state: AppState, socket: axum::extract::ws::WebSocket) {
    use axum::extract::ws::Message;
    use futures::{SinkExt, StreamExt};
    use tokio::sync::broadcast::error::RecvError;

    let (mut sender, mut receiver) = socket.split();
    let mut outbound_rx = state.outbound.subscribe();
    info!("view connected");

    let send_task = tokio::spawn(async move {
        loop {
            match outbound_rx.recv().await {
                Ok(message) => {
                    let text = match message.to_json() {
                        Ok(v) => v,
                        Err(err) => {
                            warn!(%err, "failed to encode control message");
                            continue;
                        }
                    };
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "view fell behind; control messages dropped")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    while let Some(Ok(frame)) = receiver.next().await {
        match frame {
            Message::Text(text) => match ViewEvent::from_json(&text) {
                Ok(event) => {
                    if state.inbound.send(event).await.is_err() {
                        break;
                    }
                }
                Err(err) => warn!(%err, %text, "ignoring malformed view message"),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    info!("view disconnected");
    send_task.abort();
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
