use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    Router,
};
use clap::Parser;
use futures::SinkExt;
use shared::protocol::ControlMessage;
use tokio::{
    io::BufReader,
    net::TcpListener,
    sync::broadcast,
    time::{self, Instant},
};
use tokio_stream::{
    wrappers::{errors::BroadcastStreamRecvError, BroadcastStream, IntervalStream},
    Stream, StreamExt,
};
use tracing::{error, info, warn};

mod operator;
mod press;

use press::{SyntheticPress, FRAME_PERIOD, START_DELAY};

/// Stand-in backend for exercising a view by hand.
#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    let (operator_tx, _) = broadcast::channel(64);
    let stdin_tx = operator_tx.clone();
    tokio::spawn(async move {
        if let Err(err) = operator::forward_lines(BufReader::new(tokio::io::stdin()), stdin_tx).await
        {
            error!(%err, "failed to read operator input");
        }
    });

    let listener = TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    info!(addr = %cli.bind, "relay listening");
    axum::serve(listener, build_router(operator_tx)).await?;
    Ok(())
}

fn build_router(operator: broadcast::Sender<ControlMessage>) -> Router {
    Router::new().fallback(ws_handler).with_state(operator)
}

async fn ws_handler(
    State(operator): State<broadcast::Sender<ControlMessage>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let operator = operator.subscribe();
    ws.on_upgrade(move |socket| relay_connection(socket, operator))
}

/// Synthetic press frames starting after [`START_DELAY`], interleaved with
/// whatever the operator types.
fn outgoing(
    operator: broadcast::Receiver<ControlMessage>,
) -> impl Stream<Item = ControlMessage> + Send {
    let mut press = SyntheticPress::default();
    let frames = IntervalStream::new(time::interval_at(
        Instant::now() + START_DELAY,
        FRAME_PERIOD,
    ))
    .map(move |_| press.next_frame());

    let operator = BroadcastStream::new(operator).filter_map(|message| match message {
        Ok(message) => Some(message),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!(skipped, "view fell behind operator input");
            None
        }
    });

    frames.merge(operator)
}

async fn relay_connection(socket: WebSocket, operator: broadcast::Receiver<ControlMessage>) {
    info!("connected");
    let (mut sender, mut receiver) = futures::StreamExt::split(socket);
    let outgoing = outgoing(operator);
    tokio::pin!(outgoing);

    loop {
        tokio::select! {
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => info!(%text, "received"),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(%err, "websocket receive failed");
                    break;
                }
            },
            Some(message) = outgoing.next() => {
                let text = match message.to_json() {
                    Ok(text) => text,
                    Err(err) => {
                        warn!(%err, "failed to encode control message");
                        continue;
                    }
                };
                if sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        }
    }
    info!("disconnected");
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
