use super::*;
use shared::domain::SlideIndex;
use std::time::Duration;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite};

fn press_frame(circle: f32) -> ControlMessage {
    ControlMessage::Press {
        circle,
        ring: press::RING,
    }
}

#[tokio::test(start_paused = true)]
async fn synthetic_press_starts_after_delay_and_operator_messages_pass_through() {
    let (operator_tx, operator_rx) = broadcast::channel(8);
    let stream = outgoing(operator_rx);
    tokio::pin!(stream);
    let begun = Instant::now();

    operator_tx
        .send(ControlMessage::goto(SlideIndex::PRESS))
        .expect("send");
    assert_eq!(
        stream.next().await,
        Some(ControlMessage::goto(SlideIndex::PRESS))
    );
    assert_eq!(begun.elapsed(), Duration::ZERO);

    assert_eq!(stream.next().await, Some(press_frame(4.0)));
    assert_eq!(begun.elapsed(), START_DELAY);
    assert_eq!(stream.next().await, Some(press_frame(8.0)));
    assert_eq!(begun.elapsed(), START_DELAY + FRAME_PERIOD);
}

#[tokio::test]
async fn views_on_any_path_get_operator_and_press_frames() {
    let (operator_tx, _) = broadcast::channel(8);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = build_router(operator_tx.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    let (mut socket, _) = connect_async(format!("ws://{addr}/some/view"))
        .await
        .expect("connect");
    socket
        .send(tungstenite::Message::Text(r#"{"type":"connected"}"#.to_string()))
        .await
        .expect("send");
    operator_tx
        .send(ControlMessage::goto(SlideIndex::SLIDER))
        .expect("operator");

    let mut received = Vec::new();
    while received.len() < 2 {
        let frame = timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("frame in time")
            .expect("socket open")
            .expect("frame");
        if let tungstenite::Message::Text(text) = frame {
            received.push(ControlMessage::from_json(&text).expect("control message"));
        }
    }
    assert_eq!(received[0], ControlMessage::goto(SlideIndex::SLIDER));
    assert_eq!(received[1], press_frame(4.0));
}
