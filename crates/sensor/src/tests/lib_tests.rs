use super::*;
use rosc::{encoder, OscBundle, OscTime};
use std::time::Duration;

fn material_message(phase: i32, pressure: f32, x: f32, y: f32, material: i32) -> OscPacket {
    OscPacket::Message(OscMessage {
        addr: MATERIAL_ADDR.to_string(),
        args: vec![
            OscType::Int(phase),
            OscType::Float(pressure),
            OscType::Float(x),
            OscType::Float(y),
            OscType::Int(material),
        ],
    })
}

fn encode(packet: &OscPacket) -> Vec<u8> {
    encoder::encode(packet).expect("encode")
}

#[test]
fn decodes_material_message_into_sample() {
    let samples = decode_packet(&encode(&material_message(1, 640.0, 12.5, 30.0, 2))).expect("decode");
    assert_eq!(
        samples,
        vec![TouchSample {
            phase: TouchPhase::Move,
            pressure: 640.0,
            x: 12.5,
            y: 30.0,
            material: MaterialId(2),
        }]
    );
}

#[test]
fn ignores_other_addresses_and_short_messages() {
    let other = OscPacket::Message(OscMessage {
        addr: "/synth/volume".to_string(),
        args: vec![OscType::Float(0.5)],
    });
    assert!(decode_packet(&encode(&other)).expect("decode").is_empty());

    let short = OscPacket::Message(OscMessage {
        addr: MATERIAL_ADDR.to_string(),
        args: vec![OscType::Int(0), OscType::Float(100.0)],
    });
    assert!(decode_packet(&encode(&short)).expect("decode").is_empty());
}

#[test]
fn coerces_mistyped_arguments() {
    let packet = OscPacket::Message(OscMessage {
        addr: MATERIAL_ADDR.to_string(),
        args: vec![
            OscType::Int(2),
            OscType::Int(300),
            OscType::String("left".to_string()),
            OscType::Double(4.0),
            OscType::Int(-3),
        ],
    });
    let samples = decode_packet(&encode(&packet)).expect("decode");
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].phase, TouchPhase::End);
    assert_eq!(samples[0].pressure, 300.0);
    assert_eq!(samples[0].x, 0.0);
    assert_eq!(samples[0].y, 4.0);
    assert_eq!(samples[0].material, MaterialId(0));
}

#[test]
fn flattens_bundles() {
    let bundle = OscPacket::Bundle(OscBundle {
        timetag: OscTime {
            seconds: 0,
            fractional: 1,
        },
        content: vec![
            material_message(0, 20.0, 1.0, 1.0, 1),
            material_message(2, 0.0, 1.0, 1.0, 1),
        ],
    });
    let samples = decode_packet(&encode(&bundle)).expect("decode");
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].phase, TouchPhase::Start);
    assert_eq!(samples[1].phase, TouchPhase::End);
}

#[test]
fn rejects_garbage_datagrams() {
    assert!(decode_packet(b"\x01\x02\x03").is_err());
}

#[tokio::test]
async fn listener_forwards_samples_over_channel() {
    let listener = TouchListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, mut rx) = mpsc::channel(8);
    let task = tokio::spawn(listener.run(tx));

    let client = UdpSocket::bind("127.0.0.1:0").await.expect("client");
    client
        .send_to(b"garbage", addr)
        .await
        .expect("send garbage");
    client
        .send_to(&encode(&material_message(0, 900.0, 5.0, 6.0, 3)), addr)
        .await
        .expect("send");

    let sample = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("sample in time")
        .expect("channel open");
    assert_eq!(sample.material, MaterialId(3));
    assert_eq!(sample.pressure, 900.0);

    task.abort();
}

#[test]
fn coerces_double_phase_and_material() {
    let packet = OscPacket::Message(OscMessage {
        addr: MATERIAL_ADDR.to_string(),
        args: vec![
            OscType::Double(1.0),
            OscType::Float(250.0),
            OscType::Float(12.0),
            OscType::Float(18.0),
            OscType::Double(3.0),
        ],
    });
    let samples = decode_packet(&encode(&packet)).expect("decode");
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].phase, TouchPhase::Move);
    assert_eq!(samples[0].material, MaterialId(3));
}
