//! Touch input from the pressure pad, delivered as OSC over UDP.
//!
//! The pad bridge emits one `/material` message per contact update with the
//! arguments `(phase, pressure, x, y, material)`.

use std::net::SocketAddr;

use rosc::{OscMessage, OscPacket, OscType};
use shared::domain::{MaterialId, TouchPhase, TouchSample};
use thiserror::Error;
use tokio::{net::UdpSocket, sync::mpsc};
use tracing::{debug, error, info, warn};

pub const MATERIAL_ADDR: &str = "/material";
pub const DEFAULT_BIND: &str = "127.0.0.1:8338";

const MATERIAL_ARG_COUNT: usize = 5;

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("failed to decode OSC packet: {0:?}")]
    Decode(rosc::OscError),
    #[error("OSC socket error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decodes one datagram into the touch samples it carries.
///
/// Messages for other addresses, or `/material` messages with the wrong
/// number of arguments, are skipped. Bundles are flattened.
pub fn decode_packet(datagram: &[u8]) -> Result<Vec<TouchSample>, SensorError> {
    let (_, packet) = rosc::decoder::decode_udp(datagram).map_err(SensorError::Decode)?;
    let mut samples = Vec::new();
    collect_samples(packet, &mut samples);
    Ok(samples)
}

fn collect_samples(packet: OscPacket, out: &mut Vec<TouchSample>) {
    match packet {
        OscPacket::Message(message) => {
            if let Some(sample) = touch_from_message(&message) {
                out.push(sample);
            }
        }
        OscPacket::Bundle(bundle) => {
            for inner in bundle.content {
                collect_samples(inner, out);
            }
        }
    }
}

fn touch_from_message(message: &OscMessage) -> Option<TouchSample> {
    if message.addr != MATERIAL_ADDR {
        debug!(addr = %message.addr, "ignoring OSC message");
        return None;
    }
    if message.args.len() != MATERIAL_ARG_COUNT {
        warn!(
            arg_count = message.args.len(),
            "material message with unexpected argument count"
        );
        return None;
    }

    let args = &message.args;
    Some(TouchSample {
        phase: TouchPhase::from_code(as_int(&args[0])),
        pressure: as_float(&args[1]),
        x: as_float(&args[2]),
        y: as_float(&args[3]),
        material: MaterialId(u32::try_from(as_int(&args[4])).unwrap_or(0)),
    })
}

fn as_float(arg: &OscType) -> f32 {
    match *arg {
        OscType::Float(v) => v,
        OscType::Double(v) => v as f32,
        OscType::Int(v) => v as f32,
        OscType::Long(v) => v as f32,
        _ => 0.0,
    }
}

fn as_int(arg: &OscType) -> i32 {
    match *arg {
        OscType::Int(v) => v,
        OscType::Long(v) => i32::try_from(v).unwrap_or(0),
        OscType::Float(v) => v as i32,
        OscType::Double(v) => v as i32,
        _ => 0,
    }
}

pub struct TouchListener {
    socket: UdpSocket,
}

impl TouchListener {
    pub async fn bind(addr: &str) -> Result<Self, SensorError> {
        let socket = UdpSocket::bind(addr).await?;
        info!(addr = %socket.local_addr()?, "listening for OSC touch input");
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, SensorError> {
        Ok(self.socket.local_addr()?)
    }

    /// Forwards samples until the receiving side goes away or the socket fails.
    pub async fn run(self, samples: mpsc::Sender<TouchSample>) -> Result<(), SensorError> {
        let mut buf = [0u8; rosc::decoder::MTU];
        loop {
            let (size, peer) = self.socket.recv_from(&mut buf).await.map_err(|err| {
                error!(%err, "error receiving from OSC socket");
                SensorError::Io(err)
            })?;
            debug!(size, %peer, "received OSC packet");

            let decoded = match decode_packet(&buf[..size]) {
                Ok(decoded) => decoded,
                Err(err) => {
                    warn!(%err, %peer, "dropping undecodable OSC packet");
                    continue;
                }
            };
            for sample in decoded {
                if samples.send(sample).await.is_err() {
                    info!("touch receiver closed; stopping OSC listener");
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
