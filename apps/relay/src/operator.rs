use shared::{error::ProtocolError, protocol::ControlMessage};
use tokio::{
    io::{self, AsyncBufRead, AsyncBufReadExt},
    sync::broadcast,
};
use tracing::{debug, info, warn};

/// Blank lines are skipped; anything else must be a control message.
pub(crate) fn parse_line(line: &str) -> Result<Option<ControlMessage>, ProtocolError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    ControlMessage::from_json(line).map(Some)
}

/// Forwards operator lines to every connected view until `input` ends.
pub(crate) async fn forward_lines<R>(
    input: R,
    views: broadcast::Sender<ControlMessage>,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(Some(message)) => match views.send(message) {
                Ok(receivers) => info!(receivers, %line, "forwarded operator message"),
                Err(_) => warn!(%line, "no view connected; operator message dropped"),
            },
            Ok(None) => {}
            Err(err) => warn!(%err, %line, "ignoring operator line"),
        }
    }
    debug!("operator input closed");
    Ok(())
}

#[cfg(test)]
#[path = "tests/operator_tests.rs"]
mod tests;
