use anyhow::{anyhow, bail, Context, Result};
use shared::protocol::ViewEvent;

/// Participant input typed at the terminal: `begin`, `consent` or
/// `likert <name> <value>`. Blank lines yield `None`.
pub(crate) fn parse_command(line: &str) -> Result<Option<ViewEvent>> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let event = match command {
        "begin" => ViewEvent::Begin,
        "consent" => ViewEvent::Consent,
        "likert" => {
            let name = words
                .next()
                .ok_or_else(|| anyhow!("usage: likert <name> <value>"))?;
            let value = words
                .next()
                .ok_or_else(|| anyhow!("usage: likert <name> <value>"))?;
            let value = value
                .parse()
                .with_context(|| format!("likert value must be a number, got {value}"))?;
            ViewEvent::Likert {
                name: name.to_string(),
                value,
            }
        }
        other => bail!("unknown command: {other}"),
    };

    if let Some(extra) = words.next() {
        bail!("unexpected argument: {extra}");
    }
    Ok(Some(event))
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
