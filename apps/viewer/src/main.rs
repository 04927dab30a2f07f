use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use view_core::{DrawCommand, ViewClient, ViewState};

mod commands;

const LOG_FILTER: &str = "info";

/// Terminal stand-in for the survey view.
#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(LOG_FILTER).init();
    let cli = Cli::parse();

    let client = ViewClient::connect(&cli.url).await?;
    let mut state = client.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            changed = state.changed() => {
                if changed.is_err() {
                    info!("backend closed the connection");
                    break;
                }
                let current = state.borrow_and_update().clone();
                render(&current);
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line.context("failed to read stdin")? else {
                    stdin_open = false;
                    continue;
                };
                match commands::parse_command(&line) {
                    Ok(Some(event)) => client.send(event).await?,
                    Ok(None) => {}
                    Err(err) => warn!(%err, "ignoring command"),
                }
            }
        }
    }
    Ok(())
}

/// Logs the scene for `state`, one line per draw command.
fn render(state: &ViewState) -> Vec<DrawCommand> {
    let commands = state.render();
    info!(
        slide = %state.slide,
        updates = state.updates,
        commands = commands.len(),
        "frame"
    );
    for command in &commands {
        info!(?command, "draw");
    }
    commands
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
