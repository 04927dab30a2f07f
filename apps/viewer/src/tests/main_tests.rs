use super::*;
use clap::CommandFactory;
use shared::{domain::SlideIndex, protocol::ControlMessage};
use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn cli_defaults_to_local_backend() {
    Cli::command().debug_assert();
    let cli = Cli::parse_from(["viewer"]);
    assert_eq!(cli.url, "ws://127.0.0.1:8080/ws");
}

#[test]
fn render_logs_every_draw_command_under_the_default_filter() {
    let mut state = ViewState::default();
    state.apply(ControlMessage::goto(SlideIndex::PRESS));
    state.apply(ControlMessage::Press {
        circle: 30.0,
        ring: 60.0,
    });

    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(LOG_FILTER)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let commands = tracing::subscriber::with_default(subscriber, || render(&state));

    assert_eq!(commands, state.render());
    assert!(commands.iter().any(|command| matches!(
        command,
        DrawCommand::FillCircle { radius, .. } if *radius == 30.0
    )));

    let output = String::from_utf8(captured.0.lock().expect("lock").clone()).expect("utf8");
    let draw_lines = output.lines().filter(|line| line.contains("draw")).count();
    assert_eq!(draw_lines, commands.len());
    assert!(output.contains("FillCircle"));
    assert!(output.contains("StrokeCircle"));
}
