use shared::protocol::{ControlMessage, ViewEvent};
use tokio::sync::{broadcast, mpsc};

#[derive(Clone)]
pub(crate) struct AppState {
    /// Control messages fanned out to every connected view.
    pub(crate) outbound: broadcast::Sender<ControlMessage>,
    /// View events for the survey runner.
    pub(crate) inbound: mpsc::Sender<ViewEvent>,
}
