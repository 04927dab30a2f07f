use anyhow::{bail, Context};
use rand::{rngs::StdRng, SeedableRng};
use shared::{
    domain::{SessionId, TouchSample},
    protocol::ViewEvent,
};
use storage::ResultStore;
use survey::{run_plan, SlideContext, ViewSink};
use tokio::sync::mpsc;
use tracing::info;

use crate::config::{advance_participant, Settings};

/// Runs one participant through the configured plan. The first view event
/// must be the `connected` handshake.
pub(crate) async fn run_session(
    settings: &Settings,
    mut events: mpsc::Receiver<ViewEvent>,
    mut touches: mpsc::Receiver<TouchSample>,
    view: &dyn ViewSink,
) -> anyhow::Result<SessionId> {
    match events.recv().await {
        Some(ViewEvent::Connected) => {}
        Some(other) => bail!("expected connected handshake from view, got {other:?}"),
        None => bail!("view channel closed before handshake"),
    }

    let participant = advance_participant(&settings.participant_path())?;
    let session = SessionId::new_v4();
    info!(%session, participant, "view connected; starting session");

    let mut results = ResultStore::create(&settings.results_dir, session)
        .context("failed to create results file")?;
    let mut rng = StdRng::from_os_rng();
    let slides = settings.plan.build();

    let mut ctx = SlideContext {
        results: &mut results,
        touches: &mut touches,
        events: &mut events,
        view,
        rng: &mut rng,
    };
    run_plan(&slides, &mut ctx)
        .await
        .with_context(|| format!("session {session} did not complete"))?;

    info!(%session, participant, "session finished");
    Ok(session)
}
