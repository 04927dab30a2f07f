//! Survey engine: an ordered list of slides, each of which drives the view,
//! consumes touch and view input, and writes its results.

use std::io::Write;

use async_trait::async_trait;
use rand::rngs::StdRng;
use shared::{
    domain::{Gesture, LikertAnswer, MaterialId, SessionId, TouchSample},
    protocol::{ControlMessage, ViewEvent},
};
use storage::{GestureLog, ResultStore, StorageError};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

pub mod plan;
pub mod slides;
pub mod widgets;

pub use plan::{SlideSpec, SurveyPlan};
pub use widgets::{scale, PadArea};

#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("view disconnected before the slide finished")]
    ViewDisconnected,
    #[error("touch input closed while a slide was waiting for it")]
    SensorClosed,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Destination for control messages. Delivery is best effort: a view that
/// is not listening simply misses the update.
pub trait ViewSink: Send + Sync {
    fn send(&self, message: ControlMessage);
}

impl ViewSink for broadcast::Sender<ControlMessage> {
    fn send(&self, message: ControlMessage) {
        if broadcast::Sender::send(self, message).is_err() {
            debug!("no view subscribed; dropping control message");
        }
    }
}

impl ViewSink for mpsc::UnboundedSender<ControlMessage> {
    fn send(&self, message: ControlMessage) {
        let _ = mpsc::UnboundedSender::send(self, message);
    }
}

pub trait ResultSink: Send {
    fn session(&self) -> SessionId;
    fn record_likert(
        &mut self,
        gesture: Gesture,
        material: MaterialId,
        answer: &LikertAnswer,
    ) -> Result<(), StorageError>;
    fn record_response(&mut self, name: &str, materials: &[MaterialId])
        -> Result<(), StorageError>;
    fn record_gesture(&mut self, log: &GestureLog) -> Result<(), StorageError>;
}

impl<W: Write + Send> ResultSink for ResultStore<W> {
    fn session(&self) -> SessionId {
        ResultStore::session(self)
    }

    fn record_likert(
        &mut self,
        gesture: Gesture,
        material: MaterialId,
        answer: &LikertAnswer,
    ) -> Result<(), StorageError> {
        ResultStore::record_likert(self, gesture, material, answer)
    }

    fn record_response(
        &mut self,
        name: &str,
        materials: &[MaterialId],
    ) -> Result<(), StorageError> {
        ResultStore::record_response(self, name, materials)
    }

    fn record_gesture(&mut self, log: &GestureLog) -> Result<(), StorageError> {
        ResultStore::record_gesture(self, log)
    }
}

pub struct SlideContext<'a> {
    pub results: &'a mut dyn ResultSink,
    pub touches: &'a mut mpsc::Receiver<TouchSample>,
    pub events: &'a mut mpsc::Receiver<ViewEvent>,
    pub view: &'a dyn ViewSink,
    pub rng: &'a mut StdRng,
}

#[async_trait]
pub trait Slide: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, ctx: &mut SlideContext<'_>) -> Result<(), SurveyError>;
}

/// Runs every slide in order, stopping at the first failure.
pub async fn run_plan(
    slides: &[Box<dyn Slide>],
    ctx: &mut SlideContext<'_>,
) -> Result<(), SurveyError> {
    let session = ctx.results.session();
    for (position, slide) in slides.iter().enumerate() {
        info!(%session, position, slide = slide.name(), "starting slide");
        slide.run(ctx).await?;
        debug!(%session, position, slide = slide.name(), "slide finished");
    }
    info!(%session, count = slides.len(), "survey complete");
    Ok(())
}
