use std::time::Duration;

use async_trait::async_trait;
use shared::{
    domain::{Gesture, MaterialId, SlideIndex, TouchPhase},
    protocol::{ControlMessage, ViewEvent},
};
use storage::StorageError;
use tokio::{
    sync::mpsc,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    widgets::{PadArea, PressTask, TrackTask, FRAME_PERIOD},
    Slide, SlideContext, SurveyError,
};

async fn wait_for(
    events: &mut mpsc::Receiver<ViewEvent>,
    wanted: impl Fn(&ViewEvent) -> bool + Send,
) -> Result<ViewEvent, SurveyError> {
    loop {
        match events.recv().await {
            Some(event) if wanted(&event) => return Ok(event),
            Some(event) => debug!(?event, "ignoring view event"),
            None => return Err(SurveyError::ViewDisconnected),
        }
    }
}

/// Title page; waits for the participant to press begin.
pub struct FrontMatter;

#[async_trait]
impl Slide for FrontMatter {
    fn name(&self) -> &'static str {
        "front_matter"
    }

    async fn run(&self, ctx: &mut SlideContext<'_>) -> Result<(), SurveyError> {
        ctx.view.send(ControlMessage::goto(SlideIndex::FRONT_MATTER));
        wait_for(ctx.events, |event| matches!(event, ViewEvent::Begin)).await?;
        Ok(())
    }
}

/// Shows the session id on the consent form and waits for agreement.
pub struct Consent;

#[async_trait]
impl Slide for Consent {
    fn name(&self) -> &'static str {
        "consent"
    }

    async fn run(&self, ctx: &mut SlideContext<'_>) -> Result<(), SurveyError> {
        ctx.view.send(ControlMessage::ConsentId {
            id: ctx.results.session().to_string(),
        });
        ctx.view.send(ControlMessage::goto(SlideIndex::CONSENT));
        wait_for(ctx.events, |event| matches!(event, ViewEvent::Consent)).await?;
        info!(session = %ctx.results.session(), "consent given");
        Ok(())
    }
}

pub const LIKERT_QUESTIONS: u32 = 3;

pub struct Likert {
    pub material: MaterialId,
    pub gesture: Gesture,
    pub questions: u32,
}

impl Likert {
    pub fn new(material: MaterialId, gesture: Gesture) -> Self {
        Self {
            material,
            gesture,
            questions: LIKERT_QUESTIONS,
        }
    }
}

#[async_trait]
impl Slide for Likert {
    fn name(&self) -> &'static str {
        "likert"
    }

    async fn run(&self, ctx: &mut SlideContext<'_>) -> Result<(), SurveyError> {
        ctx.view.send(ControlMessage::MaterialIndex {
            slide: SlideIndex::LIKERT,
            value: self.material,
        });
        ctx.view.send(ControlMessage::GestureType {
            value: self.gesture,
        });
        ctx.view.send(ControlMessage::goto(SlideIndex::LIKERT));

        let mut remaining = self.questions;
        while remaining > 0 {
            let event = wait_for(ctx.events, |event| {
                matches!(event, ViewEvent::Likert { .. })
            })
            .await?;
            let Some(answer) = event.likert_answer() else {
                continue;
            };
            match ctx
                .results
                .record_likert(self.gesture, self.material, &answer)
            {
                Ok(()) => remaining -= 1,
                Err(StorageError::Protocol(err)) => {
                    warn!(%err, name = %answer.name, "discarding likert answer");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

pub struct Press {
    pub material: MaterialId,
    pub duration: Duration,
    pub tolerance: f32,
}

#[async_trait]
impl Slide for Press {
    fn name(&self) -> &'static str {
        "press"
    }

    async fn run(&self, ctx: &mut SlideContext<'_>) -> Result<(), SurveyError> {
        ctx.view.send(ControlMessage::MaterialIndex {
            slide: SlideIndex::PRESS,
            value: self.material,
        });
        ctx.view.send(ControlMessage::goto(SlideIndex::PRESS));

        let mut task = PressTask::new(self.material, self.tolerance, ctx.rng);
        ctx.view.send(task.message());

        let started = Instant::now();
        let deadline = time::sleep_until(started + self.duration);
        tokio::pin!(deadline);
        let mut touches_open = true;

        loop {
            tokio::select! {
                _ = &mut deadline => break,
                touch = ctx.touches.recv(), if touches_open => match touch {
                    Some(sample) => {
                        let now = Instant::now();
                        if let Some(message) =
                            task.on_touch(&sample, now, now - started, ctx.rng)
                        {
                            ctx.view.send(message);
                        }
                    }
                    None => {
                        warn!("touch input closed during press slide");
                        touches_open = false;
                    }
                },
            }
        }

        let log = task.into_log();
        info!(material = %self.material, targets = log.targets.len(), "press slide finished");
        ctx.results.record_gesture(&log)?;
        Ok(())
    }
}

/// Moving-box tracking slide, used for both the slider and tap gestures.
pub struct Track {
    pub gesture: Gesture,
    pub material: MaterialId,
    pub duration: Duration,
    pub pad: PadArea,
}

impl Track {
    pub fn slider(material: MaterialId, duration: Duration, pad: PadArea) -> Self {
        Self {
            gesture: Gesture::Slider,
            material,
            duration,
            pad,
        }
    }

    pub fn tap(material: MaterialId, duration: Duration, pad: PadArea) -> Self {
        Self {
            gesture: Gesture::Tap,
            material,
            duration,
            pad,
        }
    }

    fn slide_index(&self) -> SlideIndex {
        match self.gesture {
            Gesture::Tap => SlideIndex::TAP,
            Gesture::Slider | Gesture::Press => SlideIndex::SLIDER,
        }
    }
}

#[async_trait]
impl Slide for Track {
    fn name(&self) -> &'static str {
        self.gesture.as_str()
    }

    async fn run(&self, ctx: &mut SlideContext<'_>) -> Result<(), SurveyError> {
        let slide = self.slide_index();
        ctx.view.send(ControlMessage::MaterialIndex {
            slide,
            value: self.material,
        });
        ctx.view.send(ControlMessage::goto(slide));

        let mut task = TrackTask::new(self.gesture, self.material, self.pad, ctx.rng);
        ctx.view.send(task.message());

        let started = Instant::now();
        let deadline = time::sleep_until(started + self.duration);
        tokio::pin!(deadline);
        let mut frames = time::interval_at(started + FRAME_PERIOD, FRAME_PERIOD);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut touches_open = true;

        loop {
            tokio::select! {
                _ = &mut deadline => break,
                _ = frames.tick() => ctx.view.send(task.on_frame()),
                touch = ctx.touches.recv(), if touches_open => match touch {
                    Some(sample) => {
                        task.on_touch(&sample, started.elapsed());
                    }
                    None => {
                        warn!(gesture = %self.gesture, "touch input closed during tracking slide");
                        touches_open = false;
                    }
                },
            }
        }

        let log = task.into_log();
        info!(
            gesture = %self.gesture,
            material = %self.material,
            targets = log.targets.len(),
            "tracking slide finished"
        );
        ctx.results.record_gesture(&log)?;
        Ok(())
    }
}

/// Asks the participant to pick one or more materials by touching them; each
/// release after a press counts as one pick.
pub struct Response {
    pub name: String,
    pub count: u32,
    pub slide: SlideIndex,
}

#[async_trait]
impl Slide for Response {
    fn name(&self) -> &'static str {
        "response"
    }

    async fn run(&self, ctx: &mut SlideContext<'_>) -> Result<(), SurveyError> {
        // after-touches from the previous slide must not count as answers
        let mut stale = 0usize;
        while ctx.touches.try_recv().is_ok() {
            stale += 1;
        }
        if stale > 0 {
            debug!(stale, "drained stale touches");
        }

        ctx.view.send(ControlMessage::goto(self.slide));

        let mut materials = Vec::with_capacity(self.count as usize);
        let mut pressed = false;
        while materials.len() < self.count as usize {
            let sample = ctx
                .touches
                .recv()
                .await
                .ok_or(SurveyError::SensorClosed)?;
            match sample.phase {
                TouchPhase::Start => pressed = true,
                TouchPhase::End if pressed => {
                    debug!(name = %self.name, material = %sample.material, "material picked");
                    materials.push(sample.material);
                    pressed = false;
                }
                _ => {}
            }
        }

        ctx.results.record_response(&self.name, &materials)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/slides_tests.rs"]
mod tests;
