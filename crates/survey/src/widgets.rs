//! Animation state for the press, slider and tap widgets.
//!
//! These types hold no I/O; the slides feed them touches and frame ticks
//! and forward whatever control messages they produce.

use std::time::Duration;

use rand::{rngs::StdRng, Rng};
use serde::{Deserialize, Serialize};
use shared::{
    domain::{Gesture, MaterialId, TouchSample},
    protocol::ControlMessage,
};
use storage::{Contact, GestureLog};
use tokio::time::Instant;

/// Linear map of `input` from `[in_start, in_end]` onto
/// `[out_start, out_end]`, rounded to a whole unit. Not clamped.
pub fn scale(out_start: f32, out_end: f32, in_start: f32, in_end: f32, input: f32) -> f32 {
    let slope = (out_end - out_start) / (in_end - in_start);
    out_start + (slope * (input - in_start)).round()
}

/// Region of the pad, in sensor coordinates, mapped onto the track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PadArea {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for PadArea {
    fn default() -> Self {
        Self {
            left: 30.0,
            top: 30.0,
            width: 30.0,
            height: 30.0,
        }
    }
}

pub const PRESS_CIRCLE_MIN: f32 = 20.0;
pub const PRESS_RING_MIN: f32 = 30.0;
pub const PRESS_RADIUS_MAX: f32 = 100.0;
pub const PRESS_PRESSURE_MIN: f32 = 20.0;
pub const PRESS_PRESSURE_MAX: f32 = 1500.0;
/// How long the circle must stay on the ring before a new ring is drawn.
pub const PRESS_HOLD: Duration = Duration::from_secs(1);

pub struct PressTask {
    material: MaterialId,
    tolerance: f32,
    circle: f32,
    ring: f32,
    held_since: Option<Instant>,
    log: GestureLog,
}

impl PressTask {
    pub fn new(material: MaterialId, tolerance: f32, rng: &mut StdRng) -> Self {
        let circle = PRESS_CIRCLE_MIN;
        let ring = random_ring(rng);
        Self {
            material,
            tolerance,
            circle,
            ring,
            held_since: None,
            log: GestureLog::new(Gesture::Press, material, (circle, ring)),
        }
    }

    pub fn message(&self) -> ControlMessage {
        ControlMessage::Press {
            circle: self.circle,
            ring: self.ring,
        }
    }

    pub fn ring(&self) -> f32 {
        self.ring
    }

    pub fn targets(&self) -> usize {
        self.log.targets.len()
    }

    /// Applies one touch. Returns the updated widget message, or `None` when
    /// the touch was on another material.
    pub fn on_touch(
        &mut self,
        sample: &TouchSample,
        now: Instant,
        elapsed: Duration,
        rng: &mut StdRng,
    ) -> Option<ControlMessage> {
        if sample.material != self.material {
            return None;
        }

        self.circle = scale(
            PRESS_CIRCLE_MIN,
            PRESS_RADIUS_MAX,
            PRESS_PRESSURE_MIN,
            PRESS_PRESSURE_MAX,
            sample.pressure,
        );
        self.log.push_contact(contact(sample, elapsed));

        if (self.ring - self.circle).abs() <= self.tolerance {
            match self.held_since {
                Some(since) if now.duration_since(since) >= PRESS_HOLD => {
                    self.ring = random_ring(rng);
                    self.held_since = None;
                    self.log.start_target((self.circle, self.ring));
                }
                Some(_) => {}
                None => self.held_since = Some(now),
            }
        } else {
            self.held_since = None;
        }

        Some(self.message())
    }

    pub fn into_log(self) -> GestureLog {
        self.log
    }
}

fn random_ring(rng: &mut StdRng) -> f32 {
    rng.random_range(PRESS_RING_MIN..PRESS_RADIUS_MAX)
}

pub const TRACK_MIN_X: f32 = 50.0;
pub const TRACK_MAX_X: f32 = 650.0;
pub const TRACK_USER_WIDTH: f32 = 20.0;
pub const TRACK_BOX_WIDTH: f32 = 150.0;
pub const TRACK_BOX_MIN_WIDTH: f32 = TRACK_USER_WIDTH * 3.0;
pub const TRACK_STEP: f32 = 2.0;
pub const TRACK_SHRINK: f32 = 0.6;
pub const TRACK_NUDGE: f32 = 0.5;
pub const FRAME_PERIOD: Duration = Duration::from_millis(16);

/// Moving-box tracking task shared by the slider and tap slides; only the
/// message sent to the view differs.
pub struct TrackTask {
    gesture: Gesture,
    material: MaterialId,
    pad: PadArea,
    user_x: f32,
    box_x: f32,
    box_size: f32,
    direction: f32,
    log: GestureLog,
}

impl TrackTask {
    pub fn new(gesture: Gesture, material: MaterialId, pad: PadArea, rng: &mut StdRng) -> Self {
        let direction = if rng.random_bool(0.5) {
            TRACK_STEP
        } else {
            -TRACK_STEP
        };
        let user_x = rng.random_range(TRACK_MIN_X..TRACK_MAX_X - TRACK_USER_WIDTH);
        let box_x = TRACK_MIN_X;
        let box_size = TRACK_BOX_WIDTH;
        Self {
            gesture,
            material,
            pad,
            user_x,
            box_x,
            box_size,
            direction,
            log: GestureLog::new(gesture, material, (box_x, box_size)),
        }
    }

    pub fn user_x(&self) -> f32 {
        self.user_x
    }

    pub fn box_x(&self) -> f32 {
        self.box_x
    }

    pub fn box_size(&self) -> f32 {
        self.box_size
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn targets(&self) -> usize {
        self.log.targets.len()
    }

    pub fn message(&self) -> ControlMessage {
        match self.gesture {
            Gesture::Tap => ControlMessage::Tap {
                user_x: self.user_x,
                arrow_x: self.box_x,
            },
            Gesture::Slider | Gesture::Press => ControlMessage::Slider {
                user_x: self.user_x,
                box_x: self.box_x,
                box_size: self.box_size,
            },
        }
    }

    /// Moves the user marker to the touch and, when the marker sits inside
    /// the box, shrinks the box and starts a new target. Returns whether the
    /// touch landed inside the box.
    pub fn on_touch(&mut self, sample: &TouchSample, elapsed: Duration) -> bool {
        if sample.material != self.material {
            return false;
        }

        self.user_x = scale(
            TRACK_MIN_X,
            TRACK_MAX_X - TRACK_USER_WIDTH,
            self.pad.left,
            self.pad.left + self.pad.width,
            sample.x,
        );
        self.log.push_contact(contact(sample, elapsed));

        let inside = self.user_x >= self.box_x
            && self.user_x + TRACK_USER_WIDTH <= self.box_x + self.box_size;
        if inside {
            self.box_size = (self.box_size - TRACK_SHRINK).max(TRACK_BOX_MIN_WIDTH);
            self.box_x += if self.direction < 0.0 {
                -TRACK_NUDGE
            } else {
                TRACK_NUDGE
            };
            self.log.start_target((self.box_x, self.box_size));
        }
        inside
    }

    /// Advances the box one animation frame, bouncing at the track ends.
    pub fn on_frame(&mut self) -> ControlMessage {
        self.box_x += self.direction;

        if self.box_x + self.box_size >= TRACK_MAX_X {
            self.direction = -TRACK_STEP;
            self.box_x = TRACK_MAX_X - self.box_size;
        } else if self.box_x <= TRACK_MIN_X {
            self.direction = TRACK_STEP;
            self.box_x = TRACK_MIN_X;
        }

        self.message()
    }

    pub fn into_log(self) -> GestureLog {
        self.log
    }
}

fn contact(sample: &TouchSample, elapsed: Duration) -> Contact {
    Contact {
        elapsed_ms: elapsed.as_millis(),
        pressure: sample.pressure,
        x: sample.x,
        y: sample.y,
    }
}

#[cfg(test)]
#[path = "tests/widgets_tests.rs"]
mod tests;
