use std::collections::BTreeMap;

use shared::{
    domain::{Gesture, MaterialId, SlideIndex},
    protocol::ControlMessage,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressWidget {
    pub circle: f32,
    pub ring: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderWidget {
    pub user_x: f32,
    pub box_x: f32,
    pub box_size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapWidget {
    pub user_x: f32,
    pub arrow_x: f32,
}

/// Everything the view shows, as of the latest control message.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub slide: SlideIndex,
    pub consent_id: Option<String>,
    /// Material label per slide that shows one.
    pub materials: BTreeMap<SlideIndex, MaterialId>,
    pub gesture: Option<Gesture>,
    pub press: Option<PressWidget>,
    pub slider: Option<SliderWidget>,
    pub tap: Option<TapWidget>,
    pub updates: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            slide: SlideIndex::FRONT_MATTER,
            consent_id: None,
            materials: BTreeMap::new(),
            gesture: None,
            press: None,
            slider: None,
            tap: None,
            updates: 0,
        }
    }
}

fn shows_material(slide: SlideIndex) -> bool {
    matches!(
        slide,
        SlideIndex::LIKERT | SlideIndex::PRESS | SlideIndex::SLIDER | SlideIndex::TAP
    )
}

impl ViewState {
    pub fn apply(&mut self, message: ControlMessage) {
        self.updates += 1;
        match message {
            ControlMessage::Goto { slide } => self.slide = slide,
            ControlMessage::ConsentId { id } => self.consent_id = Some(id),
            ControlMessage::MaterialIndex { slide, value } => {
                if shows_material(slide) {
                    self.materials.insert(slide, value);
                } else {
                    debug!(%slide, material = %value, "slide has no material label");
                }
            }
            ControlMessage::GestureType { value } => self.gesture = Some(value),
            ControlMessage::Press { circle, ring } => {
                self.press = Some(PressWidget { circle, ring });
            }
            ControlMessage::Slider {
                user_x,
                box_x,
                box_size,
            } => {
                self.slider = Some(SliderWidget {
                    user_x,
                    box_x,
                    box_size,
                });
            }
            ControlMessage::Tap { user_x, arrow_x } => {
                self.tap = Some(TapWidget { user_x, arrow_x });
            }
        }
    }

    pub fn material_for(&self, slide: SlideIndex) -> Option<MaterialId> {
        self.materials.get(&slide).copied()
    }
}
