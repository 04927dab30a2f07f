//! Messages exchanged between the survey view and whatever drives it.
//!
//! Every message is a flat JSON object whose `type` field names the kind,
//! e.g. `{"type":"press","circle":20.0,"ring":64.0}`.

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Gesture, LikertAnswer, MaterialId, SlideIndex},
    error::ProtocolError,
};

/// Backend (or relay) to view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlMessage {
    #[serde(rename = "goto")]
    Goto { slide: SlideIndex },
    #[serde(rename = "consentID")]
    ConsentId { id: String },
    #[serde(rename = "materialIndex")]
    MaterialIndex { slide: SlideIndex, value: MaterialId },
    #[serde(rename = "gestureType")]
    GestureType { value: Gesture },
    #[serde(rename = "press")]
    Press { circle: f32, ring: f32 },
    #[serde(rename = "slider")]
    Slider {
        user_x: f32,
        box_x: f32,
        box_size: f32,
    },
    #[serde(rename = "tap")]
    Tap { user_x: f32, arrow_x: f32 },
}

impl ControlMessage {
    pub fn goto(slide: SlideIndex) -> Self {
        Self::Goto { slide }
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// View to backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    Connected,
    Begin,
    Consent,
    Likert { name: String, value: u32 },
}

impl ViewEvent {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn likert_answer(&self) -> Option<LikertAnswer> {
        match self {
            ViewEvent::Likert { name, value } => Some(LikertAnswer::new(name.clone(), *value)),
            _ => None,
        }
    }
}
