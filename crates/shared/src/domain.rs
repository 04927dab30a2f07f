use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ProtocolError;

macro_rules! index_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

index_newtype!(MaterialId);
index_newtype!(SlideIndex);

/// Slide numbers as laid out in the presentation deck.
impl SlideIndex {
    pub const FRONT_MATTER: SlideIndex = SlideIndex(0);
    pub const CONSENT: SlideIndex = SlideIndex(1);
    pub const LIKERT: SlideIndex = SlideIndex(2);
    pub const PRESS: SlideIndex = SlideIndex(3);
    pub const MOST_ACCURATE: SlideIndex = SlideIndex(4);
    pub const MOST_COMFORTABLE: SlideIndex = SlideIndex(5);
    pub const MOST_RESPONSIVE: SlideIndex = SlideIndex(6);
    pub const ORDER_FAVORITE: SlideIndex = SlideIndex(7);
    pub const SLIDER: SlideIndex = SlideIndex(8);
    pub const TAP: SlideIndex = SlideIndex(9);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gesture {
    Tap,
    Press,
    Slider,
}

impl Gesture {
    pub fn as_str(self) -> &'static str {
        match self {
            Gesture::Tap => "tap",
            Gesture::Press => "press",
            Gesture::Slider => "slider",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase of a contact as reported by the pad: 0 start, 1 move, 2 end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Unknown,
}

impl TouchPhase {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => TouchPhase::Start,
            1 => TouchPhase::Move,
            2 => TouchPhase::End,
            _ => TouchPhase::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    pub phase: TouchPhase,
    pub pressure: f32,
    pub x: f32,
    pub y: f32,
    pub material: MaterialId,
}

const LIKERT_CATEGORIES: [&str; 5] = [
    "Strongly Disagree",
    "Disagree",
    "Neutral",
    "Agree",
    "Strongly Agree",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikertAnswer {
    pub name: String,
    pub value: u32,
}

impl LikertAnswer {
    pub fn new(name: impl Into<String>, value: u32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Label for the five point scale; values outside `1..=5` are rejected.
    pub fn category(&self) -> Result<&'static str, ProtocolError> {
        match self.value {
            1..=5 => Ok(LIKERT_CATEGORIES[(self.value - 1) as usize]),
            value => Err(ProtocolError::LikertOutOfRange { value }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn likert_categories_cover_five_point_scale() {
        assert_eq!(
            LikertAnswer::new("accurate", 1).category().expect("category"),
            "Strongly Disagree"
        );
        assert_eq!(
            LikertAnswer::new("accurate", 3).category().expect("category"),
            "Neutral"
        );
        assert_eq!(
            LikertAnswer::new("accurate", 5).category().expect("category"),
            "Strongly Agree"
        );
    }

    #[test]
    fn likert_rejects_values_off_the_scale() {
        assert!(LikertAnswer::new("accurate", 0).category().is_err());
        assert!(LikertAnswer::new("accurate", 6).category().is_err());
    }

    #[test]
    fn touch_phase_maps_unknown_codes() {
        assert_eq!(TouchPhase::from_code(0), TouchPhase::Start);
        assert_eq!(TouchPhase::from_code(2), TouchPhase::End);
        assert_eq!(TouchPhase::from_code(7), TouchPhase::Unknown);
        assert_eq!(TouchPhase::from_code(-1), TouchPhase::Unknown);
    }

    #[test]
    fn session_id_displays_hyphenated() {
        let id = SessionId::new_v4();
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(text.matches('-').count(), 4);
    }
}
