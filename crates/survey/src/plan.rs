use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::domain::{Gesture, MaterialId, SlideIndex};

use crate::{
    slides::{Consent, FrontMatter, Likert, Press, Response, Track, LIKERT_QUESTIONS},
    widgets::PadArea,
    Slide,
};

fn default_questions() -> u32 {
    LIKERT_QUESTIONS
}

fn default_tolerance() -> f32 {
    2.0
}

/// Configuration form of a slide, e.g. as a `[[slides]]` table in
/// `survey.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlideSpec {
    FrontMatter,
    Consent,
    Likert {
        material: u32,
        gesture: Gesture,
        #[serde(default = "default_questions")]
        questions: u32,
    },
    Press {
        material: u32,
        duration_secs: u64,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
    Slider {
        material: u32,
        duration_secs: u64,
        #[serde(default)]
        pad: PadArea,
    },
    Tap {
        material: u32,
        duration_secs: u64,
        #[serde(default)]
        pad: PadArea,
    },
    Response {
        name: String,
        count: u32,
        slide: u32,
    },
}

impl SlideSpec {
    pub fn build(&self) -> Box<dyn Slide> {
        match self {
            SlideSpec::FrontMatter => Box::new(FrontMatter),
            SlideSpec::Consent => Box::new(Consent),
            SlideSpec::Likert {
                material,
                gesture,
                questions,
            } => Box::new(Likert {
                material: MaterialId(*material),
                gesture: *gesture,
                questions: *questions,
            }),
            SlideSpec::Press {
                material,
                duration_secs,
                tolerance,
            } => Box::new(Press {
                material: MaterialId(*material),
                duration: Duration::from_secs(*duration_secs),
                tolerance: *tolerance,
            }),
            SlideSpec::Slider {
                material,
                duration_secs,
                pad,
            } => Box::new(Track::slider(
                MaterialId(*material),
                Duration::from_secs(*duration_secs),
                *pad,
            )),
            SlideSpec::Tap {
                material,
                duration_secs,
                pad,
            } => Box::new(Track::tap(
                MaterialId(*material),
                Duration::from_secs(*duration_secs),
                *pad,
            )),
            SlideSpec::Response { name, count, slide } => Box::new(Response {
                name: name.clone(),
                count: *count,
                slide: SlideIndex(*slide),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyPlan {
    pub slides: Vec<SlideSpec>,
}

impl SurveyPlan {
    pub fn build(&self) -> Vec<Box<dyn Slide>> {
        self.slides.iter().map(SlideSpec::build).collect()
    }
}

impl Default for SurveyPlan {
    /// Full session on material 1: every gesture followed by its likert
    /// questions, then the comparison questions.
    fn default() -> Self {
        let material = 1;
        let duration_secs = 20;
        let mut slides = vec![SlideSpec::FrontMatter, SlideSpec::Consent];
        slides.push(SlideSpec::Press {
            material,
            duration_secs,
            tolerance: default_tolerance(),
        });
        slides.push(likert(material, Gesture::Press));
        slides.push(SlideSpec::Slider {
            material,
            duration_secs,
            pad: PadArea::default(),
        });
        slides.push(likert(material, Gesture::Slider));
        slides.push(SlideSpec::Tap {
            material,
            duration_secs,
            pad: PadArea::default(),
        });
        slides.push(likert(material, Gesture::Tap));
        slides.extend([
            response("most_accurate", 1, SlideIndex::MOST_ACCURATE),
            response("most_comfortable", 1, SlideIndex::MOST_COMFORTABLE),
            response("most_responsive", 1, SlideIndex::MOST_RESPONSIVE),
            response("order_favorite", 4, SlideIndex::ORDER_FAVORITE),
        ]);
        Self { slides }
    }
}

fn likert(material: u32, gesture: Gesture) -> SlideSpec {
    SlideSpec::Likert {
        material,
        gesture,
        questions: LIKERT_QUESTIONS,
    }
}

fn response(name: &str, count: u32, slide: SlideIndex) -> SlideSpec {
    SlideSpec::Response {
        name: name.to_string(),
        count,
        slide: slide.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct PlanFile {
        slides: Vec<SlideSpec>,
    }

    #[test]
    fn parses_slides_from_toml_with_defaults() {
        let raw = r#"
            [[slides]]
            kind = "front_matter"

            [[slides]]
            kind = "likert"
            material = 2
            gesture = "press"

            [[slides]]
            kind = "press"
            material = 2
            duration_secs = 10

            [[slides]]
            kind = "tap"
            material = 3
            duration_secs = 5
            pad = { left = 0.0, top = 0.0, width = 120.0, height = 40.0 }

            [[slides]]
            kind = "response"
            name = "order_favorite"
            count = 4
            slide = 7
        "#;
        let file: PlanFile = toml::from_str(raw).expect("toml");

        assert_eq!(file.slides[0], SlideSpec::FrontMatter);
        assert_eq!(
            file.slides[1],
            SlideSpec::Likert {
                material: 2,
                gesture: Gesture::Press,
                questions: 3,
            }
        );
        assert_eq!(
            file.slides[2],
            SlideSpec::Press {
                material: 2,
                duration_secs: 10,
                tolerance: 2.0,
            }
        );
        match &file.slides[3] {
            SlideSpec::Tap { pad, .. } => assert_eq!(pad.width, 120.0),
            other => panic!("unexpected slide {other:?}"),
        }

        let built: Vec<&'static str> = file.slides.iter().map(|s| s.build().name()).collect();
        assert_eq!(built, vec!["front_matter", "likert", "press", "tap", "response"]);
    }

    #[test]
    fn rejects_unknown_slide_kind() {
        let raw = r#"
            [[slides]]
            kind = "quiz"
        "#;
        assert!(toml::from_str::<PlanFile>(raw).is_err());
    }

    #[test]
    fn default_plan_opens_with_front_matter_and_consent() {
        let plan = SurveyPlan::default();
        assert_eq!(plan.slides[0], SlideSpec::FrontMatter);
        assert_eq!(plan.slides[1], SlideSpec::Consent);
        assert_eq!(plan.build().len(), plan.slides.len());
        assert!(matches!(
            plan.slides.last(),
            Some(SlideSpec::Response { count: 4, .. })
        ));
    }
}
