//! Draw commands for the widget canvases and text labels of each slide.

use std::f32::consts::PI;

use serde::Serialize;
use shared::domain::SlideIndex;

use crate::state::ViewState;

pub const PRESS_CANVAS: (f32, f32) = (400.0, 400.0);
pub const TRACK_CANVAS: (f32, f32) = (750.0, 400.0);

const PINK: &str = "#D989BC";
const AMBER: &str = "#F3B73B";
const RED: &str = "#cc0000";
const BLACK: &str = "#000000";

const ARROW_HEAD: f32 = 10.0;
const ARROW_WIDTH: f32 = 22.0;
const TRACK_LINE_WIDTH: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        width: f32,
        height: f32,
    },
    Line {
        from: Point,
        to: Point,
        width: f32,
        color: &'static str,
    },
    FillCircle {
        center: Point,
        radius: f32,
        color: &'static str,
    },
    StrokeCircle {
        center: Point,
        radius: f32,
        width: f32,
        color: &'static str,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: &'static str,
        alpha: f32,
    },
    /// Closed outline, stroked and filled in the same color.
    Polygon {
        points: Vec<Point>,
        width: f32,
        color: &'static str,
    },
    Label {
        element: &'static str,
        text: String,
    },
}

/// Arrow shaft from `from` to `to` with a head at `to`.
pub fn arrow(from: Point, to: Point) -> [DrawCommand; 2] {
    let angle = (to.y - from.y).atan2(to.x - from.x);
    let side = |offset: f32| {
        Point::new(
            to.x - ARROW_HEAD * (angle + offset).cos(),
            to.y - ARROW_HEAD * (angle + offset).sin(),
        )
    };
    [
        DrawCommand::Line {
            from,
            to,
            width: ARROW_WIDTH,
            color: RED,
        },
        DrawCommand::Polygon {
            points: vec![to, side(-PI / 7.0), side(PI / 7.0)],
            width: ARROW_WIDTH,
            color: RED,
        },
    ]
}

fn track_line() -> DrawCommand {
    DrawCommand::Line {
        from: Point::new(30.0, 200.0),
        to: Point::new(TRACK_CANVAS.0, 200.0),
        width: TRACK_LINE_WIDTH,
        color: BLACK,
    }
}

impl ViewState {
    /// Scene for the current slide. Slides without a canvas only produce
    /// their labels.
    pub fn render(&self) -> Vec<DrawCommand> {
        let mut commands = Vec::new();
        let material_label = |element: &'static str| {
            self.material_for(self.slide).map(|m| DrawCommand::Label {
                element,
                text: m.to_string(),
            })
        };

        match self.slide {
            SlideIndex::CONSENT => {
                if let Some(id) = &self.consent_id {
                    commands.push(DrawCommand::Label {
                        element: "consent-id",
                        text: id.clone(),
                    });
                }
            }
            SlideIndex::LIKERT => {
                commands.extend(material_label("materialIndex"));
                if let Some(gesture) = self.gesture {
                    commands.push(DrawCommand::Label {
                        element: "gestureType",
                        text: gesture.to_string(),
                    });
                }
            }
            SlideIndex::PRESS => {
                commands.extend(material_label("materialIndexPress"));
                commands.push(DrawCommand::Clear {
                    width: PRESS_CANVAS.0,
                    height: PRESS_CANVAS.1,
                });
                if let Some(press) = self.press {
                    let center = Point::new(PRESS_CANVAS.0 / 2.0, PRESS_CANVAS.1 / 2.0);
                    commands.push(DrawCommand::FillCircle {
                        center,
                        radius: press.circle,
                        color: PINK,
                    });
                    commands.push(DrawCommand::StrokeCircle {
                        center,
                        radius: press.ring,
                        width: 5.0,
                        color: BLACK,
                    });
                }
            }
            SlideIndex::SLIDER => {
                commands.extend(material_label("materialIndexSlider"));
                commands.push(DrawCommand::Clear {
                    width: TRACK_CANVAS.0,
                    height: TRACK_CANVAS.1,
                });
                commands.push(track_line());
                if let Some(slider) = self.slider {
                    commands.push(DrawCommand::FillRect {
                        x: slider.user_x,
                        y: 180.0,
                        width: 20.0,
                        height: 40.0,
                        color: PINK,
                        alpha: 1.0,
                    });
                    commands.push(DrawCommand::FillRect {
                        x: slider.box_x,
                        y: 170.0,
                        width: slider.box_size,
                        height: 60.0,
                        color: AMBER,
                        alpha: 0.5,
                    });
                }
            }
            SlideIndex::TAP => {
                commands.extend(material_label("materialIndexTap"));
                commands.push(DrawCommand::Clear {
                    width: TRACK_CANVAS.0,
                    height: TRACK_CANVAS.1,
                });
                commands.push(track_line());
                if let Some(tap) = self.tap {
                    commands.extend(arrow(
                        Point::new(tap.arrow_x, 130.0),
                        Point::new(tap.arrow_x, 175.0),
                    ));
                }
            }
            _ => {}
        }

        commands
    }
}

#[cfg(test)]
#[path = "tests/scene_tests.rs"]
mod tests;
