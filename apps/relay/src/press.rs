use std::time::Duration;

use shared::protocol::ControlMessage;

pub(crate) const START_DELAY: Duration = Duration::from_millis(1500);
pub(crate) const FRAME_PERIOD: Duration = Duration::from_millis(60);
pub(crate) const RING: f32 = 80.0;

const FIRST_SIZE: f32 = 4.0;
const STEP: f32 = 4.0;
const WRAP_SIZE: f32 = 8.0;

/// Endless press animation: the circle grows toward the ring and starts
/// over once it reaches it.
#[derive(Debug, Clone)]
pub(crate) struct SyntheticPress {
    size: f32,
}

impl Default for SyntheticPress {
    fn default() -> Self {
        Self { size: FIRST_SIZE }
    }
}

impl SyntheticPress {
    pub(crate) fn next_frame(&mut self) -> ControlMessage {
        let frame = ControlMessage::Press {
            circle: self.size,
            ring: RING,
        };
        self.size += STEP;
        if self.size >= RING {
            self.size = WRAP_SIZE;
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(message: ControlMessage) -> f32 {
        match message {
            ControlMessage::Press { circle, ring } => {
                assert_eq!(ring, RING);
                circle
            }
            other => panic!("expected press, got {other:?}"),
        }
    }

    #[test]
    fn grows_by_four_from_four() {
        let mut press = SyntheticPress::default();
        let sizes: Vec<f32> = (0..3).map(|_| circle(press.next_frame())).collect();
        assert_eq!(sizes, vec![4.0, 8.0, 12.0]);
    }

    #[test]
    fn wraps_to_eight_before_reaching_the_ring() {
        let mut press = SyntheticPress::default();
        let sizes: Vec<f32> = (0..21).map(|_| circle(press.next_frame())).collect();
        assert_eq!(sizes[18], 76.0);
        assert_eq!(sizes[19], 8.0);
        assert_eq!(sizes[20], 12.0);
        assert!(sizes.iter().all(|size| *size < RING));
    }
}
