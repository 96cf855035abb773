//! Victory screen sequence
//!
//! Presentation only: score and phase are settled before this starts.

use crate::consts::{VICTORY_FRAME_TICKS, VICTORY_FRAMES};

/// Where the victory screen is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VictoryStage {
    /// Round not won
    #[default]
    Idle,
    /// Victory background up, waiting for the restart key
    BackgroundShown,
    /// Celebration frames playing
    Animating { frame: usize, timer: u32 },
    /// Animation done, restart prompt visible
    Finished,
}

#[derive(Debug, Clone, Default)]
pub struct VictorySequence {
    pub stage: VictoryStage,
}

impl VictorySequence {
    /// Round won: show the background
    pub fn enter(&mut self) {
        if self.stage == VictoryStage::Idle {
            self.stage = VictoryStage::BackgroundShown;
        }
    }

    /// Restart key while the background is shown. Returns true if the
    /// animation started.
    pub fn start_animation(&mut self) -> bool {
        if self.stage == VictoryStage::BackgroundShown {
            self.stage = VictoryStage::Animating { frame: 0, timer: 0 };
            true
        } else {
            false
        }
    }

    /// Advance one tick. Returns true on the tick the animation finishes.
    pub fn advance(&mut self) -> bool {
        let VictoryStage::Animating { frame, timer } = self.stage else {
            return false;
        };

        let timer = timer + 1;
        if timer < VICTORY_FRAME_TICKS {
            self.stage = VictoryStage::Animating { frame, timer };
            return false;
        }

        let frame = frame + 1;
        if frame >= VICTORY_FRAMES {
            self.stage = VictoryStage::Finished;
            true
        } else {
            self.stage = VictoryStage::Animating { frame, timer: 0 };
            false
        }
    }

    /// Current animation frame, if animating
    pub fn frame(&self) -> Option<usize> {
        match self.stage {
            VictoryStage::Animating { frame, .. } => Some(frame),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.stage == VictoryStage::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_sequence() {
        let mut seq = VictorySequence::default();
        assert!(!seq.start_animation()); // nothing to animate yet

        seq.enter();
        assert_eq!(seq.stage, VictoryStage::BackgroundShown);
        // Background waits for the key
        assert!(!seq.advance());
        assert_eq!(seq.stage, VictoryStage::BackgroundShown);

        assert!(seq.start_animation());
        assert_eq!(seq.frame(), Some(0));

        let total = VICTORY_FRAMES as u32 * VICTORY_FRAME_TICKS;
        let mut finished_at = None;
        for t in 1..=total {
            if seq.advance() {
                finished_at = Some(t);
            }
        }
        assert_eq!(finished_at, Some(total));
        assert!(seq.is_finished());
        assert_eq!(seq.frame(), None);

        // Finished is sticky
        assert!(!seq.advance());
        assert!(!seq.start_animation());
    }

    #[test]
    fn test_frames_advance_in_order() {
        let mut seq = VictorySequence::default();
        seq.enter();
        seq.start_animation();
        for _ in 0..VICTORY_FRAME_TICKS {
            seq.advance();
        }
        assert_eq!(seq.frame(), Some(1));
    }
}
