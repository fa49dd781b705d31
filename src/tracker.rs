//! Running best-frame retention for live sessions.

use crate::assert_invariant;
use crate::types::CameraFrame;

/// Score sentinel for an empty tracker. Real fused scores are never
/// negative, so any scored frame beats it.
pub const EMPTY_SCORE: f64 = -1.0;

/// Keeps the single highest-scoring frame seen since the last reset.
///
/// Two states: empty (sentinel score, no frame) and holding-best. A frame
/// replaces the current best only when its fused score is strictly
/// greater, so on a tie the first-seen frame is retained. The retained
/// frame is a deep copy; the caller keeps ownership of what it passed in.
///
/// Score and frame always change together. A tracker shared across
/// threads must sit behind a lock as a whole, so no reader can observe a
/// score from one update paired with the frame from another.
#[derive(Debug)]
pub struct BestFrameTracker {
    best_score: f64,
    best_frame: Option<CameraFrame>,
}

impl Default for BestFrameTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl BestFrameTracker {
    pub fn new() -> Self {
        Self {
            best_score: EMPTY_SCORE,
            best_frame: None,
        }
    }

    /// Offer a scored frame. Returns true when it became the new best.
    pub fn update(&mut self, frame: &CameraFrame, fused: f64) -> bool {
        if fused > self.best_score {
            self.best_frame = Some(frame.clone());
            self.best_score = fused;
            assert_invariant!(
                self.best_frame.is_some() && self.best_score > EMPTY_SCORE,
                "Tracker holds a frame exactly when a score beat the sentinel",
                "BestFrameTracker::update"
            );
            true
        } else {
            false
        }
    }

    /// Non-destructive read of the current best, usable mid-session.
    pub fn peek(&self) -> Option<(&CameraFrame, f64)> {
        self.best_frame.as_ref().map(|frame| (frame, self.best_score))
    }

    /// The running maximum fused score, or the sentinel when empty.
    pub fn best_score(&self) -> f64 {
        self.best_score
    }

    pub fn is_empty(&self) -> bool {
        self.best_frame.is_none()
    }

    /// Move the retained frame out, leaving the tracker empty.
    pub fn take(&mut self) -> Option<(CameraFrame, f64)> {
        let score = self.best_score;
        let frame = self.best_frame.take();
        self.best_score = EMPTY_SCORE;
        frame.map(|frame| (frame, score))
    }

    /// Return to the empty state.
    pub fn reset(&mut self) {
        self.best_frame = None;
        self.best_score = EMPTY_SCORE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tag: u8) -> CameraFrame {
        CameraFrame::new(vec![tag; 12], 2, 2, "test".to_string())
    }

    #[test]
    fn test_starts_empty() {
        let tracker = BestFrameTracker::new();
        assert!(tracker.is_empty());
        assert_eq!(tracker.best_score(), EMPTY_SCORE);
        assert!(tracker.peek().is_none());

        let defaulted = BestFrameTracker::default();
        assert_eq!(defaulted.best_score(), EMPTY_SCORE);
    }

    #[test]
    fn test_strictly_greater_replaces_ties_do_not() {
        let mut tracker = BestFrameTracker::new();
        let first = frame(1);
        let second = frame(2);

        assert!(tracker.update(&frame(0), 10.0));
        assert!(tracker.update(&first, 25.0));
        assert!(!tracker.update(&second, 25.0));
        assert!(!tracker.update(&frame(3), 5.0));

        let (best, score) = tracker.peek().unwrap();
        assert_eq!(score, 25.0);
        assert_eq!(best.id, first.id);
    }

    #[test]
    fn test_retained_frame_is_a_copy() {
        let mut tracker = BestFrameTracker::new();
        let mut original = frame(7);
        tracker.update(&original, 1.0);
        original.data[0] = 99;

        let (best, _) = tracker.peek().unwrap();
        assert_eq!(best.data[0], 7);
    }

    #[test]
    fn test_reset_returns_to_empty() {
        let mut tracker = BestFrameTracker::new();
        tracker.update(&frame(1), 40.0);
        tracker.reset();
        assert!(tracker.is_empty());
        assert_eq!(tracker.best_score(), EMPTY_SCORE);

        // After a reset any positive score wins again
        assert!(tracker.update(&frame(2), 0.5));
    }

    #[test]
    fn test_peek_is_non_destructive() {
        let mut tracker = BestFrameTracker::new();
        tracker.update(&frame(1), 12.0);
        assert!(tracker.peek().is_some());
        assert!(tracker.peek().is_some());
        assert_eq!(tracker.best_score(), 12.0);
    }

    #[test]
    fn test_take_empties_the_tracker() {
        let mut tracker = BestFrameTracker::new();
        tracker.update(&frame(1), 8.0);
        let (taken, score) = tracker.take().unwrap();
        assert_eq!(score, 8.0);
        assert_eq!(taken.data[0], 1);
        assert!(tracker.is_empty());
        assert!(tracker.take().is_none());
    }

    #[test]
    fn contract_update_runs_its_guard() {
        let mut tracker = BestFrameTracker::new();
        tracker.update(&frame(1), 3.0);
        crate::invariant_ppt::contract_test(
            "best frame tracking",
            &["Tracker holds a frame exactly when a score beat the sentinel"],
        );
    }
}
