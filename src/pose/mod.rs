//! Hand pose detection and state classification.
//!
//! A pluggable [`LandmarkDetector`] reports zero or more hands per frame
//! as 21 normalized keypoints with a per-hand score. The classifier
//! filters them by the configured confidence floor, picks one hand
//! deterministically, and derives an open/closed state from how far apart
//! its fingertips sit. Zero hands is a normal outcome, never an error.

pub mod annotate;
pub mod detector;
pub mod landmarks;

pub use annotate::annotate_frame;
pub use detector::{LandmarkDetector, NullDetector};
pub use landmarks::{HandLandmarks, Landmark, FINGERTIPS, HAND_SKELETON, LANDMARK_COUNT};

use crate::errors::SieveError;
use crate::types::{CameraFrame, HandState, PoseSignal};

/// Fingertip spread above which a hand counts as open/empty.
///
/// Spread is measured in normalized image units, so the cutoff is
/// resolution-independent. Exactly at the threshold classifies as
/// `HOLDING`; only a strictly larger spread reads as `EMPTY`.
pub const DEFAULT_SPREAD_THRESHOLD: f32 = 0.15;

/// Everything the classifier produces for one frame.
#[derive(Debug, Clone)]
pub struct PoseObservation {
    /// The scoring-relevant signal (detected flag, state, confidence).
    pub signal: PoseSignal,
    /// Hands that passed the confidence floor.
    pub hand_count: usize,
    /// Frame copy with landmarks drawn, for display only.
    pub annotated: CameraFrame,
}

/// Classifies the hand state of frames using a pluggable detector.
pub struct PoseClassifier {
    detector: Box<dyn LandmarkDetector>,
    min_confidence: f32,
    spread_threshold: f32,
}

impl PoseClassifier {
    /// Create a classifier over `detector`, discarding hands whose score
    /// falls below `min_confidence`.
    pub fn new(detector: Box<dyn LandmarkDetector>, min_confidence: f32) -> Self {
        Self {
            detector,
            min_confidence,
            spread_threshold: DEFAULT_SPREAD_THRESHOLD,
        }
    }

    /// Override the open-hand spread cutoff.
    pub fn with_spread_threshold(mut self, spread_threshold: f32) -> Self {
        self.spread_threshold = spread_threshold;
        self
    }

    /// Classify one frame.
    ///
    /// Hands below the confidence floor are dropped before anything else;
    /// if none survive, the result is the no-hands observation with the
    /// frame passed through unannotated. Otherwise the hand with the
    /// highest score (ties: lowest detector index) drives the state
    /// heuristic, while the reported confidence is the mean score across
    /// all surviving hands.
    ///
    /// `Err` only reflects a detector backend failure.
    pub fn classify(&mut self, frame: &CameraFrame) -> Result<PoseObservation, SieveError> {
        let mut hands = self.detector.detect(frame)?;
        hands.retain(|hand| hand.score >= self.min_confidence);

        if hands.is_empty() {
            log::debug!(
                "No hands at or above confidence {:.2} in frame {}",
                self.min_confidence,
                frame.sequence
            );
            return Ok(PoseObservation {
                signal: PoseSignal::none(),
                hand_count: 0,
                annotated: frame.clone(),
            });
        }

        // Strictly-greater keeps the first hand on score ties.
        let mut primary = &hands[0];
        for hand in &hands[1..] {
            if hand.score > primary.score {
                primary = hand;
            }
        }

        let spread = primary.fingertip_spread();
        let state = if spread > self.spread_threshold {
            HandState::Empty
        } else {
            HandState::Holding
        };

        let confidence = hands.iter().map(|hand| hand.score).sum::<f32>() / hands.len() as f32;
        let confidence = confidence.clamp(0.0, 1.0);

        log::debug!(
            "{} hand(s), spread {:.3}, state {}, confidence {:.2}",
            hands.len(),
            spread,
            state,
            confidence
        );

        Ok(PoseObservation {
            signal: PoseSignal::new(state, confidence),
            hand_count: hands.len(),
            annotated: annotate_frame(frame, &hands),
        })
    }

    pub fn detector_name(&self) -> &str {
        self.detector.name()
    }

    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    pub fn spread_threshold(&self) -> f32 {
        self.spread_threshold
    }
}
