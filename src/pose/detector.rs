//! Pluggable landmark detection backend.

use crate::errors::SieveError;
use crate::pose::landmarks::HandLandmarks;
use crate::types::CameraFrame;

/// A hand-landmark detection backend.
///
/// Implementations wrap whatever inference runtime the application ships:
/// an on-device model, a subprocess, a remote service. The pipeline only
/// depends on this interface, so the cross-ecosystem dependency stays at
/// the edge.
///
/// Contract: return one `HandLandmarks` per detected hand, keypoints in
/// normalized image coordinates, `score` in `[0, 1]`. An empty list is the
/// normal "no hands visible" outcome and must not be reported as an error;
/// `Err` is reserved for backend failures (model load, inference fault),
/// which the live loop treats the same way as a capture failure.
pub trait LandmarkDetector: Send {
    fn detect(&mut self, frame: &CameraFrame) -> Result<Vec<HandLandmarks>, SieveError>;

    /// Backend name for logs.
    fn name(&self) -> &str {
        "unknown"
    }
}

/// Backend that never reports hands.
///
/// Used for sharpness-only sessions where no inference runtime is
/// attached; every frame classifies as the no-hands signal.
#[derive(Debug, Default)]
pub struct NullDetector;

impl LandmarkDetector for NullDetector {
    fn detect(&mut self, _frame: &CameraFrame) -> Result<Vec<HandLandmarks>, SieveError> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "null"
    }
}
