//! Scripted implementations of the pipeline seams.
//!
//! One stand-in per trait: [`ScriptedSource`] plays back a fixed frame
//! list, [`ScriptedDetector`] returns prearranged landmark sets, and
//! [`MemorySink`] records stores instead of touching the filesystem.
//! The failing variants exercise the fatal-error paths.

use crate::errors::SieveError;
use crate::export::FrameSink;
use crate::pose::landmarks::HandLandmarks;
use crate::pose::LandmarkDetector;
use crate::session::FrameSource;
use crate::types::CameraFrame;
use std::collections::VecDeque;

/// Frame source that plays back a fixed list, then ends the stream.
pub struct ScriptedSource {
    frames: VecDeque<CameraFrame>,
}

impl ScriptedSource {
    pub fn new(frames: Vec<CameraFrame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    /// Frames not yet served.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> Result<Option<CameraFrame>, SieveError> {
        Ok(self.frames.pop_front())
    }
}

/// Frame source that serves its frames, then fails instead of ending.
pub struct FailingSource {
    frames: VecDeque<CameraFrame>,
}

impl FailingSource {
    pub fn new(frames: Vec<CameraFrame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }
}

impl FrameSource for FailingSource {
    fn next_frame(&mut self) -> Result<Option<CameraFrame>, SieveError> {
        match self.frames.pop_front() {
            Some(frame) => Ok(Some(frame)),
            None => Err(SieveError::Capture("scripted source failure".to_string())),
        }
    }
}

/// Detector that returns one prearranged landmark set per call.
///
/// After the script runs out it keeps answering with "no hands", which
/// is a valid detector result rather than a failure.
pub struct ScriptedDetector {
    script: VecDeque<Vec<HandLandmarks>>,
}

impl ScriptedDetector {
    pub fn new(script: Vec<Vec<HandLandmarks>>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

impl LandmarkDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &CameraFrame) -> Result<Vec<HandLandmarks>, SieveError> {
        Ok(self.script.pop_front().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Detector whose backend always fails.
pub struct FailingDetector;

impl LandmarkDetector for FailingDetector {
    fn detect(&mut self, _frame: &CameraFrame) -> Result<Vec<HandLandmarks>, SieveError> {
        Err(SieveError::Detector(
            "scripted detector failure".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// In-memory sink recording every store and clear.
///
/// `failing_after` builds a sink that accepts a limited number of
/// frames and then rejects further stores, for partial-export tests.
#[derive(Default)]
pub struct MemorySink {
    stored: Vec<(String, CameraFrame)>,
    clears: usize,
    fail_after: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_after(successes: usize) -> Self {
        Self {
            fail_after: Some(successes),
            ..Self::default()
        }
    }

    /// Stored names in store order.
    pub fn names(&self) -> Vec<&str> {
        self.stored.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.stored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stored.is_empty()
    }

    /// How many times the sink has been cleared.
    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn frame(&self, name: &str) -> Option<&CameraFrame> {
        self.stored
            .iter()
            .find(|(stored_name, _)| stored_name == name)
            .map(|(_, frame)| frame)
    }
}

impl FrameSink for MemorySink {
    fn clear(&mut self) -> Result<(), SieveError> {
        self.stored.clear();
        self.clears += 1;
        Ok(())
    }

    fn store(&mut self, name: &str, frame: &CameraFrame) -> Result<String, SieveError> {
        if let Some(limit) = self.fail_after {
            if self.stored.len() >= limit {
                return Err(SieveError::Export("scripted sink failure".to_string()));
            }
        }
        self.stored.push((name.to_string(), frame.clone()));
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::flat_frame;

    #[test]
    fn scripted_source_serves_then_ends() {
        let mut source = ScriptedSource::new(vec![flat_frame(4, 4, 0)]);
        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_none());
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn failing_source_fails_after_script() {
        let mut source = FailingSource::new(vec![flat_frame(4, 4, 0)]);
        assert!(source.next_frame().is_ok());
        assert!(matches!(
            source.next_frame(),
            Err(SieveError::Capture(_))
        ));
    }

    #[test]
    fn memory_sink_fails_after_its_limit() {
        let mut sink = MemorySink::failing_after(1);
        let frame = flat_frame(4, 4, 0);
        assert!(sink.store("a.jpg", &frame).is_ok());
        assert!(sink.store("b.jpg", &frame).is_err());
        sink.clear().unwrap();
        assert!(sink.store("c.jpg", &frame).is_ok());
        assert_eq!(sink.names(), vec!["c.jpg"]);
    }
}
