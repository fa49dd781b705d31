//! Score fusion and running score bookkeeping.
//!
//! Fusion folds the two per-frame signals into one fitness scalar. The
//! formula is fixed; the weights and the target hand state come from the
//! immutable session configuration. Fused values are only comparable
//! within a session.

use crate::config::ScoringConfig;
use crate::types::{PoseSignal, ScoreRecord};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Combine sharpness and pose into the fused fitness value.
///
/// `fused = sharpness * weight_sharpness`, plus, when a hand was
/// detected, `confidence * 100 * weight_hand * 0.5`, plus another
/// `100 * weight_hand * 0.5` when the classified state matches the
/// configured target state. Pure: identical inputs always produce the
/// identical score.
pub fn fuse_score(sharpness: f64, pose: &PoseSignal, config: &ScoringConfig) -> f64 {
    let mut fused = sharpness * config.weight_sharpness;
    if pose.detected {
        fused += pose.confidence as f64 * 100.0 * config.weight_hand * 0.5;
        if pose.state == config.target_state {
            fused += 100.0 * config.weight_hand * 0.5;
        }
    }
    fused
}

/// Build the complete per-frame record for a scored frame.
pub fn fuse_record(sharpness: f64, pose: PoseSignal, config: &ScoringConfig) -> ScoreRecord {
    ScoreRecord {
        sharpness,
        pose,
        fused: fuse_score(sharpness, &pose, config),
    }
}

/// Summary statistics over a set of scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub samples: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarize a score slice. Empty input has no statistics.
pub fn score_stats(scores: &[f64]) -> Option<ScoreStats> {
    if scores.is_empty() {
        return None;
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for &score in scores {
        min = min.min(score);
        max = max.max(score);
        sum += score;
    }
    Some(ScoreStats {
        samples: scores.len(),
        mean: sum / scores.len() as f64,
        min,
        max,
    })
}

/// Bounded window of the most recent score records.
///
/// Holds at most `capacity` records and drops the oldest first, so a long
/// session keeps constant memory. Only records are retained here, never
/// frame pixels; the best-frame tracker owns the single retained frame.
#[derive(Debug)]
pub struct ScoreHistory {
    records: VecDeque<ScoreRecord>,
    capacity: usize,
}

impl ScoreHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a record, dropping the oldest once the window is full.
    pub fn push(&mut self, record: ScoreRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn records(&self) -> impl Iterator<Item = &ScoreRecord> {
        self.records.iter()
    }

    /// Statistics over the windowed sharpness scores.
    pub fn sharpness_stats(&self) -> Option<ScoreStats> {
        let scores: Vec<f64> = self.records.iter().map(|r| r.sharpness).collect();
        score_stats(&scores)
    }

    /// Statistics over the windowed fused scores.
    pub fn fused_stats(&self) -> Option<ScoreStats> {
        let scores: Vec<f64> = self.records.iter().map(|r| r.fused).collect();
        score_stats(&scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HandState;

    fn default_scoring() -> ScoringConfig {
        ScoringConfig::default()
    }

    #[test]
    fn test_fusion_sharpness_only() {
        let config = default_scoring();
        let fused = fuse_score(200.0, &PoseSignal::none(), &config);
        assert_eq!(fused, 200.0 * config.weight_sharpness);
    }

    #[test]
    fn test_fusion_with_detection_and_target_match() {
        let config = default_scoring();
        assert_eq!(config.target_state, HandState::Empty);

        let pose = PoseSignal::new(HandState::Empty, 0.8);
        let fused = fuse_score(150.0, &pose, &config);
        // 150 * 0.5 + 0.8 * 100 * 0.5 * 0.5 + 100 * 0.5 * 0.5
        assert!((fused - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_fusion_detected_but_wrong_state() {
        let config = default_scoring();
        let pose = PoseSignal::new(HandState::Holding, 0.8);
        let fused = fuse_score(150.0, &pose, &config);
        assert!((fused - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_fusion_is_pure() {
        let config = default_scoring();
        let pose = PoseSignal::new(HandState::Empty, 0.4);
        let a = fuse_score(77.7, &pose, &config);
        let b = fuse_score(77.7, &pose, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn test_score_stats() {
        let stats = score_stats(&[30.0, 10.0, 50.0, 20.0]).unwrap();
        assert_eq!(stats.samples, 4);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 50.0);
        assert!((stats.mean - 27.5).abs() < 1e-9);
        assert!(score_stats(&[]).is_none());
    }

    #[test]
    fn test_history_drops_oldest() {
        let config = default_scoring();
        let mut history = ScoreHistory::new(3);
        for sharpness in [1.0, 2.0, 3.0, 4.0] {
            history.push(fuse_record(sharpness, PoseSignal::none(), &config));
        }
        assert_eq!(history.len(), 3);
        let stats = history.sharpness_stats().unwrap();
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 4.0);
    }

    #[test]
    fn test_history_zero_capacity_still_keeps_one() {
        let config = default_scoring();
        let mut history = ScoreHistory::new(0);
        history.push(fuse_record(5.0, PoseSignal::none(), &config));
        assert_eq!(history.len(), 1);
        assert_eq!(history.capacity(), 1);
    }
}
