//! Hand landmark model.
//!
//! Detectors report each hand as 21 keypoints in normalized image
//! coordinates (x and y in [0, 1], origin top-left), indexed in the
//! standard wrist-to-fingertip order. The indices and skeleton topology
//! here match what every mainstream hand-landmark backend emits.

use serde::{Deserialize, Serialize};

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// The five fingertip indices used by the open/closed spread heuristic.
pub const FINGERTIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Hand skeleton connections for rendering
pub const HAND_SKELETON: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC),
    (THUMB_CMC, THUMB_MCP),
    (THUMB_MCP, THUMB_IP),
    (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP),
    (INDEX_MCP, INDEX_PIP),
    (INDEX_PIP, INDEX_DIP),
    (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP),
    (MIDDLE_MCP, MIDDLE_PIP),
    (MIDDLE_PIP, MIDDLE_DIP),
    (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP),
    (RING_MCP, RING_PIP),
    (RING_PIP, RING_DIP),
    (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP),
    (WRIST, PINKY_MCP),
    (PINKY_MCP, PINKY_PIP),
    (PINKY_PIP, PINKY_DIP),
    (PINKY_DIP, PINKY_TIP),
];

/// A single keypoint in normalized image coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another landmark, in normalized units.
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One detected hand: 21 keypoints plus the detector's per-hand score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks {
    pub landmarks: [Landmark; LANDMARK_COUNT],
    pub score: f32,
}

impl HandLandmarks {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT], score: f32) -> Self {
        Self { landmarks, score }
    }

    /// Mean pairwise distance between the five fingertips.
    ///
    /// An open hand spreads its fingertips apart; a hand closed around an
    /// object pulls them together. The mean over all ten tip pairs is the
    /// scalar the state heuristic thresholds on.
    pub fn fingertip_spread(&self) -> f32 {
        let mut total = 0.0f32;
        let mut pairs = 0u32;
        for (i, &a) in FINGERTIPS.iter().enumerate() {
            for &b in FINGERTIPS.iter().skip(i + 1) {
                total += self.landmarks[a].distance(&self.landmarks[b]);
                pairs += 1;
            }
        }
        total / pairs as f32
    }
}
