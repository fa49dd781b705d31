//! Core types shared across the frame selection pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A decoded RGB8 camera frame.
///
/// Frames are transient: the pipeline owns one in-flight frame at a time
/// plus whatever the best-frame tracker has retained. `sequence` is a
/// monotonic per-source index assigned at capture time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraFrame {
    pub id: String,
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub device_id: String,
    pub format: String,
    pub size_bytes: usize,
}

impl CameraFrame {
    /// Create a new frame from raw RGB8 data.
    pub fn new(data: Vec<u8>, width: u32, height: u32, device_id: String) -> Self {
        let size_bytes = data.len();
        Self {
            id: Uuid::new_v4().to_string(),
            sequence: 0,
            timestamp: Utc::now(),
            width,
            height,
            data,
            device_id,
            format: "RGB8".to_string(),
            size_bytes,
        }
    }

    /// Set the pixel format tag (e.g. "RGB8", "JPEG").
    pub fn with_format(mut self, format: String) -> Self {
        self.format = format;
        self
    }

    /// Set the monotonic capture sequence index.
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// A frame is valid when it has pixel data and non-zero dimensions.
    pub fn is_valid(&self) -> bool {
        !self.data.is_empty() && self.width > 0 && self.height > 0
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// Requested capture geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraFormat {
    pub width: u32,
    pub height: u32,
    pub fps: f32,
}

impl CameraFormat {
    pub fn new(width: u32, height: u32, fps: f32) -> Self {
        Self { width, height, fps }
    }

    /// 1920x1080@30
    pub fn hd() -> Self {
        Self::new(1920, 1080, 30.0)
    }

    /// 1280x720@30
    pub fn standard() -> Self {
        Self::new(1280, 720, 30.0)
    }

    /// 640x480@30
    pub fn low() -> Self {
        Self::new(640, 480, 30.0)
    }
}

impl Default for CameraFormat {
    fn default() -> Self {
        Self::low()
    }
}

/// Classified hand state for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandState {
    Empty,
    Holding,
    Unknown,
}

impl HandState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandState::Empty => "EMPTY",
            HandState::Holding => "HOLDING",
            HandState::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for HandState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HandState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EMPTY" => Ok(HandState::Empty),
            "HOLDING" => Ok(HandState::Holding),
            "UNKNOWN" => Ok(HandState::Unknown),
            _ => Err(()),
        }
    }
}

/// Per-frame hand detection outcome.
///
/// `confidence` is the mean of the per-hand scores over every detected
/// hand and is always in `[0, 1]`. When no hand is present the signal is
/// `detected = false`, `state = UNKNOWN`, `confidence = 0` and scoring
/// continues on sharpness alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseSignal {
    pub detected: bool,
    pub state: HandState,
    pub confidence: f32,
}

impl PoseSignal {
    pub fn new(state: HandState, confidence: f32) -> Self {
        Self {
            detected: true,
            state,
            confidence,
        }
    }

    /// The no-hands signal.
    pub fn none() -> Self {
        Self {
            detected: false,
            state: HandState::Unknown,
            confidence: 0.0,
        }
    }
}

impl Default for PoseSignal {
    fn default() -> Self {
        Self::none()
    }
}

/// Complete per-frame score: both raw signals plus the fused fitness.
///
/// `fused` is comparable only across frames of the same session; its
/// absolute magnitude carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub sharpness: f64,
    pub pose: PoseSignal,
    pub fused: f64,
}
