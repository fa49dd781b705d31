//! FrameSieve: camera frame scoring and selection
//!
//! This crate watches a stream of camera frames, scores every frame by
//! image sharpness and hand pose, and keeps the sharpest moment. It runs
//! in two modes: a live session that tracks the best frame while frames
//! arrive, and a batch selector that ranks an already-captured directory
//! of frames and exports the top N.
//!
//! # Features
//! - Variance-of-Laplacian sharpness scoring on RGB8 frames
//! - Pluggable hand landmark detection with open/closed classification
//! - Weighted fusion of sharpness and pose into one comparable score
//! - Live best-frame tracking with a bounded score history
//! - Batch top-N selection with deterministic, stable ranking
//! - Burst capture for building frame collections (feature `camera`)
//!
//! # Usage
//! Add this to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! framesieve = "0.1"
//! ```
//!
//! Then run a live session against any frame source:
//! ```rust,ignore
//! use framesieve::pose::NullDetector;
//! use framesieve::session::NullDisplay;
//! use framesieve::{DirectorySink, FrameSieveConfig, LiveSession};
//!
//! fn main() -> Result<(), framesieve::SieveError> {
//!     framesieve::init_logging();
//!     let config = FrameSieveConfig::load_or_default();
//!     let mut source = open_some_frame_source()?;
//!     let mut sink = DirectorySink::create("./captures", 95)?;
//!     let mut session = LiveSession::new(&config, Box::new(NullDetector));
//!     let summary = session.run(&mut source, &mut sink, &mut NullDisplay, None)?;
//!     println!("best score: {}", summary.best_score);
//!     Ok(())
//! }
//! ```
pub mod batch;
pub mod config;
pub mod errors;
pub mod export;
pub mod invariant_ppt;
pub mod pose;
pub mod scoring;
pub mod session;
pub mod sharpness;
pub mod tracker;
pub mod types;

#[cfg(feature = "camera")]
pub mod camera;

// Testing utilities - synthetic frames and scripted collaborators
pub mod testing;

// Re-exports for convenience
pub use batch::{select_best_frames, BatchError, SelectionReport};
pub use config::FrameSieveConfig;
pub use errors::SieveError;
pub use export::{DirectorySink, FrameSink};
pub use pose::{LandmarkDetector, PoseClassifier};
pub use scoring::{fuse_score, ScoreHistory, ScoreStats};
pub use session::{
    capture_burst, ControlSignal, FrameDisplay, FrameSource, LiveSession, SessionSummary,
};
pub use sharpness::{is_blurry, sharpness_score};
pub use tracker::{BestFrameTracker, EMPTY_SCORE};
pub use types::{CameraFormat, CameraFrame, HandState, PoseSignal, ScoreRecord};

#[cfg(feature = "camera")]
pub use camera::NokhwaCamera;

/// Initialize logging for the pipeline
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "framesieve=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn test_crate_info() {
        let info = get_info();
        assert_eq!(info.name, "framesieve");
        assert!(!info.version.is_empty());
        assert!(!info.description.is_empty());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = FrameSieveConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging();
        init_logging();
    }
}
