//! Testing utilities for FrameSieve
//!
//! Provides deterministic synthetic frames with known sharpness ordering
//! and scripted pipeline collaborators, enabling reliable offline testing
//! without camera hardware or a landmark model.

pub mod scripted;
pub mod synthetic_data;

pub use scripted::{FailingDetector, FailingSource, MemorySink, ScriptedDetector, ScriptedSource};
pub use synthetic_data::{
    box_blur, checkerboard_frame, flat_frame, gradient_frame, hand_with_spread, noise_frame,
};
