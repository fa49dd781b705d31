//! Configuration management for framesieve
//!
//! Provides configuration loading, saving, and validation for capture
//! geometry, scoring thresholds and weights, selection sizes, and output
//! preferences. The configuration is constructed once and passed by
//! reference; nothing in the pipeline mutates shared config state.

use crate::errors::SieveError;
use crate::pose::DEFAULT_SPREAD_THRESHOLD;
use crate::types::HandState;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSieveConfig {
    pub capture: CaptureConfig,
    pub scoring: ScoringConfig,
    pub selection: SelectionConfig,
    pub output: OutputConfig,
}

/// Capture source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Camera index for the capture backend
    pub device_index: u32,
    /// Requested capture resolution [width, height]
    pub resolution: [u32; 2],
    /// Requested frames per second
    pub fps: u32,
    /// Frames discarded at session start while exposure settles
    pub warmup_frames: u32,
    /// Number of frames captured by one burst
    pub burst_count: u32,
    /// Delay between burst frames in milliseconds
    pub burst_interval_ms: u64,
}

/// Scoring thresholds and fusion weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Sharpness below this is reported as blurry in status output
    pub blur_threshold: f64,
    /// Hands scoring below this confidence are ignored
    pub hand_confidence_threshold: f32,
    /// Hand state that earns the full state bonus
    pub target_state: HandState,
    /// Fingertip spread above which a hand counts as open
    pub spread_threshold: f32,
    /// Weight on the sharpness term of the fused score
    pub weight_sharpness: f64,
    /// Weight on the hand term of the fused score
    pub weight_hand: f64,
}

/// Selection sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// How many frames batch selection keeps
    pub top_n: usize,
    /// Score records retained for running session statistics
    pub buffer_size: usize,
}

/// Output and file naming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the provided directory sink writes into
    pub directory: String,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for FrameSieveConfig {
    fn default() -> Self {
        Self {
            capture: CaptureConfig {
                device_index: 0,
                resolution: [640, 480],
                fps: 30,
                warmup_frames: 5,
                burst_count: 30,
                burst_interval_ms: 100,
            },
            scoring: ScoringConfig {
                blur_threshold: 100.0,
                hand_confidence_threshold: 0.7,
                target_state: HandState::Empty,
                spread_threshold: DEFAULT_SPREAD_THRESHOLD,
                weight_sharpness: 0.5,
                weight_hand: 0.5,
            },
            selection: SelectionConfig {
                top_n: 3,
                buffer_size: 30,
            },
            output: OutputConfig {
                directory: "./captures".to_string(),
                jpeg_quality: 95,
            },
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        FrameSieveConfig::default().scoring
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        FrameSieveConfig::default().capture
    }
}

impl FrameSieveConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SieveError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| SieveError::Config(format!("Failed to read config file: {}", e)))?;

        let config: FrameSieveConfig = toml::from_str(&contents)
            .map_err(|e| SieveError::Config(format!("Failed to parse config file: {}", e)))?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SieveError> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SieveError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| SieveError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| SieveError::Config(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("framesieve.toml")
    }

    /// Load from default location or create with defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        // Validate capture config
        if self.capture.resolution[0] == 0 || self.capture.resolution[1] == 0 {
            return Err("Invalid capture resolution".to_string());
        }
        if self.capture.fps == 0 || self.capture.fps > 240 {
            return Err("Invalid FPS (must be 1-240)".to_string());
        }
        if self.capture.burst_count == 0 {
            return Err("Burst count must be at least 1".to_string());
        }

        // Validate scoring config
        if self.scoring.blur_threshold.is_nan() || self.scoring.blur_threshold <= 0.0 {
            return Err("Blur threshold must be greater than zero".to_string());
        }
        if !(0.0..=1.0).contains(&self.scoring.hand_confidence_threshold) {
            return Err("Hand confidence threshold must be between 0.0 and 1.0".to_string());
        }
        if !(self.scoring.spread_threshold > 0.0 && self.scoring.spread_threshold < 1.0) {
            return Err("Spread threshold must be between 0.0 and 1.0 exclusive".to_string());
        }
        if self.scoring.weight_sharpness.is_nan() || self.scoring.weight_sharpness < 0.0 {
            return Err("Sharpness weight must be zero or greater".to_string());
        }
        if self.scoring.weight_hand.is_nan() || self.scoring.weight_hand < 0.0 {
            return Err("Hand weight must be zero or greater".to_string());
        }

        // Validate selection config
        if self.selection.top_n == 0 {
            return Err("Top-N must be at least 1".to_string());
        }
        if self.selection.buffer_size == 0 {
            return Err("Buffer size must be at least 1".to_string());
        }

        // Validate output config
        if self.output.jpeg_quality == 0 || self.output.jpeg_quality > 100 {
            return Err("JPEG quality must be between 1 and 100".to_string());
        }

        Ok(())
    }
}
