//! Frame persistence.
//!
//! The pipeline hands finished frames to a [`FrameSink`] together with a
//! suggested name; what storage actually means is the sink's business.
//! [`DirectorySink`] is the provided implementation writing image files
//! into a local directory, with JPEG compression by default and PNG
//! passthrough when the suggested name asks for it.

use crate::errors::SieveError;
use crate::types::CameraFrame;
use chrono::{DateTime, Utc};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Destination for frames selected for keeping.
///
/// `store` persists one frame under a suggested name and returns the
/// sink-specific identifier of what it wrote (a path, for directory
/// sinks). `clear` empties the destination entirely; batch export calls
/// it before writing a fresh selection so stale results never mix with
/// new ones.
pub trait FrameSink {
    fn clear(&mut self) -> Result<(), SieveError>;
    fn store(&mut self, name: &str, frame: &CameraFrame) -> Result<String, SieveError>;
}

/// Suggested name for a live session's exported best frame.
pub fn best_frame_name(at: DateTime<Utc>) -> String {
    format!("best_frame_{}.jpg", at.format("%Y%m%d_%H%M%S"))
}

/// Suggested name for one entry of a ranked selection.
///
/// Rank is 1-based; the original source id rides along so every exported
/// file traces back to its input.
pub fn ranked_frame_name(rank: usize, source_id: &str) -> String {
    format!("selected_{:02}_{}", rank, source_id)
}

/// Suggested name for one frame of a capture burst.
pub fn burst_frame_name(session: &str, index: u32) -> String {
    format!("frame_{}_{:03}.jpg", session, index)
}

/// Timestamp tag shared by all burst names of one session.
pub fn session_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// Writes frames as image files into one directory.
pub struct DirectorySink {
    root: PathBuf,
    jpeg_quality: u8,
}

impl DirectorySink {
    /// Open a sink over `root`, creating the directory if needed.
    pub fn create<P: AsRef<Path>>(root: P, jpeg_quality: u8) -> Result<Self, SieveError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root, jpeg_quality })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FrameSink for DirectorySink {
    fn clear(&mut self) -> Result<(), SieveError> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
        }
        fs::create_dir_all(&self.root)?;
        log::debug!("Cleared output directory {:?}", self.root);
        Ok(())
    }

    fn store(&mut self, name: &str, frame: &CameraFrame) -> Result<String, SieveError> {
        let path = self.root.join(name);
        log::info!("Saving frame {} to {:?}", frame.id, path);

        let img = image::RgbImage::from_vec(frame.width, frame.height, frame.data.clone())
            .ok_or_else(|| {
                SieveError::Export("Failed to create image from frame data".to_string())
            })?;
        let dynamic_img = image::DynamicImage::ImageRgb8(img);

        if name.to_lowercase().ends_with(".png") {
            dynamic_img.save_with_format(&path, image::ImageFormat::Png)?;
        } else {
            let mut file = File::create(&path)?;
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut file, self.jpeg_quality);
            dynamic_img.write_with_encoder(encoder)?;
        }

        Ok(path.to_string_lossy().into_owned())
    }
}
