//! nokhwa-backed capture source.
//!
//! The pipeline is single-threaded and pulls frames, so the camera is a
//! plain blocking wrapper: `poll_frame` paces the live loop at whatever
//! rate the device delivers. Only compiled with the `camera` feature;
//! everything else in the crate runs against scripted sources.

use crate::config::CaptureConfig;
use crate::errors::SieveError;
use crate::session::FrameSource;
use crate::types::CameraFrame;
use nokhwa::{
    pixel_format::RgbFormat,
    query,
    utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType},
    CallbackCamera,
};
use serde::Serialize;

/// One capture device visible to the native backend.
#[derive(Debug, Clone, Serialize)]
pub struct CameraDevice {
    pub index: String,
    pub name: String,
    pub description: String,
}

/// List capture devices through the platform's native backend.
pub fn list_devices() -> Result<Vec<CameraDevice>, SieveError> {
    let cameras = query(ApiBackend::Auto)
        .map_err(|e| SieveError::Capture(format!("Failed to query cameras: {}", e)))?;

    Ok(cameras
        .into_iter()
        .map(|info| CameraDevice {
            index: info.index().to_string(),
            name: info.human_name(),
            description: info.description().to_string(),
        })
        .collect())
}

/// A live camera behind the [`FrameSource`] seam.
pub struct NokhwaCamera {
    camera: CallbackCamera,
    device_id: String,
    sequence: u64,
}

impl NokhwaCamera {
    /// Open the configured device and start its stream.
    pub fn open(capture: &CaptureConfig) -> Result<Self, SieveError> {
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            nokhwa::utils::CameraFormat::new(
                nokhwa::utils::Resolution::new(capture.resolution[0], capture.resolution[1]),
                nokhwa::utils::FrameFormat::MJPEG,
                capture.fps,
            ),
        ));

        let mut camera = CallbackCamera::new(
            CameraIndex::Index(capture.device_index),
            requested,
            |_| {},
        )
        .map_err(|e| {
            SieveError::Capture(format!(
                "Failed to initialize camera {}: {}",
                capture.device_index, e
            ))
        })?;

        camera
            .open_stream()
            .map_err(|e| SieveError::Capture(format!("Failed to start stream: {}", e)))?;

        log::info!("Camera {} opened", capture.device_index);
        Ok(Self {
            camera,
            device_id: capture.device_index.to_string(),
            sequence: 0,
        })
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn is_open(&self) -> bool {
        self.camera.is_stream_open()
    }

    pub fn stop(&mut self) -> Result<(), SieveError> {
        self.camera
            .stop_stream()
            .map_err(|e| SieveError::Capture(format!("Failed to stop stream: {}", e)))
    }

    /// Normalize one delivered buffer into an RGB8 frame.
    ///
    /// Backends hand back MJPEG even when RGB was requested, so the
    /// buffer is sniffed and decoded when needed. Anything that is
    /// neither JPEG nor a full RGB8 plane is a capture error.
    fn convert(&mut self, buffer: nokhwa::Buffer) -> Result<CameraFrame, SieveError> {
        let raw = buffer.buffer_bytes();

        let (data, width, height) =
            if raw.len() >= 3 && raw[0] == 0xFF && raw[1] == 0xD8 && raw[2] == 0xFF {
                let rgb = image::load_from_memory(&raw)
                    .map_err(|e| {
                        SieveError::Capture(format!("Failed to decode MJPEG frame: {}", e))
                    })?
                    .to_rgb8();
                let (width, height) = rgb.dimensions();
                (rgb.into_raw(), width, height)
            } else {
                let width = buffer.resolution().width_x;
                let height = buffer.resolution().height_y;
                if raw.len() != (width as usize) * (height as usize) * 3 {
                    return Err(SieveError::Capture(format!(
                        "Unexpected frame layout: {} bytes for {}x{}",
                        raw.len(),
                        width,
                        height
                    )));
                }
                (raw.to_vec(), width, height)
            };

        self.sequence += 1;
        Ok(
            CameraFrame::new(data, width, height, self.device_id.clone())
                .with_sequence(self.sequence),
        )
    }
}

impl FrameSource for NokhwaCamera {
    /// A camera stream has no natural end; this blocks for the next
    /// frame and only ever returns `Some` or an error.
    fn next_frame(&mut self) -> Result<Option<CameraFrame>, SieveError> {
        let buffer = self
            .camera
            .poll_frame()
            .map_err(|e| SieveError::Capture(format!("Failed to capture frame: {}", e)))?;
        self.convert(buffer).map(Some)
    }
}

impl Drop for NokhwaCamera {
    fn drop(&mut self) {
        let _ = self.camera.stop_stream();
    }
}
