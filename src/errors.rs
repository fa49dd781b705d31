use std::fmt;

/// Crate-level error type for capture, detection and export failures.
#[derive(Debug)]
pub enum SieveError {
    /// Frame source failed to deliver a frame. Fatal to a live session.
    Capture(String),
    /// A stored frame could not be decoded into a usable image.
    Decode(String),
    /// The landmark detector backend failed (distinct from "no hands").
    Detector(String),
    /// The persistence collaborator rejected a frame.
    Export(String),
    /// Invalid configuration value.
    Config(String),
    Io(std::io::Error),
    Image(image::ImageError),
}

impl fmt::Display for SieveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SieveError::Capture(msg) => write!(f, "Capture error: {}", msg),
            SieveError::Decode(msg) => write!(f, "Decode error: {}", msg),
            SieveError::Detector(msg) => write!(f, "Detector error: {}", msg),
            SieveError::Export(msg) => write!(f, "Export error: {}", msg),
            SieveError::Config(msg) => write!(f, "Configuration error: {}", msg),
            SieveError::Io(err) => write!(f, "IO error: {}", err),
            SieveError::Image(err) => write!(f, "Image error: {}", err),
        }
    }
}

impl std::error::Error for SieveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SieveError::Io(err) => Some(err),
            SieveError::Image(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SieveError {
    fn from(err: std::io::Error) -> Self {
        SieveError::Io(err)
    }
}

impl From<image::ImageError> for SieveError {
    fn from(err: image::ImageError) -> Self {
        SieveError::Image(err)
    }
}
