//! Error types for content import.

use thiserror::Error;

/// Errors that can occur while turning pasted or uploaded data into a node.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("no data")]
    Empty,
    #[error("not a data URL")]
    NotDataUrl,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("unsupported or corrupt image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image has zero size")]
    ZeroSize,
}
