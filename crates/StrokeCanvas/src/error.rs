//! Error types for the stroke canvas.
//!
//! Nearly every canvas operation is infallible. Errors only surface at the
//! JSON boundary, where the host hands over or asks for serialized data.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanvasError {
    /// The payload handed to a load call is not JSON at all.
    #[error("Save data is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// A configuration document could not be decoded.
    #[error("Invalid canvas configuration: {0}")]
    InvalidConfig(#[source] serde_json::Error),

    /// Serializing the current history failed.
    #[error("Failed to serialize save data: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CanvasError>;
