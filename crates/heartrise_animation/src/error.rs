//! Animation error types

use thiserror::Error;

/// Errors surfaced by the heart emitter
#[derive(Error, Debug)]
pub enum HeartError {
    /// `spawn()` was called before `configure()`
    #[error("Heart emitter not configured: call configure() before spawning")]
    NotConfigured,

    /// A configuration value is out of range
    #[error("Invalid heart configuration: {0}")]
    InvalidConfig(String),

    /// The asset table is empty
    #[error("At least one heart image is required")]
    NoImages,

    /// An image could not be read or decoded
    #[error("Failed to load heart image {path}: {source}")]
    ImageLoad {
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// Reconfiguration was attempted while hearts are in flight
    #[error("Cannot reconfigure while the animation is running")]
    AnimationActive,
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, HeartError>;
