//! Error types surfaced by the analysis core and its collaborators.

use thiserror::Error;

/// Failure of a pixel-level analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Strict comparison was requested for rasters of different sizes.
    #[error("dimension mismatch: {}x{} vs {}x{}", .left.0, .left.1, .right.0, .right.1)]
    DimensionMismatch { left: (u32, u32), right: (u32, u32) },
}

/// Failure reported by the image decoder, propagated unchanged.
#[derive(Debug, Error)]
#[error("failed to decode image: {0}")]
pub struct DecodeError(#[from] pub image::ImageError);

/// Failure while reading metadata through the external tool.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to stage image in temporary file: {0}")]
    TempFile(#[source] std::io::Error),

    #[error("failed to run metadata tool `{tool}`: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("metadata tool exited with status {status}: {stderr}")]
    ToolFailed { status: i32, stderr: String },

    #[error("unparseable metadata tool output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("metadata tool returned no records")]
    Empty,
}

/// Failure while obtaining response bytes for a request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to read fixture {}: {source}", .path.display())]
    Fixture {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request handler failed with status {status}")]
    Status { status: i32 },
}
