use crate::pipeline::UploadResult;
use crate::store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported image type: {0}. Supported types: image/jpeg, image/png, image/webp")]
    UnsupportedMediaType(String),

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode {variant} variant: {reason}")]
    Encode { variant: &'static str, reason: String },

    #[error("Upload of {path} failed: {source}")]
    StoreWrite {
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("Store request failed: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("Invalid edge bound: {0}. Must be greater than zero")]
    InvalidBound(u32),

    #[error("Unknown collection: {0}. Expected one of artworks, exhibitions, series")]
    UnknownCollection(String),

    #[error("Unknown variant: {0}. Expected one of original, display, thumbnail")]
    UnknownVariant(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("No image files found in input path: {0}")]
    NoImageFilesFound(String),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),

    #[error("Invalid glob pattern: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Image worker failed: {0}")]
    Worker(String),

    #[error(
        "Batch aborted at file {index} ({file_name}) after {} successful upload(s): {source}",
        completed.len()
    )]
    BatchAborted {
        index: usize,
        file_name: String,
        completed: Vec<UploadResult>,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// True for errors raised before any store call was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, PipelineError::UnsupportedMediaType(_))
    }

    /// Results already persisted when a batch stopped early.
    pub fn completed_uploads(&self) -> &[UploadResult] {
        match self {
            PipelineError::BatchAborted { completed, .. } => completed,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
