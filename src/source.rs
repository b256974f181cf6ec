use crate::constants::FALLBACK_ORIGINAL_EXTENSION;
use crate::error::{PipelineError, Result};
use crate::formats::MediaType;
use crate::validation::{validate_input_path, validate_media_type};
use bytes::Bytes;
use std::path::Path;

/// A user-selected image: raw bytes plus the content type it was declared with.
///
/// Cloning is cheap; the bytes are reference counted.
#[derive(Debug, Clone)]
pub struct SourceImage {
    file_name: String,
    content_type: String,
    data: Bytes,
}

impl SourceImage {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk, declaring its content type from the extension.
    ///
    /// Files with an extension outside the allow-list are declared as
    /// `application/octet-stream` and will be rejected by the pipeline.
    pub async fn from_path(path: &Path) -> Result<Self> {
        validate_input_path(path)?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| PipelineError::FileNotFound(path.to_path_buf()))?;
        let content_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(MediaType::from_extension)
            .map(|media_type| media_type.content_type())
            .unwrap_or("application/octet-stream");
        let data = tokio::fs::read(path).await?;

        Ok(Self::new(file_name, content_type, data))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Declared media type, or a validation error if it is not allowed.
    pub fn media_type(&self) -> Result<MediaType> {
        validate_media_type(&self.content_type)
    }

    /// Lowercased extension of the file name, `jpg` when there is none.
    pub fn original_extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| FALLBACK_ORIGINAL_EXTENSION.to_string())
    }
}
