use crate::constants::SUPPORTED_IMAGE_EXTENSIONS;
use crate::error::{PipelineError, Result};
use crate::formats::MediaType;
use std::path::Path;

/// Validate that an input path exists and is a regular file
pub fn validate_input_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(PipelineError::FileNotFound(path.to_path_buf()));
    }

    if !path.is_file() {
        return Err(PipelineError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} is not a file", path.display()),
        )));
    }

    Ok(())
}

/// Check a declared content type against the upload allow-list
pub fn validate_media_type(content_type: &str) -> Result<MediaType> {
    MediaType::from_content_type(content_type)
}

/// Check if the file extension is one the pipeline accepts
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
