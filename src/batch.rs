use crate::error::{PipelineError, Result};
use crate::naming::Collection;
use crate::pipeline::{ImagePipeline, NoProgress, ProgressReporter, UploadResult};
use crate::source::SourceImage;
use crate::utils::percent;
use crate::validation::is_image_file;
use glob::glob;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

impl ImagePipeline {
    /// Upload `sources` one after another, in input order.
    ///
    /// Progress is the share of original bytes processed so far, reported
    /// after each file. The first failure stops the batch; the error carries
    /// the results of the files that were already uploaded.
    pub async fn upload_images(
        &self,
        sources: &[SourceImage],
        collection: Collection,
        progress: &dyn ProgressReporter,
    ) -> Result<Vec<UploadResult>> {
        let total_bytes: u64 = sources.iter().map(SourceImage::size).sum();
        let mut done_bytes = 0u64;
        let mut results = Vec::with_capacity(sources.len());

        info!(files = sources.len(), total_bytes, %collection, "starting batch upload");

        for (index, source) in sources.iter().enumerate() {
            match self
                .upload_single_image(source, collection, &NoProgress)
                .await
            {
                Ok(result) => {
                    done_bytes += source.size();
                    results.push(result);
                    progress.report(percent(done_bytes, total_bytes));
                }
                Err(e) => {
                    warn!(
                        index,
                        file = source.file_name(),
                        error = %e,
                        completed = results.len(),
                        "batch upload aborted"
                    );
                    return Err(PipelineError::BatchAborted {
                        index,
                        file_name: source.file_name().to_string(),
                        completed: results,
                        source: Box::new(e),
                    });
                }
            }
        }

        Ok(results)
    }
}

/// Expand a file, directory or glob pattern into the image files it names.
///
/// Directories are scanned one level deep unless `recursive` is set. The
/// result is sorted so batches upload in a stable order.
pub fn collect_image_files(input: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut image_files = Vec::new();
    let input_path = Path::new(input);

    if input_path.is_file() {
        // An explicitly named file is passed through; the pipeline decides
        // whether its declared type is acceptable.
        image_files.push(input_path.to_path_buf());
    } else if input_path.is_dir() {
        let walker = if recursive {
            WalkDir::new(input_path)
        } else {
            WalkDir::new(input_path).max_depth(1)
        };

        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() && is_image_file(entry.path()) {
                image_files.push(entry.path().to_path_buf());
            }
        }
    } else {
        for entry in glob(input)? {
            match entry {
                Ok(path) if path.is_file() && is_image_file(&path) => image_files.push(path),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "skipping unreadable glob match"),
            }
        }
    }

    image_files.sort();
    image_files.dedup();
    Ok(image_files)
}

/// Collect images from several inputs, failing if none are found.
pub fn collect_all_image_files(inputs: &[String], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        files.extend(collect_image_files(input, recursive)?);
    }

    if files.is_empty() {
        return Err(PipelineError::NoImageFilesFound(inputs.join(", ")));
    }
    Ok(files)
}
