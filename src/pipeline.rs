//! The multi-variant image upload pipeline.
//!
//! One call to [`ImagePipeline::upload_single_image`] turns a source image
//! into three stored objects sharing a base identifier:
//!
//! 1. validate the declared media type (no store call on failure)
//! 2. decode and derive `display` / `thumbnail` in memory
//! 3. upload `original`, `display`, `thumbnail` in that order, write-once
//! 4. resolve the public URLs and report 100% progress
//!
//! Store failures abort the call and are not rolled back.

use crate::config::PipelineOptions;
use crate::constants::VARIANT_CONTENT_TYPE;
use crate::error::{PipelineError, Result};
use crate::naming::{delete_candidates, generate_base_id, Collection, VariantKind};
use crate::processing::{derive_variants, DerivedVariants};
use crate::source::SourceImage;
use crate::store::{ListOptions, ObjectEntry, ObjectStore, PutOptions};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Public URLs of the three stored variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantUrls {
    pub original: String,
    pub display: String,
    pub thumbnail: String,
}

/// What callers persist on the parent record after an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub urls: VariantUrls,
    /// The shared base identifier
    pub file_name: String,
    /// Byte size of the original file
    pub size: u64,
}

/// Receives progress as a whole percentage.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, percent: u8);
}

impl<F> ProgressReporter for F
where
    F: Fn(u8) + Send + Sync,
{
    fn report(&self, percent: u8) {
        self(percent)
    }
}

/// Discards progress.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _percent: u8) {}
}

#[derive(Clone)]
pub struct ImagePipeline {
    store: Arc<dyn ObjectStore>,
    options: PipelineOptions,
}

impl ImagePipeline {
    pub fn new(store: Arc<dyn ObjectStore>, options: PipelineOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Upload one image as original, display and thumbnail variants.
    pub async fn upload_single_image(
        &self,
        source: &SourceImage,
        collection: Collection,
        progress: &dyn ProgressReporter,
    ) -> Result<UploadResult> {
        let media_type = source.media_type()?;
        let base_id = generate_base_id();
        let bucket = collection.bucket();

        info!(
            file = source.file_name(),
            %media_type,
            size = source.size(),
            %collection,
            base_id = %base_id,
            "uploading image"
        );

        let variants = self.derive(source.data().clone()).await?;
        debug!(
            width = variants.source_width,
            height = variants.source_height,
            display = ?(variants.display.width, variants.display.height),
            thumbnail = ?(variants.thumbnail.width, variants.thumbnail.height),
            "derived variants"
        );

        let original_path = VariantKind::Original.path(&base_id, &source.original_extension());
        let display_path = VariantKind::Display.path(&base_id, "");
        let thumbnail_path = VariantKind::Thumbnail.path(&base_id, "");

        self.write(bucket, &original_path, source.data().clone(), source.content_type())
            .await?;
        self.write(bucket, &display_path, variants.display.data, VARIANT_CONTENT_TYPE)
            .await?;
        self.write(bucket, &thumbnail_path, variants.thumbnail.data, VARIANT_CONTENT_TYPE)
            .await?;

        let result = UploadResult {
            urls: VariantUrls {
                original: self.store.public_url(bucket, &original_path),
                display: self.store.public_url(bucket, &display_path),
                thumbnail: self.store.public_url(bucket, &thumbnail_path),
            },
            file_name: base_id,
            size: source.size(),
        };

        progress.report(100);
        info!(base_id = %result.file_name, "upload complete");
        Ok(result)
    }

    /// Best-effort removal of every variant stored under `base_id`.
    ///
    /// Store errors are logged and swallowed.
    pub async fn delete_images(&self, collection: Collection, base_id: &str) {
        let paths = delete_candidates(base_id);
        debug!(%collection, base_id, candidates = paths.len(), "deleting image set");

        if let Err(e) = self.store.remove(collection.bucket(), &paths).await {
            warn!(%collection, base_id, error = %e, "failed to delete image set");
        }
    }

    /// Entries stored under one variant prefix of a collection.
    pub async fn list_images(
        &self,
        collection: Collection,
        variant: VariantKind,
        options: ListOptions,
    ) -> Result<Vec<ObjectEntry>> {
        Ok(self
            .store
            .list(collection.bucket(), variant.prefix(), options)
            .await?)
    }

    async fn derive(&self, data: Bytes) -> Result<DerivedVariants> {
        let options = self.options.clone();
        tokio::task::spawn_blocking(move || derive_variants(&data, &options))
            .await
            .map_err(|e| PipelineError::Worker(e.to_string()))?
    }

    async fn write(&self, bucket: &str, path: &str, data: Bytes, content_type: &str) -> Result<()> {
        let options = PutOptions::create(content_type, self.options.cache_control.clone());
        self.store
            .put(bucket, path, data, &options)
            .await
            .map_err(|source| PipelineError::StoreWrite {
                path: format!("{}/{}", bucket, path),
                source,
            })?;
        debug!(bucket, path, content_type, "stored variant");
        Ok(())
    }
}
