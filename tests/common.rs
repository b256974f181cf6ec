#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use portfolio_images::store::{
    ListOptions, ObjectEntry, ObjectStore, PutOptions, StoreError, StoreResult, StoredObject,
};
use portfolio_images::{MemoryStore, SourceImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

/// Encode a gradient so the variants are not trivially compressible.
pub fn encode_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, format)
        .unwrap();
    buf.into_inner()
}

pub fn jpeg_source(name: &str, width: u32, height: u32) -> SourceImage {
    SourceImage::new(name, "image/jpeg", encode_image(width, height, ImageFormat::Jpeg))
}

pub fn write_image(dir: &Path, name: &str, width: u32, height: u32, format: ImageFormat) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, encode_image(width, height, format)).unwrap();
    path
}

/// Wraps a [`MemoryStore`] and fails selected operations.
pub struct FailingStore {
    pub inner: Arc<MemoryStore>,
    fail_put_containing: Option<String>,
    fail_remove: bool,
}

impl FailingStore {
    pub fn failing_put(fragment: &str) -> Self {
        Self {
            inner: Arc::new(MemoryStore::new("https://cdn.example.com")),
            fail_put_containing: Some(fragment.to_string()),
            fail_remove: false,
        }
    }

    pub fn failing_remove() -> Self {
        Self {
            inner: Arc::new(MemoryStore::new("https://cdn.example.com")),
            fail_put_containing: None,
            fail_remove: true,
        }
    }
}

#[async_trait]
impl ObjectStore for FailingStore {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: &PutOptions,
    ) -> StoreResult<StoredObject> {
        if let Some(fragment) = &self.fail_put_containing {
            if path.contains(fragment.as_str()) {
                return Err(StoreError::Backend {
                    status: 503,
                    message: "storage unavailable".to_string(),
                });
            }
        }
        self.inner.put(bucket, path, data, options).await
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.inner.public_url(bucket, path)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> StoreResult<()> {
        if self.fail_remove {
            return Err(StoreError::Backend {
                status: 500,
                message: "remove failed".to_string(),
            });
        }
        self.inner.remove(bucket, paths).await
    }

    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        options: ListOptions,
    ) -> StoreResult<Vec<ObjectEntry>> {
        self.inner.list(bucket, prefix, options).await
    }
}
