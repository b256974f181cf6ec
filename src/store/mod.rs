//! Object store collaborators.
//!
//! The pipeline only needs four operations from a store: write an object,
//! resolve its public URL, remove a batch of objects and list a prefix.
//! [`ObjectStore`] is that contract; three backends implement it:
//!
//! - [`MemoryStore`] keeps objects in process and records every call.
//! - [`FsStore`] writes beneath a local directory.
//! - [`RemoteStore`] talks to a hosted storage REST API.

mod fs;
mod memory;
mod remote;

pub use fs::FsStore;
pub use memory::{MemoryStore, StoreCall};
pub use remote::RemoteStore;

use crate::constants::MAX_OBJECT_KEY_LEN;
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object `{bucket}/{path}` already exists")]
    AlreadyExists { bucket: String, path: String },
    #[error("invalid object key `{0}`")]
    InvalidKey(String),
    #[error("store responded with status {status}: {message}")]
    Backend { status: u16, message: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Options for a single object write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutOptions {
    pub content_type: String,
    pub cache_control: String,
    pub upsert: bool,
}

impl PutOptions {
    /// Write-once options: an existing object is an error, not an overwrite.
    pub fn create(content_type: impl Into<String>, cache_control: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            cache_control: cache_control.into(),
            upsert: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: usize,
    pub offset: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: crate::constants::DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }
}

/// Location of a freshly written object, relative to its bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    pub path: String,
}

/// One entry returned by [`ObjectStore::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `data` at `path` inside `bucket`.
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: &PutOptions,
    ) -> StoreResult<StoredObject>;

    /// Public URL of an object. Does not check that the object exists.
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// Remove every listed path. Missing paths are not an error.
    async fn remove(&self, bucket: &str, paths: &[String]) -> StoreResult<()>;

    /// Entries directly beneath `prefix`, sorted by name.
    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        options: ListOptions,
    ) -> StoreResult<Vec<ObjectEntry>>;
}

/// Reject keys that could escape the bucket or are otherwise malformed.
pub(crate) fn ensure_key_safe(key: &str) -> StoreResult<()> {
    let bad = key.is_empty()
        || key.len() > MAX_OBJECT_KEY_LEN
        || key.starts_with('/')
        || key.split('/').any(|segment| segment == "..")
        || key
            .bytes()
            .any(|b| b.is_ascii_control() || b == b'\\' || b == b'\0');

    if bad {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}
