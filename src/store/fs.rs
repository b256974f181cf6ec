//! Directory-backed store: objects live at `root/<bucket>/<path>`.

use super::{
    ensure_key_safe, ListOptions, ObjectEntry, ObjectStore, PutOptions, StoreError, StoreResult,
    StoredObject,
};
use crate::utils::join_url;
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
    public_base: String,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn object_path(&self, bucket: &str, path: &str) -> StoreResult<PathBuf> {
        ensure_key_safe(bucket)?;
        ensure_key_safe(path)?;
        Ok(self.root.join(bucket).join(path))
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: &PutOptions,
    ) -> StoreResult<StoredObject> {
        let target = self.object_path(bucket, path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut open = OpenOptions::new();
        open.write(true);
        if options.upsert {
            open.create(true).truncate(true);
        } else {
            open.create_new(true);
        }

        let mut file = match open.open(&target).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists {
                    bucket: bucket.to_string(),
                    path: path.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(&data).await?;
        file.flush().await?;

        debug!(path = %target.display(), bytes = data.len(), "wrote object");
        Ok(StoredObject {
            path: path.to_string(),
        })
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        join_url(&self.public_base, &[bucket, path])
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> StoreResult<()> {
        let mut first_error: Option<StoreError> = None;

        for path in paths {
            let target = match self.object_path(bucket, path) {
                Ok(target) => target,
                Err(e) => {
                    warn!(bucket, path = %path, error = %e, "skipping invalid key");
                    first_error.get_or_insert(e);
                    continue;
                }
            };
            match fs::remove_file(&target).await {
                Ok(()) => debug!(path = %target.display(), "removed object"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %target.display(), error = %e, "failed to remove object");
                    first_error.get_or_insert(e.into());
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        options: ListOptions,
    ) -> StoreResult<Vec<ObjectEntry>> {
        ensure_key_safe(bucket)?;
        let prefix = prefix.trim_matches('/');
        let dir = if prefix.is_empty() {
            self.root.join(bucket)
        } else {
            ensure_key_safe(prefix)?;
            self.root.join(bucket).join(prefix)
        };

        let mut read_dir = match fs::read_dir(&dir).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            entries.push(ObjectEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: Some(metadata.len()),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(entries
            .into_iter()
            .skip(options.offset)
            .take(options.limit)
            .collect())
    }
}
