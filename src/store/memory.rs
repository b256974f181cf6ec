use super::{
    ensure_key_safe, ListOptions, ObjectEntry, ObjectStore, PutOptions, StoreError, StoreResult,
    StoredObject,
};
use crate::utils::join_url;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// A call made against a [`MemoryStore`], in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Put {
        bucket: String,
        path: String,
        content_type: String,
        upsert: bool,
    },
    Remove {
        bucket: String,
        paths: Vec<String>,
    },
    List {
        bucket: String,
        prefix: String,
    },
}

#[derive(Debug, Clone)]
struct MemoryObject {
    data: Bytes,
    content_type: String,
}

#[derive(Default)]
struct Inner {
    objects: BTreeMap<String, MemoryObject>,
    calls: Vec<StoreCall>,
}

/// In-process object store.
///
/// Objects are keyed by `bucket/path`. Every call is recorded, which makes
/// this the store of choice for tests and `--store memory` dry runs.
pub struct MemoryStore {
    public_base: String,
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            public_base: public_base.into(),
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Poisoning is ignored: no critical section leaves the map half-updated
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Number of `put` calls seen so far, including failed ones.
    pub fn put_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| matches!(call, StoreCall::Put { .. }))
            .count()
    }

    pub fn get(&self, bucket: &str, path: &str) -> Option<Bytes> {
        self.lock()
            .objects
            .get(&format!("{}/{}", bucket, path))
            .map(|object| object.data.clone())
    }

    pub fn content_type(&self, bucket: &str, path: &str) -> Option<String> {
        self.lock()
            .objects
            .get(&format!("{}/{}", bucket, path))
            .map(|object| object.content_type.clone())
    }

    /// Every stored key as `bucket/path`, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.lock().objects.keys().cloned().collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_PUBLIC_URL)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: &PutOptions,
    ) -> StoreResult<StoredObject> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Put {
            bucket: bucket.to_string(),
            path: path.to_string(),
            content_type: options.content_type.clone(),
            upsert: options.upsert,
        });

        ensure_key_safe(bucket)?;
        ensure_key_safe(path)?;

        let key = format!("{}/{}", bucket, path);
        if !options.upsert && inner.objects.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                bucket: bucket.to_string(),
                path: path.to_string(),
            });
        }

        inner.objects.insert(
            key,
            MemoryObject {
                data,
                content_type: options.content_type.clone(),
            },
        );

        Ok(StoredObject {
            path: path.to_string(),
        })
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        join_url(&self.public_base, &[bucket, path])
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Remove {
            bucket: bucket.to_string(),
            paths: paths.to_vec(),
        });

        for path in paths {
            inner.objects.remove(&format!("{}/{}", bucket, path));
        }
        Ok(())
    }

    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        options: ListOptions,
    ) -> StoreResult<Vec<ObjectEntry>> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::List {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
        });

        let prefix = prefix.trim_matches('/');
        let dir = if prefix.is_empty() {
            format!("{}/", bucket)
        } else {
            format!("{}/{}/", bucket, prefix)
        };
        let entries = inner
            .objects
            .iter()
            .filter_map(|(key, object)| {
                let name = key.strip_prefix(&dir)?;
                (!name.contains('/')).then(|| ObjectEntry {
                    name: name.to_string(),
                    size: Some(object.data.len() as u64),
                })
            })
            .skip(options.offset)
            .take(options.limit)
            .collect();

        Ok(entries)
    }
}
