//! Hosted storage REST API client (Supabase Storage compatible).
//!
//! | Operation | Request |
//! |---|---|
//! | put | `POST {base}/storage/v1/object/{bucket}/{path}` |
//! | remove | `DELETE {base}/storage/v1/object/{bucket}` with `{"prefixes": [...]}` |
//! | list | `POST {base}/storage/v1/object/list/{bucket}` |
//! | public URL | `{base}/storage/v1/object/public/{bucket}/{path}` |

use super::{
    ensure_key_safe, ListOptions, ObjectEntry, ObjectStore, PutOptions, StoreError, StoreResult,
    StoredObject,
};
use crate::utils::join_url;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

const OBJECT_ROUTE: &str = "storage/v1/object";
const PUBLIC_ROUTE: &str = "storage/v1/object/public";
const LIST_ROUTE: &str = "storage/v1/object/list";

/// Client for a hosted object store.
///
/// Credentials are handed in at construction time; nothing is read from
/// the environment here.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct RemoveBody<'a> {
    prefixes: &'a [String],
}

#[derive(Debug, Serialize)]
struct SortBy {
    column: &'static str,
    order: &'static str,
}

#[derive(Debug, Serialize)]
struct ListBody<'a> {
    prefix: &'a str,
    limit: usize,
    offset: usize,
    #[serde(rename = "sortBy")]
    sort_by: SortBy,
}

#[derive(Debug, Deserialize)]
struct ListedObject {
    name: String,
    #[serde(default)]
    metadata: Option<ListedMetadata>,
}

#[derive(Debug, Deserialize)]
struct ListedMetadata {
    #[serde(default)]
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, api_key)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("apikey", &self.api_key)
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        join_url(&self.base_url, &[OBJECT_ROUTE, bucket, path])
    }

    fn cache_control_header(value: &str) -> String {
        if value.chars().all(|c| c.is_ascii_digit()) {
            format!("max-age={}", value)
        } else {
            value.to_string()
        }
    }
}

/// Turn a non-success response into a [`StoreError`].
async fn check(response: Response, bucket: &str, path: &str) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.message.or(body.error))
        .unwrap_or(text);

    if status == StatusCode::CONFLICT || message.contains("already exists") {
        return Err(StoreError::AlreadyExists {
            bucket: bucket.to_string(),
            path: path.to_string(),
        });
    }

    Err(StoreError::Backend {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ObjectStore for RemoteStore {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: &PutOptions,
    ) -> StoreResult<StoredObject> {
        ensure_key_safe(bucket)?;
        ensure_key_safe(path)?;

        let url = self.object_url(bucket, path);
        debug!(%url, bytes = data.len(), "uploading object");

        let request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, &options.content_type)
            .header(CACHE_CONTROL, Self::cache_control_header(&options.cache_control))
            .header("x-upsert", options.upsert.to_string())
            .body(data);
        let response = self.authorized(request).send().await?;
        check(response, bucket, path).await?;

        Ok(StoredObject {
            path: path.to_string(),
        })
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        join_url(&self.base_url, &[PUBLIC_ROUTE, bucket, path])
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> StoreResult<()> {
        ensure_key_safe(bucket)?;
        if paths.is_empty() {
            return Ok(());
        }

        let url = join_url(&self.base_url, &[OBJECT_ROUTE, bucket]);
        let request = self.client.delete(&url).json(&RemoveBody { prefixes: paths });
        let response = self.authorized(request).send().await?;
        check(response, bucket, "").await?;
        Ok(())
    }

    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        options: ListOptions,
    ) -> StoreResult<Vec<ObjectEntry>> {
        ensure_key_safe(bucket)?;

        let url = join_url(&self.base_url, &[LIST_ROUTE, bucket]);
        let body = ListBody {
            prefix: prefix.trim_matches('/'),
            limit: options.limit,
            offset: options.offset,
            sort_by: SortBy {
                column: "name",
                order: "asc",
            },
        };
        let response = self
            .authorized(self.client.post(&url).json(&body))
            .send()
            .await?;
        let listed: Vec<ListedObject> = check(response, bucket, prefix).await?.json().await?;

        Ok(listed
            .into_iter()
            .map(|object| ObjectEntry {
                name: object.name,
                size: object.metadata.and_then(|m| m.size),
            })
            .collect())
    }
}
