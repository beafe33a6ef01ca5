use crate::config::StorageConfig;
use anyhow::{Context, Result};
use tracing::info;

/// Location of an uploaded object
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Public URL of the object
    pub url: String,
    /// Object key within the bucket
    pub key: String,
}

/// Client for the object store's HTTP PUT contract.
pub struct StorageClient {
    endpoint: String,
    bucket: String,
    access_key: String,
    secret_key: String,
    key_prefix: String,
    http: reqwest::Client,
}

impl StorageClient {
    pub fn new(config: &StorageConfig) -> Self {
        info!(
            "Object store at {} (bucket {}, region {})",
            config.endpoint, config.bucket, config.region
        );

        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
            key_prefix: config.key_prefix.clone(),
            http: reqwest::Client::new(),
        }
    }

    /// Upload one answer video.
    ///
    /// Keys carry a millisecond timestamp plus the question index so
    /// repeated uploads of the same question never collide.
    pub async fn put_video(
        &self,
        question_index: usize,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredObject> {
        let key = format!(
            "{}/video/{}_question_{}_{}",
            self.key_prefix,
            chrono::Utc::now().timestamp_millis(),
            question_index,
            filename
        );

        let url = format!("{}/{}/{}", self.endpoint, self.bucket, key);

        info!("Uploading {} bytes to {}", bytes.len(), url);

        let response = self
            .http
            .put(&url)
            .basic_auth(&self.access_key, Some(&self.secret_key))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .context("Failed to upload video to object store")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Object store rejected upload with status {}",
                response.status()
            );
        }

        Ok(StoredObject { url, key })
    }
}
