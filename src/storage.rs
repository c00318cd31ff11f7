//! Minimal object-storage client for export archives.
//!
//! Mirrors a bucket-style HTTP API: `PUT {base}/object/{bucket}/{path}` with
//! a bearer key and an upsert header, public URL at
//! `{base}/object/public/{bucket}/{path}`. Uploads are upserts on purpose —
//! re-running the same export overwrites the same path.
//!
//! NOTE: We never log the API key.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{info, instrument};

#[derive(Clone)]
pub struct ObjectStore {
    pub client: reqwest::Client,
    pub base_url: String,
    pub bucket: String,
    api_key: String,
}

impl ObjectStore {
    /// Construct the client if STORAGE_BASE_URL and STORAGE_API_KEY are
    /// present; otherwise return None and exports deliver inline.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("STORAGE_BASE_URL").ok()?;
        let api_key = std::env::var("STORAGE_API_KEY").ok()?;
        let bucket = std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "exports".into());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .ok()?;

        Some(Self {
            client,
            base_url,
            bucket,
            api_key,
        })
    }

    /// Upload one archive, returning its public download URL.
    #[instrument(level = "info", skip(self, bytes), fields(%path, size = bytes.len()))]
    pub async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, String> {
        let url = format!(
            "{}/object/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bucket,
            path
        );

        let resp = self
            .client
            .put(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/zip")
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await
            .map_err(|e| format!("upload request failed: {e}"))?;

        if !resp.status().is_success() {
            return Err(format!("upload rejected: HTTP {}", resp.status()));
        }

        let public_url = format!(
            "{}/object/public/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bucket,
            path
        );
        info!(target: "export", %public_url, "Object stored");
        Ok(public_url)
    }
}
