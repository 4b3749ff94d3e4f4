//! Remote repository manifest access.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use shelf_storage::ExtensionRepo;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, Result};
use crate::repo_url::manifest_url;

/// Source of repository manifests.
#[async_trait]
pub trait RepoApi: Send + Sync {
    /// Fetch `{base_url}/repo.json` and build the repository it describes.
    async fn fetch_repo_details(&self, base_url: &str) -> Result<ExtensionRepo>;
}

/// HTTP client settings for [`ReqwestRepoApi`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("shelf/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// `repo.json` document. Only `meta` is read.
#[derive(Debug, Deserialize)]
struct RepoManifest {
    meta: RepoMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepoMeta {
    name: String,
    short_name: Option<String>,
    website: String,
    signing_key_fingerprint: String,
}

/// Parse a manifest body into the repository rooted at `base_url`.
///
/// Any missing required field rejects the whole manifest.
pub fn parse_repo_manifest(base_url: &str, body: &[u8]) -> Result<ExtensionRepo> {
    let manifest: RepoManifest = serde_json::from_slice(body)?;
    let meta = manifest.meta;

    Ok(ExtensionRepo {
        base_url: base_url.to_string(),
        name: meta.name,
        short_name: meta.short_name,
        website: meta.website,
        fingerprint: meta.signing_key_fingerprint,
    })
}

pub struct ReqwestRepoApi {
    client: reqwest::Client,
}

impl ReqwestRepoApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RepoApi for ReqwestRepoApi {
    async fn fetch_repo_details(&self, base_url: &str) -> Result<ExtensionRepo> {
        let url = Url::parse(&manifest_url(base_url))?;
        debug!("Fetching repository manifest {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::ResponseError {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        parse_repo_manifest(base_url, &body)
    }
}
