//! PurpurMC API implementation

use serde::Deserialize;
use tracing::debug;

use crate::resolve::client::UpstreamClient;
use crate::resolve::error::ProviderError;
use crate::resolve::provider::{Provider, check_segment, find_version};
use crate::resolve::providers::BuildId;
use crate::resolve::types::{Flavour, ResolutionOutcome};

/// Default base URL for the PurpurMC API
const DEFAULT_BASE_URL: &str = "https://api.purpurmc.org/v2/purpur";

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    versions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VersionResponse {
    builds: Builds,
}

#[derive(Debug, Deserialize)]
struct Builds {
    latest: BuildId,
}

/// Provider implementation for the PurpurMC API
pub struct PurpurProvider {
    client: UpstreamClient,
    base_url: String,
}

impl PurpurProvider {
    /// Creates a new PurpurProvider with a custom base URL
    pub fn new(client: UpstreamClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_client(client: UpstreamClient) -> Self {
        Self::new(client, DEFAULT_BASE_URL)
    }

    async fn walk(&self, version: &str) -> Result<Option<String>, ProviderError> {
        let project: ProjectResponse = self.client.get_json(&self.base_url).await?;
        let Some(id) = find_version(&project.versions, version, |v| v.as_str()) else {
            debug!("purpur has no version {}", version);
            return Ok(None);
        };

        let version_url = format!("{}/{}", self.base_url, id);
        let detail: VersionResponse = self.client.get_json(&version_url).await?;
        let latest = detail.builds.latest.to_string();
        check_segment("build", &latest)?;

        Ok(Some(format!("{}/{}/download", version_url, latest)))
    }
}

#[async_trait::async_trait]
impl Provider for PurpurProvider {
    fn flavour(&self) -> Flavour {
        Flavour::Purpur
    }

    async fn resolve(&self, version: &str) -> ResolutionOutcome {
        match self.walk(version).await {
            Ok(Some(url)) => ResolutionOutcome::found(&url),
            Ok(None) => ResolutionOutcome::NotFound,
            Err(e) => e.into(),
        }
    }
}
