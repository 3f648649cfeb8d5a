//! PaperMC downloads API implementation

use serde::Deserialize;
use tracing::debug;

use crate::resolve::client::UpstreamClient;
use crate::resolve::error::ProviderError;
use crate::resolve::provider::{Provider, check_segment, find_version};
use crate::resolve::providers::BuildId;
use crate::resolve::types::{Flavour, ResolutionOutcome};

/// Default base URL for the PaperMC API
const DEFAULT_BASE_URL: &str = "https://papermc.io/api/v2/projects/paper";

/// Response from the project root
#[derive(Debug, Deserialize)]
struct ProjectResponse {
    versions: Vec<String>,
}

/// Response from `versions/{version}`, builds ordered oldest first
#[derive(Debug, Deserialize)]
struct VersionResponse {
    builds: Vec<BuildId>,
}

/// Response from `versions/{version}/builds/{build}`
#[derive(Debug, Deserialize)]
struct BuildResponse {
    downloads: Downloads,
}

#[derive(Debug, Deserialize)]
struct Downloads {
    application: Application,
}

#[derive(Debug, Deserialize)]
struct Application {
    name: String,
}

/// Provider implementation for the PaperMC API
pub struct PaperProvider {
    client: UpstreamClient,
    base_url: String,
}

impl PaperProvider {
    /// Creates a new PaperProvider with a custom base URL
    pub fn new(client: UpstreamClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_client(client: UpstreamClient) -> Self {
        Self::new(client, DEFAULT_BASE_URL)
    }

    async fn latest_build(&self, version_url: &str) -> Result<BuildId, ProviderError> {
        let mut version: VersionResponse = self.client.get_json(version_url).await?;
        let build = version
            .builds
            .pop()
            .ok_or_else(|| ProviderError::InvalidResponse(format!("{version_url}: no builds")))?;
        check_segment("build", &build.to_string())?;
        Ok(build)
    }

    async fn jar_name(&self, build_url: &str) -> Result<String, ProviderError> {
        let build: BuildResponse = self.client.get_json(build_url).await?;
        let name = build.downloads.application.name;
        check_segment("jar name", &name)?;
        Ok(name)
    }

    async fn walk(&self, version: &str) -> Result<Option<String>, ProviderError> {
        let project: ProjectResponse = self.client.get_json(&self.base_url).await?;
        let Some(id) = find_version(&project.versions, version, |v| v.as_str()) else {
            debug!("paper has no version {}", version);
            return Ok(None);
        };

        let version_url = format!("{}/versions/{}", self.base_url, id);
        let build = self.latest_build(&version_url).await?;

        let build_url = format!("{}/builds/{}", version_url, build);
        let jar = self.jar_name(&build_url).await?;

        Ok(Some(format!("{}/downloads/{}", build_url, jar)))
    }
}

#[async_trait::async_trait]
impl Provider for PaperProvider {
    fn flavour(&self) -> Flavour {
        Flavour::Paper
    }

    async fn resolve(&self, version: &str) -> ResolutionOutcome {
        match self.walk(version).await {
            Ok(Some(url)) => ResolutionOutcome::found(&url),
            Ok(None) => ResolutionOutcome::NotFound,
            Err(e) => e.into(),
        }
    }
}
