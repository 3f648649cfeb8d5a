//! Mojang launcher meta implementation

use serde::Deserialize;
use tracing::debug;

use crate::resolve::client::UpstreamClient;
use crate::resolve::error::ProviderError;
use crate::resolve::provider::{Provider, find_version};
use crate::resolve::types::{Flavour, ResolutionOutcome};

/// Default URL of the launcher version manifest
const DEFAULT_MANIFEST_URL: &str = "https://launchermeta.mojang.com/mc/game/version_manifest.json";

/// Top-level version manifest
#[derive(Debug, Deserialize)]
struct VersionManifest {
    versions: Vec<VersionEntry>,
}

/// One release or snapshot in the manifest
#[derive(Debug, Deserialize)]
struct VersionEntry {
    id: String,
    /// Per-version manifest document
    url: String,
}

/// Per-version manifest, only the parts we read
#[derive(Debug, Deserialize)]
struct VersionDocument {
    downloads: VersionDownloads,
}

#[derive(Debug, Deserialize)]
struct VersionDownloads {
    // Releases before 1.2.5 ship no server jar
    server: Option<Download>,
}

#[derive(Debug, Deserialize)]
struct Download {
    url: String,
}

/// Provider implementation for Mojang's official server jars
pub struct VanillaProvider {
    client: UpstreamClient,
    manifest_url: String,
}

impl VanillaProvider {
    /// Creates a new VanillaProvider reading a custom manifest URL
    pub fn new(client: UpstreamClient, manifest_url: &str) -> Self {
        Self {
            client,
            manifest_url: manifest_url.to_string(),
        }
    }

    pub fn with_client(client: UpstreamClient) -> Self {
        Self::new(client, DEFAULT_MANIFEST_URL)
    }

    async fn walk(&self, version: &str) -> Result<Option<String>, ProviderError> {
        let manifest: VersionManifest = self.client.get_json(&self.manifest_url).await?;
        let Some(entry) = find_version(&manifest.versions, version, |e| e.id.as_str()) else {
            debug!("vanilla has no version {}", version);
            return Ok(None);
        };

        let document: VersionDocument = self.client.get_json(&entry.url).await?;
        let server = document.downloads.server.ok_or_else(|| {
            ProviderError::InvalidResponse(format!("{}: no server download", entry.url))
        })?;

        Ok(Some(server.url))
    }
}

#[async_trait::async_trait]
impl Provider for VanillaProvider {
    fn flavour(&self) -> Flavour {
        Flavour::Vanilla
    }

    async fn resolve(&self, version: &str) -> ResolutionOutcome {
        match self.walk(version).await {
            Ok(Some(url)) => ResolutionOutcome::found(&url),
            Ok(None) => ResolutionOutcome::NotFound,
            Err(e) => e.into(),
        }
    }
}
