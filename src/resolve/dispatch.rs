//! Resolver dispatch
//!
//! Routes a query either to the provider for its flavour (live mode) or to the
//! download store (cached mode). The two modes are exclusive: a cache miss is
//! reported as `NotFound` and never falls back to a live lookup.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::resolve::cache::CacheLookup;
use crate::resolve::client::UpstreamClient;
use crate::resolve::provider::Provider;
use crate::resolve::providers::{PaperProvider, PurpurProvider, VanillaProvider};
use crate::resolve::types::{Flavour, ResolutionOutcome, VersionQuery};

/// Operating mode of the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Walk the upstream APIs on every request
    #[default]
    Live,
    /// Answer from the pre-populated download store only
    Cached,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Live => "live",
            Mode::Cached => "cached",
        }
    }
}

enum Backend {
    Live(HashMap<Flavour, Arc<dyn Provider>>),
    Cached(CacheLookup),
}

/// Dispatches queries to a provider or to the cache
pub struct Resolver {
    backend: Backend,
}

impl Resolver {
    /// Resolve through the given providers
    pub fn live(providers: HashMap<Flavour, Arc<dyn Provider>>) -> Self {
        Self {
            backend: Backend::Live(providers),
        }
    }

    /// Resolve through the download store only
    pub fn cached(cache: CacheLookup) -> Self {
        Self {
            backend: Backend::Cached(cache),
        }
    }

    pub fn mode(&self) -> Mode {
        match self.backend {
            Backend::Live(_) => Mode::Live,
            Backend::Cached(_) => Mode::Cached,
        }
    }

    /// Resolve a validated query
    pub async fn dispatch(&self, query: &VersionQuery) -> ResolutionOutcome {
        let VersionQuery { flavour, version } = query;
        let flavour = *flavour;

        let outcome = match &self.backend {
            Backend::Live(providers) => match providers.get(&flavour) {
                Some(provider) => provider.resolve(version).await,
                None => {
                    debug!("No provider registered for {}", flavour);
                    ResolutionOutcome::NotFound
                }
            },
            Backend::Cached(cache) => cache.lookup(flavour, version).await,
        };

        match &outcome {
            ResolutionOutcome::Found(url) => {
                info!("Resolved {}/{} -> {}", flavour, version, url)
            }
            ResolutionOutcome::NotFound => debug!("{}/{} not found", flavour, version),
            ResolutionOutcome::UpstreamError(e) => {
                error!(
                    "Failed to resolve {}/{} ({} mode): {}",
                    flavour,
                    version,
                    self.mode().as_str(),
                    e
                )
            }
        }

        outcome
    }
}

/// Create the default set of providers for all supported flavours
pub fn create_default_providers(client: &UpstreamClient) -> HashMap<Flavour, Arc<dyn Provider>> {
    let mut providers: HashMap<Flavour, Arc<dyn Provider>> = HashMap::new();
    providers.insert(
        Flavour::Paper,
        Arc::new(PaperProvider::with_client(client.clone())),
    );
    providers.insert(
        Flavour::Vanilla,
        Arc::new(VanillaProvider::with_client(client.clone())),
    );
    providers.insert(
        Flavour::Purpur,
        Arc::new(PurpurProvider::with_client(client.clone())),
    );
    providers
}
