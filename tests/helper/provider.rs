//! Provider test utilities

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::TempDir;

use mcjar::resolve::cache::DownloadStore;
use mcjar::resolve::error::ProviderError;
use mcjar::resolve::provider::Provider;
use mcjar::resolve::types::{Flavour, ResolutionOutcome};

/// Stub provider answering from a fixed table and counting calls
pub struct StubProvider {
    flavour: Flavour,
    urls: HashMap<String, String>,
    failing: Vec<String>,
    calls: Arc<AtomicUsize>,
}

impl StubProvider {
    pub fn new(flavour: Flavour) -> Self {
        Self {
            flavour,
            urls: HashMap::new(),
            failing: Vec::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_url(mut self, version: &str, url: &str) -> Self {
        self.urls.insert(version.to_string(), url.to_string());
        self
    }

    pub fn with_failure(mut self, version: &str) -> Self {
        self.failing.push(version.to_string());
        self
    }

    /// Shared counter of `resolve` calls
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl Provider for StubProvider {
    fn flavour(&self) -> Flavour {
        self.flavour
    }

    async fn resolve(&self, version: &str) -> ResolutionOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.iter().any(|v| v == version) {
            return ProviderError::InvalidResponse(format!("stub failure for {version}")).into();
        }

        match self.urls.get(version) {
            Some(url) => ResolutionOutcome::found(url),
            None => ResolutionOutcome::NotFound,
        }
    }
}

/// Provider map holding the given stubs
pub fn providers(stubs: Vec<StubProvider>) -> HashMap<Flavour, Arc<dyn Provider>> {
    stubs
        .into_iter()
        .map(|stub| (stub.flavour(), Arc::new(stub) as Arc<dyn Provider>))
        .collect()
}

/// Create a download store with pre-populated entries
pub fn create_test_store(entries: &[(Flavour, &str, &str)]) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("downloads.db");
    let store = DownloadStore::open(&db_path).unwrap();

    for (flavour, version, url) in entries {
        store.put(*flavour, version, url).unwrap();
    }

    (temp_dir, db_path)
}
