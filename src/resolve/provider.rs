//! Provider trait for resolving a version to a download URL

#[cfg(test)]
use mockall::automock;

use crate::resolve::error::ProviderError;
use crate::resolve::types::{Flavour, ResolutionOutcome};

/// Trait for walking one upstream API from a version to its server jar
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// Returns the flavour this implementation resolves
    fn flavour(&self) -> Flavour;

    /// Resolves a version string to a download URL
    ///
    /// # Arguments
    /// * `version` - The exact version as listed upstream (e.g., "1.20.1")
    ///
    /// # Returns
    /// * `Found(url)` - The whole lookup chain succeeded
    /// * `NotFound` - The version is not in the upstream listing; no further
    ///   requests were made
    /// * `UpstreamError` - A request failed or returned malformed data
    async fn resolve(&self, version: &str) -> ResolutionOutcome;
}

/// Return the first entry whose id equals `version`
pub(crate) fn find_version<'a, T, F>(entries: &'a [T], version: &str, id: F) -> Option<&'a T>
where
    F: Fn(&T) -> &str,
{
    entries.iter().find(|entry| id(entry) == version)
}

/// Reject an upstream value that cannot stand alone as one URL path segment
pub(crate) fn check_segment(what: &str, value: &str) -> Result<(), ProviderError> {
    if value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '?', '#'])
        || value.chars().any(char::is_control)
    {
        return Err(ProviderError::InvalidResponse(format!(
            "unusable {what} {value:?} in upstream response"
        )));
    }
    Ok(())
}
