//! Common types for resolution

use url::Url;

use crate::resolve::error::{ProviderError, ResolveError, StoreError};

/// Maximum length of a version string accepted in a query
pub const MAX_VERSION_LEN: usize = 7;

/// Server software family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavour {
    /// PaperMC (papermc.io)
    Paper,
    /// Mojang's official server (launchermeta.mojang.com)
    Vanilla,
    /// PurpurMC (purpurmc.org)
    Purpur,
}

impl Flavour {
    pub const ALL: [Flavour; 3] = [Flavour::Paper, Flavour::Vanilla, Flavour::Purpur];

    /// Returns the string representation of the flavour
    pub fn as_str(&self) -> &'static str {
        match self {
            Flavour::Paper => "paper",
            Flavour::Vanilla => "vanilla",
            Flavour::Purpur => "purpur",
        }
    }
}

impl std::fmt::Display for Flavour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Flavour {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paper" => Ok(Flavour::Paper),
            "vanilla" => Ok(Flavour::Vanilla),
            "purpur" => Ok(Flavour::Purpur),
            _ => Err(()),
        }
    }
}

/// Reason a version string was rejected by [`VersionQuery::new`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidVersion {
    #[error("version must not be empty")]
    Empty,
    #[error("version must be at most {MAX_VERSION_LEN} characters")]
    TooLong,
    #[error("version must be printable ASCII")]
    NotAscii,
}

/// A single (flavour, version) request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionQuery {
    pub flavour: Flavour,
    pub version: String,
}

/// Check that `version` is a non-empty, printable ASCII string of at most
/// [`MAX_VERSION_LEN`] characters
pub fn check_version(version: &str) -> Result<(), InvalidVersion> {
    if version.is_empty() {
        return Err(InvalidVersion::Empty);
    }
    if !version.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) {
        return Err(InvalidVersion::NotAscii);
    }
    if version.len() > MAX_VERSION_LEN {
        return Err(InvalidVersion::TooLong);
    }
    Ok(())
}

impl VersionQuery {
    pub fn new(flavour: Flavour, version: &str) -> Result<Self, InvalidVersion> {
        check_version(version)?;
        Ok(Self {
            flavour,
            version: version.to_string(),
        })
    }
}

/// Result of turning a (flavour, version) pair into a download URL
///
/// Every provider and the cache lookup return this type. `Found` always
/// carries an absolute URL.
#[derive(Debug)]
pub enum ResolutionOutcome {
    /// The artifact exists and can be downloaded from this URL
    Found(Url),
    /// The version does not exist upstream or in the cache
    NotFound,
    /// A remote dependency failed or returned malformed data
    UpstreamError(ResolveError),
}

impl ResolutionOutcome {
    /// Build a `Found` outcome from an assembled URL string.
    ///
    /// A string that does not parse as an absolute `http` or `https` URL is
    /// treated as malformed upstream data.
    pub fn found(url: &str) -> Self {
        match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                ResolutionOutcome::Found(parsed)
            }
            Ok(parsed) => ResolutionOutcome::UpstreamError(
                ProviderError::InvalidResponse(format!(
                    "download URL {url:?} has unsupported scheme {:?}",
                    parsed.scheme()
                ))
                .into(),
            ),
            Err(e) => ResolutionOutcome::UpstreamError(
                ProviderError::InvalidResponse(format!("invalid download URL {url:?}: {e}")).into(),
            ),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ResolutionOutcome::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolutionOutcome::NotFound)
    }

    pub fn is_upstream_error(&self) -> bool {
        matches!(self, ResolutionOutcome::UpstreamError(_))
    }

    /// The download URL, only present for `Found`
    pub fn url(&self) -> Option<&Url> {
        match self {
            ResolutionOutcome::Found(url) => Some(url),
            _ => None,
        }
    }
}

impl From<ResolveError> for ResolutionOutcome {
    fn from(error: ResolveError) -> Self {
        ResolutionOutcome::UpstreamError(error)
    }
}

impl From<ProviderError> for ResolutionOutcome {
    fn from(error: ProviderError) -> Self {
        ResolutionOutcome::UpstreamError(error.into())
    }
}

impl From<StoreError> for ResolutionOutcome {
    fn from(error: StoreError) -> Self {
        ResolutionOutcome::UpstreamError(error.into())
    }
}
