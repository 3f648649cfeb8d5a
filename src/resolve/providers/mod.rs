//! Provider implementations for each server flavour

pub mod paper;
pub mod purpur;
pub mod vanilla;

pub use paper::PaperProvider;
pub use purpur::PurpurProvider;
pub use vanilla::VanillaProvider;

use serde::Deserialize;

/// Build identifier as published upstream
///
/// PaperMC lists builds as numbers, PurpurMC as strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(crate) enum BuildId {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for BuildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildId::Number(n) => write!(f, "{n}"),
            BuildId::Text(s) => f.write_str(s),
        }
    }
}
