//! Resolution layer: from (flavour, version) to a server jar URL
//!
//! # Architecture
//!
//! ```text
//!                     ┌──────────────┐
//!                     │   Resolver   │
//!                     │  (dispatch)  │
//!                     └──────────────┘
//!                  live │          │ cached
//!                       ▼          ▼
//! ┌──────────────────────────┐  ┌─────────────┐
//! │        Providers         │  │ CacheLookup │
//! │ (paper, vanilla, purpur) │  │  (sqlite)   │
//! └──────────────────────────┘  └─────────────┘
//!              │
//!              ▼
//!     ┌────────────────┐
//!     │ UpstreamClient │
//!     │ (json + limit) │
//!     └────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: download store lookups and the out-of-band writer
//! - [`client`]: shared HTTP transport with a per-request timeout
//! - [`dispatch`]: mode selection and flavour to provider routing
//! - [`error`]: error types for providers and the store
//! - [`provider`]: the `Provider` trait
//! - [`providers`]: PaperMC, Mojang and PurpurMC implementations
//! - [`types`]: `Flavour`, `VersionQuery`, `ResolutionOutcome`

pub mod cache;
pub mod client;
pub mod dispatch;
pub mod error;
pub mod provider;
pub mod providers;
pub mod types;
