use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, Subcommand};
use futures::future::join_all;
use tracing::{info, warn};

use mcjar::config::{FETCH_TIMEOUT_MS, ServerConfig, default_store_path};
use mcjar::gateway::server::run_server;
use mcjar::logging::{self, LogConfig};
use mcjar::resolve::cache::DownloadStore;
use mcjar::resolve::client::UpstreamClient;
use mcjar::resolve::dispatch::{Resolver, create_default_providers};
use mcjar::resolve::types::{Flavour, ResolutionOutcome, VersionQuery};

#[derive(Parser)]
#[command(name = "mcjar")]
#[command(version, about = "Redirects to Minecraft server jar downloads")]
struct Cli {
    #[command(flatten)]
    log: LogConfig,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve(ServerConfig),
    /// Resolve one version against upstream and print its download URL
    Resolve {
        #[arg(value_parser = parse_flavour)]
        flavour: Flavour,
        version: String,
        /// Timeout for each upstream request, in milliseconds
        #[arg(long, default_value_t = FETCH_TIMEOUT_MS)]
        fetch_timeout_ms: u64,
    },
    /// Manage the download store read in cached mode
    Cache {
        /// Path of the download store (defaults to the data directory)
        #[arg(long, env = "MCJAR_STORE")]
        store: Option<PathBuf>,
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Store a download URL
    Set {
        #[arg(value_parser = parse_flavour)]
        flavour: Flavour,
        version: String,
        url: url::Url,
    },
    /// Remove a stored download URL
    Remove {
        #[arg(value_parser = parse_flavour)]
        flavour: Flavour,
        version: String,
    },
    /// List stored download URLs
    List,
    /// Resolve versions against upstream and store the results
    Warm {
        #[arg(value_parser = parse_flavour)]
        flavour: Flavour,
        #[arg(required = true)]
        versions: Vec<String>,
    },
}

/// Server configuration taken from the environment alone
#[derive(Parser)]
struct EnvServerConfig {
    #[command(flatten)]
    server: ServerConfig,
}

fn parse_flavour(s: &str) -> Result<Flavour, String> {
    s.parse()
        .map_err(|()| format!("unknown flavour {s:?} (expected paper, vanilla or purpur)"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(&cli.log)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        None => runtime.block_on(run_server(EnvServerConfig::parse_from(["mcjar"]).server)),
        Some(Command::Serve(config)) => runtime.block_on(run_server(config)),
        Some(Command::Resolve {
            flavour,
            version,
            fetch_timeout_ms,
        }) => runtime.block_on(resolve(flavour, &version, fetch_timeout_ms)),
        Some(Command::Cache { store, action }) => {
            let store = store.unwrap_or_else(default_store_path);
            runtime.block_on(cache(&store, action))
        }
    }
}

fn live_resolver(fetch_timeout_ms: u64) -> anyhow::Result<Resolver> {
    let client = UpstreamClient::new(std::time::Duration::from_millis(fetch_timeout_ms))?;
    Ok(Resolver::live(create_default_providers(&client)))
}

async fn resolve(flavour: Flavour, version: &str, fetch_timeout_ms: u64) -> anyhow::Result<()> {
    let query = VersionQuery::new(flavour, version)?;

    match live_resolver(fetch_timeout_ms)?.dispatch(&query).await {
        ResolutionOutcome::Found(url) => {
            println!("{url}");
            Ok(())
        }
        ResolutionOutcome::NotFound => bail!("{flavour} {version} not found"),
        ResolutionOutcome::UpstreamError(e) => Err(e.into()),
    }
}

async fn cache(path: &std::path::Path, action: CacheAction) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = DownloadStore::open(path)?;

    match action {
        CacheAction::Set {
            flavour,
            version,
            url,
        } => {
            let query = VersionQuery::new(flavour, &version)?;
            if !matches!(url.scheme(), "http" | "https") {
                bail!("download URL must be http or https, got {url}");
            }
            store.put(query.flavour, &query.version, url.as_str())?;
            info!("Stored {}/{}", flavour, version);
        }
        CacheAction::Remove { flavour, version } => {
            if !store.remove(flavour, &version)? {
                bail!("{flavour} {version} is not stored");
            }
            info!("Removed {}/{}", flavour, version);
        }
        CacheAction::List => {
            for entry in store.entries()? {
                println!("{}\t{}\t{}", entry.flavour, entry.version, entry.url);
            }
        }
        CacheAction::Warm { flavour, versions } => {
            let queries = versions
                .iter()
                .map(|version| VersionQuery::new(flavour, version))
                .collect::<Result<Vec<_>, _>>()?;

            let resolver = live_resolver(FETCH_TIMEOUT_MS)?;
            let outcomes = join_all(queries.iter().map(|query| resolver.dispatch(query))).await;

            let mut failed = 0;
            for (VersionQuery { version, .. }, outcome) in queries.iter().zip(outcomes) {
                match outcome {
                    ResolutionOutcome::Found(url) => {
                        store.put(flavour, version, url.as_str())?;
                        println!("{flavour}\t{version}\t{url}");
                    }
                    ResolutionOutcome::NotFound => {
                        warn!("{}/{} not found upstream, skipping", flavour, version);
                        failed += 1;
                    }
                    ResolutionOutcome::UpstreamError(e) => {
                        warn!("{}/{} failed: {}", flavour, version, e);
                        failed += 1;
                    }
                }
            }

            if failed > 0 {
                bail!("{failed} of {} versions could not be stored", queries.len());
            }
        }
    }

    Ok(())
}
