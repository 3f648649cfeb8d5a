use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::resolve::dispatch::Mode;

// =============================================================================
// Defaults
// =============================================================================

/// Default listening port
pub const DEFAULT_PORT: u16 = 3000;

/// Timeout for each upstream request in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Server configuration, read from flags with environment fallbacks
#[derive(Debug, Clone, Args, PartialEq)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "MCJAR_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Resolve live against upstream APIs, or from the download store only
    #[arg(long, env = "MCJAR_MODE", value_enum, default_value_t = Mode::Live)]
    pub mode: Mode,

    /// Path of the download store (defaults to the data directory)
    #[arg(long, env = "MCJAR_STORE")]
    pub store: Option<PathBuf>,

    /// Timeout for each upstream request, in milliseconds
    #[arg(long, env = "MCJAR_FETCH_TIMEOUT_MS", default_value_t = FETCH_TIMEOUT_MS)]
    pub fetch_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            mode: Mode::Live,
            store: None,
            fetch_timeout_ms: FETCH_TIMEOUT_MS,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// The configured store path, or the default one in the data directory
    pub fn store_path(&self) -> PathBuf {
        self.store.clone().unwrap_or_else(default_store_path)
    }
}

/// Returns the path to the data directory for mcjar.
/// Uses $XDG_DATA_HOME/mcjar if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/mcjar,
/// or ./mcjar if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the default path of the download store.
pub fn default_store_path() -> PathBuf {
    data_dir().join("downloads.db")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("mcjar")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ServerConfig,
    }

    #[test]
    fn server_config_from_flags_parses_all_fields() {
        let cli = TestCli::try_parse_from([
            "mcjar",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--mode",
            "cached",
            "--store",
            "/var/lib/mcjar/downloads.db",
            "--fetch-timeout-ms",
            "500",
        ])
        .unwrap();

        assert_eq!(
            cli.config,
            ServerConfig {
                host: IpAddr::V4(Ipv4Addr::LOCALHOST),
                port: 8080,
                mode: Mode::Cached,
                store: Some(PathBuf::from("/var/lib/mcjar/downloads.db")),
                fetch_timeout_ms: 500,
            }
        );
        assert_eq!(cli.config.bind_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(cli.config.fetch_timeout(), Duration::from_millis(500));
    }

    #[test]
    fn server_config_rejects_unknown_mode() {
        let result = TestCli::try_parse_from(["mcjar", "--mode", "hybrid"]);
        assert!(result.is_err());
    }

    #[test]
    fn server_config_default_listens_on_port_3000() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:3000");
        assert_eq!(config.mode, Mode::Live);
    }

    #[test]
    fn store_path_prefers_configured_path() {
        let config = ServerConfig {
            store: Some(PathBuf::from("/tmp/store.db")),
            ..ServerConfig::default()
        };

        assert_eq!(config.store_path(), PathBuf::from("/tmp/store.db"));
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/mcjar"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/mcjar"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./mcjar"));
    }
}
