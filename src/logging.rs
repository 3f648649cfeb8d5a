//! Tracing setup for the server and CLI

use std::io;
use std::path::PathBuf;

use clap::Args;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "mcjar=info";

/// File name prefix for rotated log files
const LOG_FILE_PREFIX: &str = "mcjar.log";

/// Logging flags shared by every subcommand
#[derive(Debug, Clone, Default, Args, PartialEq)]
pub struct LogConfig {
    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "MCJAR_LOG_JSON")]
    pub log_json: bool,

    /// Also write daily-rotated logs into this directory
    #[arg(long, global = true, env = "MCJAR_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber.
///
/// The returned guard flushes the file writer and must live until exit.
pub fn init(config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();

    let stderr = tracing_subscriber::fmt::layer().with_writer(io::stderr);
    layers.push(if config.log_json {
        stderr.json().boxed()
    } else {
        stderr.compact().with_target(false).boxed()
    });

    let guard = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_ansi(false)
                    .boxed(),
            );
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        log: LogConfig,
    }

    #[test]
    fn log_config_defaults_to_plain_stderr() {
        let cli = TestCli::try_parse_from(["mcjar"]).unwrap();

        assert!(!cli.log.log_json);
        assert_eq!(cli.log.log_dir, None);
    }

    #[test]
    fn log_config_parses_json_and_log_dir() {
        let cli =
            TestCli::try_parse_from(["mcjar", "--log-json", "--log-dir", "/var/log/mcjar"]).unwrap();

        assert_eq!(
            cli.log,
            LogConfig {
                log_json: true,
                log_dir: Some(PathBuf::from("/var/log/mcjar")),
            }
        );
    }

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
