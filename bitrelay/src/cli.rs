//! Command-line arguments shared by the binaries.

use crate::tasks::migrate::DEFAULT_WORKERS;
use clap::{Args, Parser};
use std::path::PathBuf;

/// Locations of the settings file and the secrets file.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Settings file (TOML)
    #[arg(long = "toml", default_value = "toml/local.toml")]
    pub toml_path: PathBuf,

    /// Secrets file (dotenv)
    #[arg(long = "env", default_value = "env/.env.local")]
    pub env_path: PathBuf,
}

/// Arguments for the long-running binaries.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct ServiceCli {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Copy every ticker from one persistence service into another.
#[derive(Parser, Debug)]
#[command(name = "import_tickers", version, about, long_about = None)]
pub struct ImportCli {
    /// Service the tickers are read from
    #[arg(long, default_value = "http://localhost:9000")]
    pub source: String,

    /// Service whose tickers are replaced
    #[arg(long, default_value = "http://localhost:8000")]
    pub target: String,

    /// Concurrent workers per phase
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_defaults() {
        let cli = ServiceCli::try_parse_from(["ticker_batch"]).unwrap();
        assert_eq!(cli.config.toml_path, PathBuf::from("toml/local.toml"));
        assert_eq!(cli.config.env_path, PathBuf::from("env/.env.local"));
    }

    #[test]
    fn service_paths_are_overridable() {
        let cli = ServiceCli::try_parse_from([
            "health_batch",
            "--toml",
            "toml/prod.toml",
            "--env",
            "env/.env.prod",
        ])
        .unwrap();
        assert_eq!(cli.config.toml_path, PathBuf::from("toml/prod.toml"));
        assert_eq!(cli.config.env_path, PathBuf::from("env/.env.prod"));
    }

    #[test]
    fn import_defaults() {
        let cli = ImportCli::try_parse_from(["import_tickers"]).unwrap();
        assert_eq!(cli.source, "http://localhost:9000");
        assert_eq!(cli.target, "http://localhost:8000");
        assert_eq!(cli.workers, 10);
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn import_rejects_non_numeric_workers() {
        assert!(ImportCli::try_parse_from(["import_tickers", "--workers", "many"]).is_err());
    }
}
