use anyhow::{Context, Result, bail};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_FILE: &str = "jobfit.log";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime configuration read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Backend base URL, without a trailing slash
    pub api_url: String,
    /// Directory the download action writes into
    pub download_dir: PathBuf,
    /// File receiving log output (the terminal belongs to the UI)
    pub log_file: PathBuf,
    /// `EnvFilter` directive for log output
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            download_dir: PathBuf::from("."),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source.
    ///
    /// Unset or blank variables fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Config::default();

        let api_url = match get("JOBFIT_API_URL") {
            Some(url) => parse_api_url(&url).context("JOBFIT_API_URL is not a usable backend URL")?,
            None => defaults.api_url,
        };

        Ok(Config {
            api_url,
            download_dir: get("JOBFIT_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.download_dir),
            log_file: get("JOBFIT_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            log_filter: get("JOBFIT_LOG").unwrap_or(defaults.log_filter),
        })
    }
}

fn parse_api_url(raw: &str) -> Result<String> {
    let url = raw.trim().trim_end_matches('/');
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(url.to_string()),
        Some(_) => bail!("'{raw}' has no host"),
        None => bail!("'{raw}' must start with http:// or https://"),
    }
}
