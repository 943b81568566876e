//! Application configuration for the walkscore enrichment run.
//!
//! The optional config file is `walkscore.toml` in the working directory.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, WalkScoreError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "walkscore.toml";

/// Input table read when no path is configured.
pub const DEFAULT_INPUT_FILE: &str = "input_cities.csv";

/// Site queried when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://www.walkscore.com";

// ---------------------------------------------------------------------------
// Config structs (matching walkscore.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input table settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Outbound request settings.
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// `[input]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path of the CSV file holding the cities.
    #[serde(default = "default_input_path")]
    pub path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
        }
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT_FILE)
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Scheme and host every record path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header override. `None` uses `walkscore/<version>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl FetchConfig {
    /// Parse and check the base URL.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            WalkScoreError::config(format!("invalid base_url '{}': {e}", self.base_url))
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(WalkScoreError::config(format!(
                    "base_url must be http or https, got '{other}'"
                )));
            }
        }

        if url.cannot_be_a_base() {
            return Err(WalkScoreError::config(format!(
                "base_url '{}' cannot carry path segments",
                self.base_url
            )));
        }

        Ok(url)
    }
}

impl AppConfig {
    /// Reject values the run cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.fetch.parsed_base_url()?;

        if self.fetch.timeout_secs == 0 {
            return Err(WalkScoreError::config(
                "fetch.timeout_secs must be greater than zero",
            ));
        }

        if self.input.path.as_os_str().is_empty() {
            return Err(WalkScoreError::config("input.path must not be empty"));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Path of the config file inside `dir`.
pub fn config_file_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// The `walkscore.toml` inside `dir`, if there is one.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    let path = config_file_path(dir);
    path.is_file().then_some(path)
}

/// Load `walkscore.toml` from `dir`. Returns defaults if the file does not exist.
pub fn load_config(dir: &Path) -> Result<AppConfig> {
    match find_config(dir) {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!(dir = %dir.display(), "config file not found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Load the application config from a specific file path.
///
/// Logged at `info` so a run whose settings come from a file is visible.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| WalkScoreError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        WalkScoreError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    tracing::info!(
        path = %path.display(),
        input = %config.input.path.display(),
        base_url = %config.fetch.base_url,
        timeout_secs = config.fetch.timeout_secs,
        "applying config file"
    );

    Ok(config)
}

/// Write a default config file into `dir`. Returns the path to the created file.
///
/// An existing file is left untouched and reported as an error.
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    let path = config_file_path(dir);
    if path.exists() {
        return Err(WalkScoreError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| WalkScoreError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| WalkScoreError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
