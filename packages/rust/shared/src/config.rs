//! Application configuration for pathfinder.
//!
//! User config lives at `~/.pathfinder/pathfinder.toml`.
//! CLI flags override config file values, which override defaults.
//! API keys are never stored in the file; each section names the
//! environment variable that holds its secret.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PathfinderError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "pathfinder.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pathfinder";

// ---------------------------------------------------------------------------
// Config structs (matching pathfinder.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Video host (YouTube Data API) settings.
    #[serde(default)]
    pub youtube: YoutubeSection,

    /// Code host (GitHub REST API) settings.
    #[serde(default)]
    pub github: GithubSection,

    /// Roadmap generator (LLM) settings.
    #[serde(default)]
    pub generator: GeneratorSection,

    /// Article search settings.
    #[serde(default)]
    pub search: SearchSection,

    /// Extraction pipeline tuning.
    #[serde(default)]
    pub pipeline: PipelineSection,
}

/// `[youtube]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeSection {
    /// Name of the env var holding the API key.
    #[serde(default = "default_youtube_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_youtube_base_url")]
    pub base_url: String,
}

impl Default for YoutubeSection {
    fn default() -> Self {
        Self {
            api_key_env: default_youtube_key_env(),
            base_url: default_youtube_base_url(),
        }
    }
}

fn default_youtube_key_env() -> String {
    "YOUTUBE_API_KEY".into()
}
fn default_youtube_base_url() -> String {
    "https://www.googleapis.com/youtube/v3".into()
}

/// `[github]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubSection {
    /// Name of the env var holding the (optional) access token.
    #[serde(default = "default_github_token_env")]
    pub token_env: String,

    #[serde(default = "default_github_base_url")]
    pub base_url: String,
}

impl Default for GithubSection {
    fn default() -> Self {
        Self {
            token_env: default_github_token_env(),
            base_url: default_github_base_url(),
        }
    }
}

fn default_github_token_env() -> String {
    "GITHUB_TOKEN".into()
}
fn default_github_base_url() -> String {
    "https://api.github.com".into()
}

/// `[generator]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSection {
    /// Name of the env var holding the generative-AI API key.
    #[serde(default = "default_generator_key_env")]
    pub api_key_env: String,

    /// Model used to draft roadmaps.
    #[serde(default = "default_generator_model")]
    pub model: String,

    #[serde(default = "default_generator_base_url")]
    pub base_url: String,

    /// Number of steps requested from the model.
    #[serde(default = "default_step_count")]
    pub step_count: u32,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            api_key_env: default_generator_key_env(),
            model: default_generator_model(),
            base_url: default_generator_base_url(),
            step_count: default_step_count(),
        }
    }
}

fn default_generator_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn default_generator_model() -> String {
    "gemini-1.5-flash-latest".into()
}
fn default_generator_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}
fn default_step_count() -> u32 {
    5
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSection {
    /// Name of the env var holding the Tavily API key.
    #[serde(default = "default_tavily_key_env")]
    pub tavily_api_key_env: String,

    #[serde(default = "default_tavily_base_url")]
    pub tavily_base_url: String,

    /// Repositories to attach to the top-level resource bag.
    #[serde(default = "default_max_repos")]
    pub max_repos: u32,

    /// Articles to attach to the top-level resource bag.
    #[serde(default = "default_max_articles")]
    pub max_articles: u32,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            tavily_api_key_env: default_tavily_key_env(),
            tavily_base_url: default_tavily_base_url(),
            max_repos: default_max_repos(),
            max_articles: default_max_articles(),
        }
    }
}

fn default_tavily_key_env() -> String {
    "TAVILY_API_KEY".into()
}
fn default_tavily_base_url() -> String {
    "https://api.tavily.com".into()
}
fn default_max_repos() -> u32 {
    3
}
fn default_max_articles() -> u32 {
    5
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSection {
    /// Upper bound on any single provider fetch.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Maximum provider fetches in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Keep markdown links that are neither videos nor repositories as articles.
    #[serde(default)]
    pub keep_unlisted_articles: bool,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: default_fetch_timeout_ms(),
            concurrency: default_concurrency(),
            keep_unlisted_articles: false,
        }
    }
}

fn default_fetch_timeout_ms() -> u64 {
    5_000
}
fn default_concurrency() -> u32 {
    8
}

// ---------------------------------------------------------------------------
// Runtime configs (resolved from the file + environment)
// ---------------------------------------------------------------------------

/// Video metadata provider settings.
#[derive(Debug, Clone)]
pub struct VideoProviderConfig {
    /// `None` means the provider is unavailable and every lookup falls back.
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl VideoProviderConfig {
    /// Resolve from config, reading the API key from the environment.
    pub fn resolve(config: &AppConfig) -> Self {
        Self {
            api_key: read_env(&config.youtube.api_key_env),
            base_url: config.youtube.base_url.clone(),
            timeout: fetch_timeout(config),
        }
    }
}

/// Code host metadata provider settings.
#[derive(Debug, Clone)]
pub struct CodeHostProviderConfig {
    /// Optional token; unauthenticated requests still work at lower rate limits.
    pub token: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl CodeHostProviderConfig {
    /// Resolve from config, reading the token from the environment.
    pub fn resolve(config: &AppConfig) -> Self {
        Self {
            token: read_env(&config.github.token_env),
            base_url: config.github.base_url.clone(),
            timeout: fetch_timeout(config),
        }
    }
}

/// Roadmap generator settings.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub step_count: u32,
}

impl GeneratorConfig {
    pub fn resolve(config: &AppConfig) -> Self {
        Self {
            api_key: read_env(&config.generator.api_key_env),
            model: config.generator.model.clone(),
            base_url: config.generator.base_url.clone(),
            step_count: config.generator.step_count,
        }
    }
}

/// Article search settings.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub tavily_api_key: Option<String>,
    pub tavily_base_url: String,
    pub max_repos: u32,
    pub max_articles: u32,
    pub timeout: Duration,
}

impl SearchConfig {
    pub fn resolve(config: &AppConfig) -> Self {
        Self {
            tavily_api_key: read_env(&config.search.tavily_api_key_env),
            tavily_base_url: config.search.tavily_base_url.clone(),
            max_repos: config.search.max_repos,
            max_articles: config.search.max_articles,
            timeout: fetch_timeout(config),
        }
    }
}

/// Extraction pipeline settings.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Any provider fetch exceeding this is treated as failed.
    pub fetch_timeout: Duration,
    /// Maximum concurrent provider fetches.
    pub concurrency: usize,
    /// Keep unclassified markdown links as articles.
    pub keep_unlisted_articles: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ExtractionConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            fetch_timeout: fetch_timeout(config),
            concurrency: config.pipeline.concurrency.max(1) as usize,
            keep_unlisted_articles: config.pipeline.keep_unlisted_articles,
        }
    }
}

/// A zero timeout would fail every fetch, so it falls back to the default.
fn fetch_timeout(config: &AppConfig) -> Duration {
    match config.pipeline.fetch_timeout_ms {
        0 => {
            let fallback = default_fetch_timeout_ms();
            tracing::warn!(fallback_ms = fallback, "fetch_timeout_ms is 0, using default");
            Duration::from_millis(fallback)
        }
        ms => Duration::from_millis(ms),
    }
}

/// Read a non-empty environment variable.
fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.pathfinder/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PathfinderError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.pathfinder/pathfinder.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PathfinderError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| PathfinderError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PathfinderError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PathfinderError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PathfinderError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that the roadmap generator API key env var is set and non-empty.
pub fn validate_generator_key(config: &AppConfig) -> Result<()> {
    let var_name = &config.generator.api_key_env;
    match read_env(var_name) {
        Some(_) => Ok(()),
        None => Err(PathfinderError::config(format!(
            "generator API key not found. Set the {var_name} environment variable."
        ))),
    }
}
