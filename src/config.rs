use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// "text" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

/// Where the schema and model artifacts live and how they are named
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtifactsConfig {
    /// Project root the artifact directories are resolved against
    #[serde(default = "default_artifacts_root")]
    pub root: PathBuf,

    /// Directory searched first (default: "artifacts")
    #[serde(default = "default_preferred_dir")]
    pub preferred_dir: String,

    /// Directory searched when the preferred one is missing (default: "model")
    #[serde(default = "default_legacy_dir")]
    pub legacy_dir: String,

    /// Schema file names, in order of preference
    #[serde(default = "default_columns_files")]
    pub columns_files: Vec<String>,

    /// Prefix matched when none of `columns_files` exist
    #[serde(default)]
    pub columns_prefix: Option<String>,

    /// Model file names, in order of preference
    #[serde(default = "default_model_files")]
    pub model_files: Vec<String>,

    /// Prefix matched when none of `model_files` exist
    #[serde(default = "default_model_prefix")]
    pub model_prefix: Option<String>,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            root: default_artifacts_root(),
            preferred_dir: default_preferred_dir(),
            legacy_dir: default_legacy_dir(),
            columns_files: default_columns_files(),
            columns_prefix: None,
            model_files: default_model_files(),
            model_prefix: default_model_prefix(),
        }
    }
}

impl ArtifactsConfig {
    /// Layout rooted at `root`, everything else default
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

/// Static pages of the web front end
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_dir")]
    pub dir: PathBuf,
    /// Page served at `/`
    #[serde(default = "default_index_page")]
    pub index_page: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            dir: default_site_dir(),
            index_page: default_index_page(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_artifacts_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_preferred_dir() -> String {
    "artifacts".to_string()
}

fn default_legacy_dir() -> String {
    "model".to_string()
}

fn default_columns_files() -> Vec<String> {
    vec!["columns.json".to_string()]
}

fn default_model_files() -> Vec<String> {
    vec![
        "banglore_home_prices_model.json".to_string(),
        "banglore_home_prices_model(1).json".to_string(),
        "banglore_home_prices_model (1).json".to_string(),
    ]
}

fn default_model_prefix() -> Option<String> {
    Some("banglore_home_prices_model".to_string())
}

fn default_site_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_index_page() -> String {
    "real.html".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            artifacts: ArtifactsConfig::default(),
            site: SiteConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

/// Load configuration from an optional TOML file plus `HOME_PRICE__*` env vars
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("HOME_PRICE").separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        anyhow::bail!("server.port must be non-zero");
    }

    match cfg.server.log_format.as_str() {
        "text" | "json" => {}
        other => anyhow::bail!("server.log_format must be 'text' or 'json', got '{}'", other),
    }

    if cfg.artifacts.preferred_dir.is_empty() && cfg.artifacts.legacy_dir.is_empty() {
        anyhow::bail!("At least one of artifacts.preferred_dir / artifacts.legacy_dir must be set");
    }

    if cfg.artifacts.columns_files.is_empty() && cfg.artifacts.columns_prefix.is_none() {
        anyhow::bail!("artifacts.columns_files cannot be empty without a columns_prefix");
    }

    if cfg.artifacts.model_files.is_empty() && cfg.artifacts.model_prefix.is_none() {
        anyhow::bail!("artifacts.model_files cannot be empty without a model_prefix");
    }

    // The index page is joined onto site.dir, so it must stay inside it
    let index = Path::new(&cfg.site.index_page);
    if cfg.site.index_page.is_empty() || index.components().count() != 1 || index.is_absolute() {
        anyhow::bail!(
            "site.index_page must be a bare file name, got '{}'",
            cfg.site.index_page
        );
    }

    Ok(())
}
