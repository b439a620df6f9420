//! Configuration management for the helpdesk.
//!
//! Configuration is merged from, in increasing precedence:
//! - Built-in defaults
//! - The config file (`.helpdesk/config.yaml`)
//! - Environment variables
//! - Command-line flags
//!
//! The configuration is workspace-centric: the document store, prompt
//! overrides and seed data all live under the workspace root.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::logging::LogFormat;

/// Providers the completion client factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 2] = ["openrouter", "openai"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .helpdesk/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Completion provider ("openrouter", "openai")
    pub provider: String,

    /// Model identifier sent with every completion request
    pub model: String,

    /// API key override (takes precedence over the provider's key variable)
    pub api_key: Option<String>,

    /// Document store location; defaults to `.helpdesk/helpdesk.sqlite`
    pub store_path: Option<PathBuf>,

    /// Signed-in user identity for admin operations
    pub user: Option<String>,

    /// Institution named in the answering prompt
    pub institution: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Log line format
    #[serde(skip)]
    pub log_format: LogFormat,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Provider configurations from config.yaml
    pub llm: Option<LlmConfig>,
}

/// Completion provider section of config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Per-provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Name of the environment variable holding the API key
    #[serde(rename = "apiKeyEnv", default)]
    pub api_key_env: Option<String>,

    pub model: String,

    /// Base URL of the chat-completions API
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Value for the `HTTP-Referer` attribution header
    #[serde(default)]
    pub referer: Option<String>,

    /// Value for the `X-Title` attribution header
    #[serde(default)]
    pub title: Option<String>,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    helpdesk: Option<HelpdeskSection>,
    workspace: Option<WorkspaceConfig>,
    store: Option<StoreConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HelpdeskSection {
    institution: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
    format: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "openrouter".to_string(),
            model: "deepseek/deepseek-r1:free".to_string(),
            api_key: None,
            store_path: None,
            user: None,
            institution: None,
            log_level: None,
            log_format: LogFormat::Pretty,
            verbose: false,
            no_color: false,
            llm: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, the config file and defaults.
    ///
    /// Environment variables:
    /// - `HELPDESK_WORKSPACE`: Override workspace path
    /// - `HELPDESK_CONFIG`: Path to config file
    /// - `HELPDESK_PROVIDER`: Completion provider
    /// - `HELPDESK_MODEL`: Model identifier
    /// - `HELPDESK_API_KEY`: API key
    /// - `HELPDESK_STORE`: Document store path
    /// - `HELPDESK_USER`: Signed-in user identity
    /// - `HELPDESK_INSTITUTION`: Institution named in the answering prompt
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use helpdesk_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("HELPDESK_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("HELPDESK_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        config.load_file()
    }

    /// Validate the workspace and merge the config file, then environment variables.
    ///
    /// Called by [`AppConfig::load`] and again by the CLI once `--workspace` /
    /// `--config` flags are known.
    pub fn load_file(mut self) -> AppResult<Self> {
        if !self.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                self.workspace
            )));
        }

        let config_path = self
            .config_file
            .clone()
            .unwrap_or_else(|| self.helpdesk_dir().join("config.yaml"));

        if config_path.exists() {
            self = self.merge_yaml(&config_path)?;
        } else if self.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("HELPDESK_PROVIDER") {
            self.provider = provider;
        }

        if let Ok(model) = std::env::var("HELPDESK_MODEL") {
            self.model = model;
        }

        if let Ok(store) = std::env::var("HELPDESK_STORE") {
            self.store_path = Some(PathBuf::from(store));
        }

        if let Ok(user) = std::env::var("HELPDESK_USER") {
            self.user = Some(user);
        }

        if let Ok(institution) = std::env::var("HELPDESK_INSTITUTION") {
            self.institution = Some(institution);
        }

        if let Ok(key) = std::env::var("HELPDESK_API_KEY") {
            self.api_key = Some(key);
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            self.no_color = true;
        }

        Ok(self)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(ws) = config_file.workspace {
            if let Some(path) = ws.path {
                result.workspace = PathBuf::from(path);
            }
        }

        if let Some(helpdesk) = config_file.helpdesk {
            if let Some(institution) = helpdesk.institution {
                result.institution = Some(institution);
            }
        }

        if let Some(store) = config_file.store {
            if let Some(path) = store.path {
                result.store_path = Some(PathBuf::from(path));
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(format) = logging.format {
                result.log_format = LogFormat::parse(&format);
            }
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = provider_config.model.clone();
            }

            result.llm = Some(llm);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and the
    /// config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        user: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(user) = user {
            self.user = Some(user);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .helpdesk directory.
    pub fn helpdesk_dir(&self) -> PathBuf {
        self.workspace.join(".helpdesk")
    }

    /// Ensure the .helpdesk directory exists.
    pub fn ensure_helpdesk_dir(&self) -> AppResult<()> {
        let dir = self.helpdesk_dir();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                AppError::Config(format!("Failed to create .helpdesk directory: {}", e))
            })?;
        }
        Ok(())
    }

    /// Resolved document store path. Relative paths are taken from the workspace.
    pub fn store_path(&self) -> PathBuf {
        match self.store_path {
            Some(ref path) if path.is_absolute() => path.clone(),
            Some(ref path) => self.workspace.join(path),
            None => self.helpdesk_dir().join("helpdesk.sqlite"),
        }
    }

    /// Default seed file read by `helpdesk import`.
    pub fn seed_path(&self) -> PathBuf {
        self.workspace.join("data").join("faqs.json")
    }

    /// Get a provider configuration from config.yaml.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm
            .as_ref()
            .and_then(|llm| llm.providers.get(provider))
    }

    /// Name of the environment variable holding the provider's API key.
    pub fn api_key_env(&self, provider: &str) -> Option<String> {
        self.get_provider_config(provider)
            .and_then(|pc| pc.api_key_env.clone())
            .or_else(|| default_api_key_env(provider).map(str::to_string))
    }

    /// Resolve the API key: explicit `HELPDESK_API_KEY` first, then the
    /// provider's key variable. Empty values count as missing.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            if !key.trim().is_empty() {
                return Some(key.clone());
            }
        }

        self.api_key_env(provider)
            .and_then(|env_var| std::env::var(env_var).ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Custom endpoint for the provider, if configured.
    pub fn resolve_endpoint(&self, provider: &str) -> Option<String> {
        self.get_provider_config(provider)
            .and_then(|pc| pc.endpoint.clone())
    }

    /// Validate configuration for the active provider.
    ///
    /// A missing API key is not checked here: the client factory reports it
    /// when a completion is actually needed, so FAQ-only commands keep working.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();

        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.model.trim().is_empty() {
            return Err(AppError::Config("Model identifier is empty".to_string()));
        }

        Ok(())
    }
}

/// Conventional API key variable per provider.
fn default_api_key_env(provider: &str) -> Option<&'static str> {
    match provider.to_lowercase().as_str() {
        "openrouter" => Some("OPENROUTER_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        _ => None,
    }
}
