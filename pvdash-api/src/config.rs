//! Configuration management for the pvdash server
//!
//! Settings are resolved from, highest priority first:
//! 1. Environment variables (`KUBECONFIG` and `PVDASH_*`)
//! 2. Configuration file (TOML format)
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Kubeconfig location used when `KUBECONFIG` is unset
pub const DEFAULT_KUBECONFIG: &str = "./k8s/.kubeconfig";

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// HTTP listener configuration
    pub server: ServerConfig,
    /// Cluster connection and aggregation settings
    pub kubernetes: KubernetesConfig,
    /// Page template settings
    pub template: TemplateConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

/// Cluster connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KubernetesConfig {
    /// Path to the kubeconfig file
    pub kubeconfig: PathBuf,
    /// Kubeconfig context to use instead of the current-context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Use the pod's service account instead of a kubeconfig
    pub in_cluster: bool,
    /// Field selector applied when listing pods for placement diagnostics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_field_selector: Option<String>,
    /// How pod placement lookup failures are handled
    pub placement: PlacementPolicy,
}

/// Handling of the pod placement diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementPolicy {
    /// Skip pod lookups entirely
    Disabled,
    /// Log lookup failures and keep aggregating
    #[default]
    BestEffort,
    /// Treat lookup failures like any other listing failure
    Strict,
}

impl FromStr for PlacementPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disabled" | "off" => Ok(Self::Disabled),
            "best-effort" | "besteffort" => Ok(Self::BestEffort),
            "strict" => Ok(Self::Strict),
            other => Err(ConfigError::Validation(format!(
                "Unknown placement policy '{}'",
                other
            ))),
        }
    }
}

/// Template configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Path to the page template
    pub path: PathBuf,
    /// Whether the template is re-read per request or parsed once
    pub mode: TemplateMode,
}

/// When the page template is loaded from disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateMode {
    /// Re-read and parse on every request, so edits apply without a restart
    #[default]
    Reload,
    /// Parse once at startup
    Cached,
}

impl FromStr for TemplateMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reload" => Ok(Self::Reload),
            "cached" | "cache" => Ok(Self::Cached),
            other => Err(ConfigError::Validation(format!(
                "Unknown template mode '{}'",
                other
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Directory for log files
    pub log_dir: PathBuf,
    /// Enable file logging
    pub file_logging_enabled: bool,
    /// Use JSON formatting on the console
    pub json_format: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            kubeconfig: PathBuf::from(DEFAULT_KUBECONFIG),
            context: None,
            in_cluster: false,
            pod_field_selector: None,
            placement: PlacementPolicy::default(),
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./templates/index.html"),
            mode: TemplateMode::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("/var/log/pvdash"),
            file_logging_enabled: false,
            json_format: false,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.clone(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            std::env::var("PVDASH_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from("/etc/pvdash/config.toml")),
            Some(PathBuf::from("./pvdash.toml")),
        ];

        paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Apply overrides from a variable lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(host) = lookup("PVDASH_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PVDASH_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Validation(format!("Invalid port '{}'", port)))?;
        }

        // Kubernetes
        if let Some(path) = lookup("KUBECONFIG").filter(|p| !p.is_empty()) {
            self.kubernetes.kubeconfig = PathBuf::from(path);
        }
        if let Some(context) = lookup("PVDASH_KUBE_CONTEXT") {
            self.kubernetes.context = Some(context);
        }
        if let Some(in_cluster) = lookup("PVDASH_IN_CLUSTER") {
            self.kubernetes.in_cluster = parse_flag("PVDASH_IN_CLUSTER", &in_cluster)?;
        }
        if let Some(selector) = lookup("PVDASH_POD_FIELD_SELECTOR") {
            self.kubernetes.pod_field_selector = Some(selector).filter(|s| !s.is_empty());
        }
        if let Some(policy) = lookup("PVDASH_PLACEMENT") {
            self.kubernetes.placement = policy.parse()?;
        }

        // Template
        if let Some(path) = lookup("PVDASH_TEMPLATE_PATH") {
            self.template.path = PathBuf::from(path);
        }
        if let Some(mode) = lookup("PVDASH_TEMPLATE_MODE") {
            self.template.mode = mode.parse()?;
        }

        // Logging
        if let Some(level) = lookup("PVDASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(path) = lookup("PVDASH_LOG_DIR") {
            self.logging.log_dir = PathBuf::from(path);
        }
        if let Some(enabled) = lookup("PVDASH_FILE_LOGGING") {
            self.logging.file_logging_enabled = parse_flag("PVDASH_FILE_LOGGING", &enabled)?;
        }
        if let Some(json) = lookup("PVDASH_LOG_JSON") {
            self.logging.json_format = parse_flag("PVDASH_LOG_JSON", &json)?;
        }

        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("Port cannot be 0".to_string()));
        }

        if self.template.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "Template path cannot be empty".to_string(),
            ));
        }

        if !self.kubernetes.in_cluster && self.kubernetes.kubeconfig.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "Kubeconfig path cannot be empty unless running in-cluster".to_string(),
            ));
        }

        Ok(())
    }
}

/// Boolean environment value; anything but `true`/`false` is rejected
fn parse_flag(var: &str, value: &str) -> Result<bool, ConfigError> {
    value.trim().to_lowercase().parse().map_err(|_| {
        ConfigError::Validation(format!(
            "Invalid value '{}' for {}: expected true or false",
            value, var
        ))
    })
}

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file {0:?}: {1}")]
    FileRead(PathBuf, String),
    /// Failed to parse configuration
    #[error("Failed to parse config: {0}")]
    Parse(String),
    /// Configuration validation failed
    #[error("Config validation failed: {0}")]
    Validation(String),
}
