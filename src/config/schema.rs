//! Configuration schema
//!
//! TOML-backed configuration for the application, the hosted datastore,
//! object storage, the rulebase source, report rendering, and logging.

use serde::{Deserialize, Serialize};
use url::Url;

/// Application-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name used in logs
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_app_name() -> String {
    "mendel".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

/// Retry behavior for datastore reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Multiplier applied to the delay after each attempt
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Upper bound on the delay
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_delay_ms() -> u64 {
    10_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Hosted datastore connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatastoreConfig {
    /// Base URL of the datastore, e.g. `https://db.example.com`
    pub base_url: String,

    /// API key sent with every request
    #[serde(default)]
    pub api_key: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Read retry behavior
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Object storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base URL of the storage service API
    pub base_url: String,

    /// Public base URL objects are served from
    pub public_base_url: String,

    /// Bucket holding rendered reports and signature images
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// API key sent with every request
    #[serde(default)]
    pub api_key: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_bucket() -> String {
    "lab-documents".to_string()
}

/// Where the rulebase is loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulebaseSourceKind {
    /// TOML snapshot on disk
    File,
    /// The hosted datastore's rulebase snapshot table
    Datastore,
}

/// Rulebase source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulebaseConfig {
    /// Source kind
    #[serde(default = "default_rulebase_source")]
    pub source: RulebaseSourceKind,

    /// Path to the TOML snapshot (required for the file source)
    #[serde(default)]
    pub path: Option<String>,
}

fn default_rulebase_source() -> RulebaseSourceKind {
    RulebaseSourceKind::File
}

impl Default for RulebaseConfig {
    fn default() -> Self {
        Self {
            source: default_rulebase_source(),
            path: None,
        }
    }
}

/// Report rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportingConfig {
    /// Render service endpoint receiving report documents
    pub render_url: String,

    /// Render request timeout
    #[serde(default = "default_render_timeout_seconds")]
    pub render_timeout_seconds: u64,

    /// Clinic name printed on the report letterhead
    #[serde(default)]
    pub clinic_name: String,

    /// Clinic address printed on the report letterhead
    #[serde(default)]
    pub clinic_address: String,
}

fn default_render_timeout_seconds() -> u64 {
    60
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether to write JSON logs to a local rolling file
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy: daily or hourly
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,

    /// Advisory size limit per log file
    #[serde(default = "default_log_max_size_mb")]
    pub local_max_size_mb: u64,
}

fn default_log_path() -> String {
    "./logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

fn default_log_max_size_mb() -> u64 {
    100
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
            local_max_size_mb: default_log_max_size_mb(),
        }
    }
}

/// Full Mendel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MendelConfig {
    /// Application settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Hosted datastore settings
    pub datastore: DatastoreConfig,

    /// Object storage settings
    pub storage: StorageConfig,

    /// Rulebase source settings
    #[serde(default)]
    pub rulebase: RulebaseConfig,

    /// Report rendering settings
    pub reporting: ReportingConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MendelConfig {
    /// Loads configuration from a TOML file
    ///
    /// Convenience wrapper around [`crate::config::loader::load_config`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::domain::Result<Self> {
        crate::config::loader::load_config(path)
    }

    /// Validates cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns a message describing the first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.application.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.application.log_level
            ));
        }

        for (field, value) in [
            ("datastore.base_url", &self.datastore.base_url),
            ("storage.base_url", &self.storage.base_url),
            ("storage.public_base_url", &self.storage.public_base_url),
            ("reporting.render_url", &self.reporting.render_url),
        ] {
            Url::parse(value).map_err(|e| format!("Invalid URL in {field}: {e}"))?;
        }

        if self.storage.bucket.trim().is_empty() {
            return Err("storage.bucket cannot be empty".to_string());
        }

        if self.rulebase.source == RulebaseSourceKind::File
            && self.rulebase.path.as_deref().map_or(true, str::is_empty)
        {
            return Err(
                "rulebase.path is required when rulebase.source is 'file'".to_string(),
            );
        }

        if !["daily", "hourly"].contains(&self.logging.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging rotation '{}'. Must be 'daily' or 'hourly'",
                self.logging.local_rotation
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> MendelConfig {
        MendelConfig {
            application: ApplicationConfig::default(),
            datastore: DatastoreConfig {
                base_url: "https://db.example.com".to_string(),
                api_key: "key".to_string(),
                timeout_seconds: 30,
                retry: RetryConfig::default(),
            },
            storage: StorageConfig {
                base_url: "https://storage.example.com".to_string(),
                public_base_url: "https://cdn.example.com".to_string(),
                bucket: "lab-documents".to_string(),
                api_key: "key".to_string(),
                timeout_seconds: 30,
            },
            rulebase: RulebaseConfig {
                source: RulebaseSourceKind::File,
                path: Some("rulebase.toml".to_string()),
            },
            reporting: ReportingConfig {
                render_url: "https://render.example.com/render".to_string(),
                render_timeout_seconds: 60,
                clinic_name: "Example PGx Laboratory".to_string(),
                clinic_address: "1 Lab Way".to_string(),
            },
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = valid_config();
        config.application.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let mut config = valid_config();
        config.datastore.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_source_requires_path() {
        let mut config = valid_config();
        config.rulebase.path = None;
        assert!(config.validate().is_err());

        config.rulebase.source = RulebaseSourceKind::Datastore;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_rotation_rejected() {
        let mut config = valid_config();
        config.logging.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_minimal_toml_parses_with_defaults() {
        let toml_text = r#"
[datastore]
base_url = "https://db.example.com"

[storage]
base_url = "https://storage.example.com"
public_base_url = "https://cdn.example.com"

[reporting]
render_url = "https://render.example.com/render"
"#;
        let config: MendelConfig = toml::from_str(toml_text).unwrap();
        assert_eq!(config.application.name, "mendel");
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.datastore.retry.max_retries, 3);
        assert_eq!(config.storage.bucket, "lab-documents");
        assert_eq!(config.rulebase.source, RulebaseSourceKind::File);
    }
}
