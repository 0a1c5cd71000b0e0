//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::MendelConfig;
use crate::domain::errors::MendelError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into MendelConfig
/// 4. Applies environment variable overrides (`MENDEL_*` prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use mendel::config::loader::load_config;
///
/// let config = load_config("mendel.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<MendelConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MendelError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        MendelError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: MendelConfig = toml::from_str(&contents)
        .map_err(|e| MendelError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        MendelError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(MendelError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `MENDEL_*` prefix
///
/// Environment variables follow the pattern: `MENDEL_<SECTION>_<KEY>`,
/// e.g. `MENDEL_DATASTORE_BASE_URL`, `MENDEL_APPLICATION_LOG_LEVEL`.
fn apply_env_overrides(config: &mut MendelConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("MENDEL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Datastore overrides
    if let Ok(val) = std::env::var("MENDEL_DATASTORE_BASE_URL") {
        config.datastore.base_url = val;
    }
    if let Ok(val) = std::env::var("MENDEL_DATASTORE_API_KEY") {
        config.datastore.api_key = val;
    }
    if let Ok(val) = std::env::var("MENDEL_DATASTORE_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.datastore.timeout_seconds = timeout;
        }
    }

    // Storage overrides
    if let Ok(val) = std::env::var("MENDEL_STORAGE_BASE_URL") {
        config.storage.base_url = val;
    }
    if let Ok(val) = std::env::var("MENDEL_STORAGE_PUBLIC_BASE_URL") {
        config.storage.public_base_url = val;
    }
    if let Ok(val) = std::env::var("MENDEL_STORAGE_BUCKET") {
        config.storage.bucket = val;
    }
    if let Ok(val) = std::env::var("MENDEL_STORAGE_API_KEY") {
        config.storage.api_key = val;
    }

    // Rulebase overrides
    if let Ok(val) = std::env::var("MENDEL_RULEBASE_PATH") {
        config.rulebase.path = Some(val);
    }

    // Reporting overrides
    if let Ok(val) = std::env::var("MENDEL_REPORTING_RENDER_URL") {
        config.reporting.render_url = val;
    }
    if let Ok(val) = std::env::var("MENDEL_REPORTING_CLINIC_NAME") {
        config.reporting.clinic_name = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("MENDEL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("MENDEL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
