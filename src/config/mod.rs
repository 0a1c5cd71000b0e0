//! Configuration management
//!
//! TOML configuration with `${VAR}` substitution and `MENDEL_*` environment
//! overrides. See [`schema::MendelConfig`] for the full shape.

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, DatastoreConfig, LoggingConfig, MendelConfig, ReportingConfig,
    RetryConfig, RulebaseConfig, RulebaseSourceKind, StorageConfig,
};
