//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Mendel using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Mendel - Pharmacogenomic Test Workflow Engine
#[derive(Parser, Debug)]
#[command(name = "mendel")]
#[command(version, about, long_about = None)]
#[command(author = "Mendel Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "mendel.toml", env = "MENDEL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "MENDEL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a genotype-to-phenotype prediction against the loaded rulebase
    Predict(commands::predict::PredictArgs),

    /// Inspect the loaded rulebase: genes, allele slots, slot values
    Rules(commands::rules::RulesArgs),

    /// Attach allele data to a pending request and create its report
    Submit(commands::submit::SubmitArgs),

    /// Record a confirmation on a request
    Confirm(commands::confirm::ConfirmArgs),

    /// Reject a request with a reason
    Reject(commands::reject::RejectArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a starter configuration and example rulebase
    Init(commands::init::InitArgs),
}
