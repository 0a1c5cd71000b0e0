// Mendel - Pharmacogenomic Test Workflow Engine
// Copyright (c) 2025 Mendel Contributors
// Licensed under the MIT License

//! # Mendel - Pharmacogenomic Test Workflow Engine
//!
//! Mendel is the core service of a pharmacogenomic (PGx) testing laboratory:
//! it translates raw allele calls into diplotype, metabolizer phenotype, and
//! activity score through a rule-matching engine, and drives test requests
//! through a dual-confirmation lifecycle with report generation.
//!
//! ## Architecture
//!
//! Mendel follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`rulebase`] - Genotype-to-phenotype rule engine and reference data
//! - [`workflow`] - Test request lifecycle state machine
//! - [`reporting`] - Report assembly, signatures, and the PDF pipeline
//! - [`adapters`] - External integrations (datastore, storage, renderer)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mendel::config::MendelConfig;
//! use mendel::workflow::WorkflowService;
//! use mendel::domain::{RequestId, StaffId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load configuration
//!     let config = MendelConfig::from_file("mendel.toml")?;
//!
//!     // Wire the workflow against the configured collaborators
//!     let service = WorkflowService::from_config(&config).await?;
//!
//!     // Record a confirmation
//!     let request_id = RequestId::new("req-1")?;
//!     let staff_id = StaffId::new("alice")?;
//!     let outcome = service.confirm(&request_id, &staff_id).await?;
//!
//!     println!("{}", outcome.message());
//!     Ok(())
//! }
//! ```
//!
//! ## Rule matching
//!
//! Rules are partial-match predicates evaluated in table order; the first
//! match wins, unmentioned allele slots are wildcards, and a gene's default
//! rule covers the no-match case with an explicit marker:
//!
//! ```rust,no_run
//! use mendel::rulebase::{RuleEngine, RulebaseHandle, FileRulebaseSource};
//! use mendel::domain::{GeneSymbol, request::AlleleObservations};
//! use std::sync::Arc;
//!
//! # async fn example() -> mendel::domain::Result<()> {
//! let source = Arc::new(FileRulebaseSource::new("rulebase.toml"));
//! let engine = RuleEngine::new(Arc::new(RulebaseHandle::load(source).await?));
//!
//! let gene = GeneSymbol::new("CYP2D6").map_err(mendel::domain::MendelError::Validation)?;
//! let observed = AlleleObservations::from_pairs([("*10", "C/C"), ("*41", "G/A")]);
//!
//! let prediction = engine.predict(&gene, &observed);
//! println!("{} ({})", prediction.phenotype, prediction.activity_score);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::MendelError`]; workflow denials carry
//! their own typed variants with user-facing messages:
//!
//! ```rust,no_run
//! use mendel::domain::WorkflowError;
//!
//! fn handle(err: WorkflowError) {
//!     if err.is_retryable() {
//!         // someone else confirmed first - reload and retry
//!     }
//! }
//! ```
//!
//! ## Logging
//!
//! Mendel uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting workflow operation");
//! warn!(request_id = "req-1", "Report regeneration failed; confirmation stands");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod reporting;
pub mod rulebase;
pub mod workflow;
