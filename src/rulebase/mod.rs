//! Genotype-to-phenotype rule engine
//!
//! Translates raw allele calls into a diplotype, metabolizer phenotype, and
//! activity score by walking a gene's rules in table order - first match wins.
//! Also serves the diplotype reference table used when a report is driven by
//! an already-known diplotype label.
//!
//! The table is loaded once from a [`RulebaseSource`], shared through a
//! [`RulebaseHandle`], and replaced atomically on reload.

pub mod engine;
pub mod handle;
pub mod model;
pub mod source;

pub use engine::{predict_in_table, MatchOutcome, Prediction, RuleEngine};
pub use handle::{ReloadSummary, RulebaseHandle};
pub use model::{normalize_diplotype_label, DefaultRule, DiplotypeRow, GeneRules, Rule, RuleTable};
pub use source::{FileRulebaseSource, RulebaseSource};
