//! Genotype-to-phenotype prediction engine
//!
//! Pure lookup over a [`RuleTable`] snapshot: given a gene and an observed
//! allele set, walk the gene's rules in stored order and return the first
//! match, the gene's default, or an unknown-gene marker. Never returns an
//! error for a normal "no match" - that is the default-rule path.

use crate::domain::ids::GeneSymbol;
use crate::domain::request::AlleleObservations;
use crate::rulebase::handle::RulebaseHandle;
use crate::rulebase::model::{DiplotypeRow, RuleTable};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How a prediction was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// A rule matched the observations exactly; the result is confident
    Matched,

    /// No rule matched; the gene's default values were used. A recoverable
    /// fallback, distinct from the unknown-gene error.
    NoMatchDefault,

    /// The gene is not in the rulebase. A reportable error marker, not a
    /// silent default.
    UnknownGene,
}

/// Result of a genotype-to-phenotype prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Gene the prediction was made for
    pub gene: GeneSymbol,

    /// Predicted diplotype label; empty when the gene is unknown
    pub genotype: String,

    /// Predicted metabolizer phenotype; empty when the gene is unknown
    pub phenotype: String,

    /// Combined activity score; 0.0 when the gene is unknown
    pub activity_score: f64,

    /// How this prediction was produced
    pub outcome: MatchOutcome,
}

impl Prediction {
    /// Whether a rule matched exactly
    ///
    /// `false` covers both the default fallback and the unknown-gene marker;
    /// check [`Prediction::outcome`] to tell them apart.
    pub fn matched(&self) -> bool {
        self.outcome == MatchOutcome::Matched
    }
}

/// Runs a prediction against a table snapshot
///
/// Rules are evaluated in the table's stored order; the first match wins.
pub fn predict_in_table(
    table: &RuleTable,
    gene: &GeneSymbol,
    observed: &AlleleObservations,
) -> Prediction {
    let Some(gene_rules) = table.gene(gene) else {
        tracing::warn!(gene = %gene, "Prediction requested for unknown gene");
        return Prediction {
            gene: gene.clone(),
            genotype: String::new(),
            phenotype: String::new(),
            activity_score: 0.0,
            outcome: MatchOutcome::UnknownGene,
        };
    };

    for rule in &gene_rules.rules {
        if rule.matches(observed) {
            return Prediction {
                gene: gene.clone(),
                genotype: rule.genotype.clone(),
                phenotype: rule.phenotype.clone(),
                activity_score: rule.activity_score,
                outcome: MatchOutcome::Matched,
            };
        }
    }

    tracing::debug!(
        gene = %gene,
        observed_slots = observed.len(),
        "No rule matched; using gene default"
    );

    Prediction {
        gene: gene.clone(),
        genotype: gene_rules.default_rule.genotype.clone(),
        phenotype: gene_rules.default_rule.phenotype.clone(),
        activity_score: gene_rules.default_rule.activity_score,
        outcome: MatchOutcome::NoMatchDefault,
    }
}

/// The rule engine: prediction and introspection over the shared rulebase
///
/// Cheap to clone; every operation works on a consistent table snapshot taken
/// at call time, so a concurrent reload never shows a half-updated table.
///
/// # Examples
///
/// ```no_run
/// use mendel::rulebase::{RuleEngine, RulebaseHandle, FileRulebaseSource};
/// use mendel::domain::{GeneSymbol, request::AlleleObservations};
/// use std::sync::Arc;
///
/// # async fn example() -> mendel::domain::Result<()> {
/// let source = Arc::new(FileRulebaseSource::new("rulebase.toml"));
/// let handle = Arc::new(RulebaseHandle::load(source).await?);
/// let engine = RuleEngine::new(handle);
///
/// let gene = GeneSymbol::new("CYP2D6").map_err(mendel::domain::MendelError::Validation)?;
/// let observed = AlleleObservations::from_pairs([("*10", "C/C")]);
/// let prediction = engine.predict(&gene, &observed);
/// println!("{} -> {}", prediction.genotype, prediction.phenotype);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rulebase: Arc<RulebaseHandle>,
}

impl RuleEngine {
    /// Create an engine over the shared rulebase handle
    pub fn new(rulebase: Arc<RulebaseHandle>) -> Self {
        Self { rulebase }
    }

    /// Predicts genotype, phenotype and activity score for observed alleles
    ///
    /// See [`predict_in_table`] for the matching semantics. Pure and
    /// deterministic for a given table snapshot.
    pub fn predict(&self, gene: &GeneSymbol, observed: &AlleleObservations) -> Prediction {
        predict_in_table(&self.rulebase.snapshot(), gene, observed)
    }

    /// Looks up a diplotype reference row by (gene, label)
    ///
    /// The label is normalized (trailing `" or ..."` suffix stripped, trimmed)
    /// before the exact lookup. Returns `None` when no row exists; the caller
    /// falls back to its own summary/recommendation text.
    pub fn lookup_diplotype(&self, gene: &GeneSymbol, label: &str) -> Option<DiplotypeRow> {
        self.rulebase.snapshot().diplotype(gene, label).cloned()
    }

    /// The allele slots configured for a gene, in display order
    ///
    /// Returns `None` when the gene is unknown.
    pub fn available_allele_slots(&self, gene: &GeneSymbol) -> Option<Vec<String>> {
        self.rulebase
            .snapshot()
            .gene(gene)
            .map(|g| g.allele_slots.clone())
    }

    /// The deduplicated values a slot takes across a gene's rules
    ///
    /// Returns `None` when the gene is unknown, `Some(vec![])` when the slot
    /// is never constrained.
    pub fn possible_values_for_slot(
        &self,
        gene: &GeneSymbol,
        slot: &str,
    ) -> Option<Vec<String>> {
        self.rulebase
            .snapshot()
            .gene(gene)
            .map(|g| g.possible_values_for_slot(slot))
    }

    /// Gene symbols present in the current snapshot
    pub fn known_genes(&self) -> Vec<GeneSymbol> {
        self.rulebase
            .snapshot()
            .genes
            .iter()
            .map(|g| g.symbol.clone())
            .collect()
    }
}
