//! Rulebase data model
//!
//! Reference data for genotype-to-phenotype translation: per-gene rule lists,
//! per-gene default rules, and the diplotype reference table. The whole table
//! is immutable after load; [`crate::rulebase::RulebaseHandle`] swaps it
//! atomically on reload.
//!
//! Rule order is load-bearing. Two rules can both match an ambiguous
//! observation set; the first one in table order wins, so the table preserves
//! the order its source delivered.

use crate::domain::ids::GeneSymbol;
use crate::domain::request::AlleleObservations;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A partial-match genotype rule
///
/// Matches an observation set iff every slot listed in `when` is present with
/// exactly the expected value. Slots the rule does not mention are wildcards.
///
/// # Examples
///
/// ```
/// use mendel::rulebase::model::Rule;
/// use mendel::domain::request::AlleleObservations;
/// use std::collections::BTreeMap;
///
/// let rule = Rule {
///     when: BTreeMap::from([("*10".to_string(), "C/C".to_string())]),
///     genotype: "*10/*10".to_string(),
///     phenotype: "Intermediate Metabolizer".to_string(),
///     activity_score: 0.5,
/// };
///
/// let observed = AlleleObservations::from_pairs([("*10", "C/C"), ("*41", "G/G")]);
/// assert!(rule.matches(&observed));
///
/// let other = AlleleObservations::from_pairs([("*10", "C/T")]);
/// assert!(!rule.matches(&other));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Resulting diplotype label
    pub genotype: String,

    /// Resulting metabolizer phenotype
    pub phenotype: String,

    /// Resulting combined activity score
    pub activity_score: f64,

    /// Slot name -> expected observed value
    pub when: BTreeMap<String, String>,
}

impl Rule {
    /// Whether this rule matches the observation set
    ///
    /// Every slot the rule specifies must be present and equal; missing slots
    /// in the observation set fail the rule, slots the rule doesn't mention
    /// are ignored.
    pub fn matches(&self, observed: &AlleleObservations) -> bool {
        self.when
            .iter()
            .all(|(slot, expected)| observed.get(slot) == Some(expected.as_str()))
    }
}

/// Fallback values for a gene when no rule matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultRule {
    /// Fallback diplotype label
    pub genotype: String,

    /// Fallback phenotype
    pub phenotype: String,

    /// Fallback activity score
    pub activity_score: f64,
}

/// The full rule set for one pharmacogene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneRules {
    /// Gene symbol, e.g. `CYP2D6`
    pub symbol: GeneSymbol,

    /// Named allele slots this gene's rules draw on, in display order
    pub allele_slots: Vec<String>,

    /// Rules in evaluation order; first match wins
    #[serde(default)]
    pub rules: Vec<Rule>,

    /// Fallback when no rule matches
    pub default_rule: DefaultRule,
}

impl GeneRules {
    /// The deduplicated set of values a slot takes across this gene's rules
    ///
    /// Used to populate choice lists; order is not significant, uniqueness is.
    pub fn possible_values_for_slot(&self, slot: &str) -> Vec<String> {
        let mut values: Vec<String> = Vec::new();
        for rule in &self.rules {
            if let Some(value) = rule.when.get(slot) {
                if !values.contains(value) {
                    values.push(value.clone());
                }
            }
        }
        values
    }
}

/// One row of the diplotype reference table
///
/// Keyed by exact (gene, normalized label); used when report generation is
/// driven by an already-known diplotype label rather than raw per-slot calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiplotypeRow {
    /// Gene this row belongs to
    pub gene: GeneSymbol,

    /// Diplotype label, e.g. `*1/*41`
    pub label: String,

    /// Metabolizer phenotype for this diplotype
    pub phenotype: String,

    /// Combined activity score for this diplotype
    pub activity_score: f64,

    /// Interpretation text for the report
    pub genotype_summary: String,

    /// Clinical recommendation text for the report
    pub recommendation: String,
}

/// Normalizes a diplotype label for reference-table lookup
///
/// Strips a trailing `" or ..."` alternative-notation suffix and surrounding
/// whitespace, so `"*1/*41 or *1/*41xN"` compares as `"*1/*41"`.
///
/// # Examples
///
/// ```
/// use mendel::rulebase::model::normalize_diplotype_label;
///
/// assert_eq!(normalize_diplotype_label("*1/*41 or *1/*41xN"), "*1/*41");
/// assert_eq!(normalize_diplotype_label("  *1/*1  "), "*1/*1");
/// ```
pub fn normalize_diplotype_label(label: &str) -> &str {
    let trimmed = label.trim();
    match trimmed.find(" or ") {
        Some(idx) => trimmed[..idx].trim_end(),
        None => trimmed,
    }
}

/// The loaded rulebase: every gene's rules plus the diplotype reference table
///
/// Treated as immutable read-only reference data for the lifetime of a
/// snapshot; reload replaces the whole table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    /// Per-gene rule sets
    #[serde(default)]
    pub genes: Vec<GeneRules>,

    /// Diplotype reference rows
    #[serde(default)]
    pub diplotypes: Vec<DiplotypeRow>,
}

impl RuleTable {
    /// Looks up the rule set for a gene (exact symbol match)
    pub fn gene(&self, symbol: &GeneSymbol) -> Option<&GeneRules> {
        self.genes.iter().find(|g| &g.symbol == symbol)
    }

    /// Looks up a diplotype reference row by exact (gene, normalized label)
    pub fn diplotype(&self, gene: &GeneSymbol, label: &str) -> Option<&DiplotypeRow> {
        let normalized = normalize_diplotype_label(label);
        self.diplotypes
            .iter()
            .find(|row| &row.gene == gene && row.label == normalized)
    }

    /// Number of genes in the table
    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    /// Total number of rules across all genes
    pub fn rule_count(&self) -> usize {
        self.genes.iter().map(|g| g.rules.len()).sum()
    }

    /// Validates structural soundness of the loaded table
    ///
    /// Every rule must constrain at least one slot, and every constrained slot
    /// must be declared in the gene's `allele_slots` list.
    pub fn validate(&self) -> Result<(), String> {
        for gene in &self.genes {
            for (idx, rule) in gene.rules.iter().enumerate() {
                if rule.when.is_empty() {
                    return Err(format!(
                        "Gene {}: rule {} constrains no allele slots",
                        gene.symbol, idx
                    ));
                }
                for slot in rule.when.keys() {
                    if !gene.allele_slots.contains(slot) {
                        return Err(format!(
                            "Gene {}: rule {} references undeclared slot '{}'",
                            gene.symbol, idx, slot
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gene(symbol: &str) -> GeneSymbol {
        GeneSymbol::new(symbol).unwrap()
    }

    fn rule(when: &[(&str, &str)], genotype: &str, phenotype: &str, score: f64) -> Rule {
        Rule {
            when: when
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            genotype: genotype.to_string(),
            phenotype: phenotype.to_string(),
            activity_score: score,
        }
    }

    fn sample_table() -> RuleTable {
        RuleTable {
            genes: vec![GeneRules {
                symbol: gene("CYP2D6"),
                allele_slots: vec!["*4".to_string(), "*10".to_string(), "*41".to_string()],
                rules: vec![
                    rule(
                        &[("*10", "C/C"), ("*41", "G/G")],
                        "*10/*10",
                        "Intermediate Metabolizer",
                        0.5,
                    ),
                    rule(&[("*10", "C/C")], "*1/*10", "Normal Metabolizer", 1.5),
                ],
                default_rule: DefaultRule {
                    genotype: "*1/*1".to_string(),
                    phenotype: "Normal Metabolizer".to_string(),
                    activity_score: 2.0,
                },
            }],
            diplotypes: vec![DiplotypeRow {
                gene: gene("CYP2D6"),
                label: "*1/*41".to_string(),
                phenotype: "Intermediate Metabolizer".to_string(),
                activity_score: 1.25,
                genotype_summary: "One normal and one decreased function allele.".to_string(),
                recommendation: "Consider dose adjustment.".to_string(),
            }],
        }
    }

    #[test]
    fn test_rule_matches_exact_subset() {
        let r = rule(&[("*10", "C/C")], "*1/*10", "Normal Metabolizer", 1.5);
        let observed = AlleleObservations::from_pairs([("*10", "C/C"), ("*4", "G/G")]);
        assert!(r.matches(&observed));
    }

    #[test]
    fn test_rule_missing_slot_fails() {
        let r = rule(&[("*10", "C/C"), ("*41", "G/G")], "x", "y", 0.0);
        let observed = AlleleObservations::from_pairs([("*10", "C/C")]);
        assert!(!r.matches(&observed));
    }

    #[test]
    fn test_rule_mismatched_value_fails() {
        let r = rule(&[("*10", "C/C")], "x", "y", 0.0);
        let observed = AlleleObservations::from_pairs([("*10", "C/T")]);
        assert!(!r.matches(&observed));
    }

    #[test]
    fn test_gene_lookup_exact() {
        let table = sample_table();
        assert!(table.gene(&gene("CYP2D6")).is_some());
        assert!(table.gene(&gene("CYP2C19")).is_none());
    }

    #[test]
    fn test_diplotype_lookup_normalizes_label() {
        let table = sample_table();
        let row = table.diplotype(&gene("CYP2D6"), "*1/*41 or *1/*41xN").unwrap();
        assert_eq!(row.label, "*1/*41");
        assert!(table.diplotype(&gene("CYP2D6"), "*9/*9").is_none());
    }

    #[test]
    fn test_normalize_diplotype_label() {
        assert_eq!(normalize_diplotype_label("*1/*41 or *1/*41xN"), "*1/*41");
        assert_eq!(normalize_diplotype_label(" *1/*41 "), "*1/*41");
        assert_eq!(normalize_diplotype_label("*1/*41"), "*1/*41");
    }

    #[test]
    fn test_possible_values_deduplicated() {
        let table = sample_table();
        let g = table.gene(&gene("CYP2D6")).unwrap();
        let values = g.possible_values_for_slot("*10");
        assert_eq!(values, vec!["C/C".to_string()]);
        assert!(g.possible_values_for_slot("*4").is_empty());
    }

    #[test]
    fn test_validate_rejects_undeclared_slot() {
        let mut table = sample_table();
        table.genes[0]
            .rules
            .push(rule(&[("*99", "A/A")], "x", "y", 0.0));
        assert!(table.validate().is_err());
        assert!(sample_table().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unconstrained_rule() {
        let mut table = sample_table();
        table.genes[0].rules.push(Rule {
            when: BTreeMap::new(),
            genotype: "x".to_string(),
            phenotype: "y".to_string(),
            activity_score: 0.0,
        });
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_table_toml_round_trip() {
        let table = sample_table();
        let toml_text = toml::to_string(&table).unwrap();
        let parsed: RuleTable = toml::from_str(&toml_text).unwrap();
        assert_eq!(parsed, table);
    }
}
