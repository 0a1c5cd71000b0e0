//! Rule engine behavior over a file-loaded rulebase

use mendel::domain::ids::GeneSymbol;
use mendel::domain::request::AlleleObservations;
use mendel::rulebase::{FileRulebaseSource, MatchOutcome, RuleEngine, RulebaseHandle};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use test_case::test_case;

/// Two CYP2D6 rules deliberately overlap: an observation set with
/// *10=C/C and *41=G/G satisfies both, and table order must decide.
const RULEBASE: &str = r#"
[[genes]]
symbol = "CYP2D6"
allele_slots = ["*4", "*10", "*41"]

[genes.default_rule]
genotype = "*1/*1"
phenotype = "Normal Metabolizer"
activity_score = 2.0

[[genes.rules]]
genotype = "*10/*10"
phenotype = "Intermediate Metabolizer"
activity_score = 0.5

[genes.rules.when]
"*10" = "C/C"
"*41" = "G/G"

[[genes.rules]]
genotype = "*1/*10"
phenotype = "Normal Metabolizer"
activity_score = 1.5

[genes.rules.when]
"*10" = "C/C"

[[genes]]
symbol = "CYP2C19"
allele_slots = ["*2", "*3"]

[genes.default_rule]
genotype = "*1/*1"
phenotype = "Normal Metabolizer"
activity_score = 2.0

[[genes.rules]]
genotype = "*2/*2"
phenotype = "Poor Metabolizer"
activity_score = 0.0

[genes.rules.when]
"*2" = "A/A"

[[diplotypes]]
gene = "CYP2D6"
label = "*1/*41"
phenotype = "Intermediate Metabolizer"
activity_score = 1.25
genotype_summary = "One normal-function and one decreased-function allele detected."
recommendation = "Consider alternative agent or dose adjustment per current guidelines."
"#;

async fn engine_from_fixture() -> (RuleEngine, NamedTempFile) {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(RULEBASE.as_bytes()).unwrap();
    file.flush().unwrap();

    let source = Arc::new(FileRulebaseSource::new(file.path()));
    let handle = Arc::new(RulebaseHandle::load(source).await.unwrap());
    (RuleEngine::new(handle), file)
}

fn gene(symbol: &str) -> GeneSymbol {
    GeneSymbol::new(symbol).unwrap()
}

#[tokio::test]
async fn first_rule_wins_when_two_rules_overlap() {
    let (engine, _file) = engine_from_fixture().await;
    let observed = AlleleObservations::from_pairs([("*10", "C/C"), ("*41", "G/G")]);

    let prediction = engine.predict(&gene("CYP2D6"), &observed);

    assert_eq!(prediction.outcome, MatchOutcome::Matched);
    assert_eq!(prediction.genotype, "*10/*10");
    assert_eq!(prediction.phenotype, "Intermediate Metabolizer");
    assert!((prediction.activity_score - 0.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn wildcard_rule_matches_on_subset_agreement() {
    let (engine, _file) = engine_from_fixture().await;
    // Only the second rule's single constraint agrees; *41 differs from the
    // first rule's expectation and any extra slots are ignored.
    let observed =
        AlleleObservations::from_pairs([("*10", "C/C"), ("*41", "G/A"), ("*4", "G/G")]);

    let prediction = engine.predict(&gene("CYP2D6"), &observed);

    assert_eq!(prediction.outcome, MatchOutcome::Matched);
    assert_eq!(prediction.genotype, "*1/*10");
}

#[tokio::test]
async fn unknown_gene_is_flagged_not_defaulted() {
    let (engine, _file) = engine_from_fixture().await;
    let observed = AlleleObservations::from_pairs([("*10", "C/C")]);

    let prediction = engine.predict(&gene("CYP3A5"), &observed);

    assert_eq!(prediction.outcome, MatchOutcome::UnknownGene);
    assert!(!prediction.matched());
    assert!(prediction.genotype.is_empty());
    assert!(prediction.phenotype.is_empty());
    assert_eq!(prediction.activity_score, 0.0);
}

#[tokio::test]
async fn no_match_returns_gene_default_with_marker() {
    let (engine, _file) = engine_from_fixture().await;
    let observed = AlleleObservations::from_pairs([("*10", "T/T")]);

    let prediction = engine.predict(&gene("CYP2D6"), &observed);

    assert_eq!(prediction.outcome, MatchOutcome::NoMatchDefault);
    assert!(!prediction.matched());
    // Default values, not the unknown-gene placeholders
    assert_eq!(prediction.genotype, "*1/*1");
    assert_eq!(prediction.phenotype, "Normal Metabolizer");
    assert!((prediction.activity_score - 2.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn prediction_is_pure_and_deterministic() {
    let (engine, _file) = engine_from_fixture().await;
    let observed = AlleleObservations::from_pairs([("*10", "C/C"), ("*41", "G/G")]);

    let first = engine.predict(&gene("CYP2D6"), &observed);
    for _ in 0..20 {
        let again = engine.predict(&gene("CYP2D6"), &observed);
        assert_eq!(again.genotype, first.genotype);
        assert_eq!(again.phenotype, first.phenotype);
        assert_eq!(again.activity_score, first.activity_score);
        assert_eq!(again.outcome, first.outcome);
    }
}

#[test_case("*1/*41", true ; "exact label")]
#[test_case("*1/*41 or *1/*41xN", true ; "alternative suffix stripped")]
#[test_case("  *1/*41  ", true ; "surrounding whitespace trimmed")]
#[test_case("*9/*9", false ; "absent label")]
#[tokio::test]
async fn diplotype_lookup_normalizes_label(label: &str, expect_hit: bool) {
    let (engine, _file) = engine_from_fixture().await;

    let row = engine.lookup_diplotype(&gene("CYP2D6"), label);
    assert_eq!(row.is_some(), expect_hit);
    if let Some(row) = row {
        assert_eq!(row.label, "*1/*41");
        assert_eq!(row.phenotype, "Intermediate Metabolizer");
    }
}

#[tokio::test]
async fn diplotype_lookup_misses_for_unknown_gene() {
    let (engine, _file) = engine_from_fixture().await;
    assert!(engine.lookup_diplotype(&gene("CYP3A5"), "*1/*41").is_none());
}

#[tokio::test]
async fn introspection_lists_slots_and_values() {
    let (engine, _file) = engine_from_fixture().await;

    let slots = engine.available_allele_slots(&gene("CYP2D6")).unwrap();
    assert_eq!(slots, vec!["*4", "*10", "*41"]);

    // "C/C" appears in two rules but must be listed once.
    let values = engine
        .possible_values_for_slot(&gene("CYP2D6"), "*10")
        .unwrap();
    assert_eq!(values, vec!["C/C".to_string()]);

    // Declared but never constrained slot
    let values = engine
        .possible_values_for_slot(&gene("CYP2D6"), "*4")
        .unwrap();
    assert!(values.is_empty());

    // Unknown gene distinguishes from empty
    assert!(engine.available_allele_slots(&gene("CYP3A5")).is_none());
    assert!(engine
        .possible_values_for_slot(&gene("CYP3A5"), "*10")
        .is_none());
}

#[tokio::test]
async fn reload_swaps_table_atomically_for_snapshots() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(RULEBASE.as_bytes()).unwrap();
    file.flush().unwrap();

    let source = Arc::new(FileRulebaseSource::new(file.path()));
    let handle = Arc::new(RulebaseHandle::load(source).await.unwrap());
    let engine = RuleEngine::new(handle.clone());

    assert_eq!(engine.known_genes().len(), 2);

    // Rewrite the file without the CYP2C19 gene and reload.
    let reduced: String = {
        let idx = RULEBASE.find("[[genes]]\nsymbol = \"CYP2C19\"").unwrap();
        let tail = RULEBASE.find("[[diplotypes]]").unwrap();
        format!("{}{}", &RULEBASE[..idx], &RULEBASE[tail..])
    };
    std::fs::write(file.path(), reduced).unwrap();

    let summary = handle.reload().await.unwrap();
    assert_eq!(summary.genes, 1);
    assert_eq!(engine.known_genes().len(), 1);
}
