//! Predict command implementation
//!
//! Runs the rule engine against allele observations supplied on the command
//! line (`--allele "*10=C/C"`) or in a JSON file, and prints the prediction.

use crate::cli::commands::load_rulebase;
use crate::config::load_config;
use crate::domain::ids::GeneSymbol;
use crate::domain::request::AlleleObservations;
use crate::rulebase::engine::{MatchOutcome, RuleEngine};
use clap::Args;
use std::sync::Arc;

/// Arguments for the predict command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Gene to predict for, e.g. CYP2D6
    #[arg(long)]
    pub gene: String,

    /// Observed allele as SLOT=VALUE, repeatable
    #[arg(long = "allele", value_name = "SLOT=VALUE")]
    pub alleles: Vec<String>,

    /// JSON file with a {"slot": "value"} object instead of --allele flags
    #[arg(long, conflicts_with = "alleles")]
    pub file: Option<String>,

    /// Print the raw prediction as JSON
    #[arg(long)]
    pub json: bool,
}

impl PredictArgs {
    /// Execute the predict command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let observations = match self.collect_observations() {
            Ok(obs) => obs,
            Err(message) => {
                eprintln!("❌ {message}");
                return Ok(2);
            }
        };

        let gene = match GeneSymbol::new(&self.gene) {
            Ok(gene) => gene,
            Err(e) => {
                eprintln!("❌ Invalid gene symbol: {e}");
                return Ok(2);
            }
        };

        let handle = Arc::new(load_rulebase(&config).await?);
        let engine = RuleEngine::new(handle);
        let prediction = engine.predict(&gene, &observations);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        } else {
            match prediction.outcome {
                MatchOutcome::Matched => {
                    println!("✅ Rule matched");
                }
                MatchOutcome::NoMatchDefault => {
                    println!("⚠️  No exact rule match; gene default applied");
                }
                MatchOutcome::UnknownGene => {
                    println!("❌ Gene '{}' is not present in the rulebase", self.gene);
                    return Ok(1);
                }
            }
            println!();
            println!("  Gene:           {}", prediction.gene);
            println!("  Genotype:       {}", prediction.genotype);
            println!("  Phenotype:      {}", prediction.phenotype);
            println!("  Activity score: {}", prediction.activity_score);
        }

        Ok(if prediction.outcome == MatchOutcome::UnknownGene {
            1
        } else {
            0
        })
    }

    fn collect_observations(&self) -> Result<AlleleObservations, String> {
        if let Some(path) = &self.file {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read allele file {path}: {e}"))?;
            return serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse allele file {path}: {e}"));
        }

        let mut observations = AlleleObservations::new();
        for pair in &self.alleles {
            let (slot, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("Invalid --allele '{pair}'; expected SLOT=VALUE"))?;
            if slot.is_empty() || value.is_empty() {
                return Err(format!("Invalid --allele '{pair}'; expected SLOT=VALUE"));
            }
            observations.insert(slot, value);
        }
        Ok(observations)
    }
}
