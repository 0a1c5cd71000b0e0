//! Submit command implementation
//!
//! Attaches allele observations to a pending request against the configured
//! datastore, running the engine and creating the report.

use crate::config::load_config;
use crate::domain::ids::RequestId;
use crate::domain::request::AlleleObservations;
use crate::workflow::WorkflowService;
use clap::Args;
use std::str::FromStr;

/// Arguments for the submit command
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Request to attach allele data to
    #[arg(long)]
    pub request: String,

    /// Observed allele as SLOT=VALUE, repeatable
    #[arg(long = "allele", value_name = "SLOT=VALUE", required = true)]
    pub alleles: Vec<String>,
}

impl SubmitArgs {
    /// Execute the submit command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let request_id = match RequestId::from_str(&self.request) {
            Ok(id) => id,
            Err(e) => {
                eprintln!("❌ Invalid request id: {e}");
                return Ok(2);
            }
        };

        let mut observations = AlleleObservations::new();
        for pair in &self.alleles {
            let Some((slot, value)) = pair.split_once('=') else {
                eprintln!("❌ Invalid --allele '{pair}'; expected SLOT=VALUE");
                return Ok(2);
            };
            observations.insert(slot, value);
        }

        let service = WorkflowService::from_config(&config).await?;
        match service.submit_alleles(&request_id, observations).await {
            Ok(outcome) => {
                println!("✅ Allele data submitted");
                println!();
                println!("  Status:         {}", outcome.request.status);
                println!("  Genotype:       {}", outcome.prediction.genotype);
                println!("  Phenotype:      {}", outcome.prediction.phenotype);
                println!("  Activity score: {}", outcome.prediction.activity_score);
                if !outcome.report.pdf_path.is_empty() {
                    println!("  Report PDF:     {}", outcome.report.pdf_path);
                }
                Ok(0)
            }
            Err(e) => {
                println!("❌ Submission denied: {e}");
                Ok(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_args_creation() {
        let args = SubmitArgs {
            request: "req-1".to_string(),
            alleles: vec!["*10=C/C".to_string()],
        };
        let _ = format!("{args:?}");
    }
}
