//! Rules command implementation
//!
//! Introspects the loaded rulebase: without arguments lists the known genes,
//! with `--gene` lists that gene's allele slots, and with `--gene --slot`
//! lists the values the slot takes across the gene's rules.

use crate::cli::commands::load_rulebase;
use crate::config::load_config;
use crate::domain::ids::GeneSymbol;
use crate::rulebase::engine::RuleEngine;
use clap::Args;
use std::sync::Arc;

/// Arguments for the rules command
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Gene to inspect
    #[arg(long)]
    pub gene: Option<String>,

    /// Allele slot to list possible values for (requires --gene)
    #[arg(long, requires = "gene")]
    pub slot: Option<String>,
}

impl RulesArgs {
    /// Execute the rules command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let handle = Arc::new(load_rulebase(&config).await?);
        let engine = RuleEngine::new(handle);

        let Some(gene_name) = &self.gene else {
            let genes = engine.known_genes();
            println!("Genes in rulebase ({}):", genes.len());
            for gene in genes {
                println!("  {gene}");
            }
            return Ok(0);
        };

        let gene = match GeneSymbol::new(gene_name) {
            Ok(gene) => gene,
            Err(e) => {
                eprintln!("❌ Invalid gene symbol: {e}");
                return Ok(2);
            }
        };

        if let Some(slot) = &self.slot {
            match engine.possible_values_for_slot(&gene, slot) {
                Some(values) if values.is_empty() => {
                    println!("Slot '{slot}' is never constrained by {gene}'s rules");
                }
                Some(values) => {
                    println!("Values for {gene} slot '{slot}':");
                    for value in values {
                        println!("  {value}");
                    }
                }
                None => {
                    println!("❌ Gene '{gene}' is not present in the rulebase");
                    return Ok(1);
                }
            }
            return Ok(0);
        }

        match engine.available_allele_slots(&gene) {
            Some(slots) => {
                println!("Allele slots for {gene}:");
                for slot in slots {
                    println!("  {slot}");
                }
                Ok(0)
            }
            None => {
                println!("❌ Gene '{gene}' is not present in the rulebase");
                Ok(1)
            }
        }
    }
}
