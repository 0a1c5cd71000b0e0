//! Init command implementation
//!
//! Writes a starter `mendel.toml` and a small example rulebase so a new
//! deployment has something to validate and predict against immediately.

use clap::Args;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# Mendel configuration
# Values of the form ${VAR} are substituted from the environment at load time.

[application]
name = "mendel"
log_level = "info"

[datastore]
base_url = "https://your-project.example.com"
api_key = "${MENDEL_DATASTORE_API_KEY}"

[storage]
base_url = "https://your-project.example.com"
public_base_url = "https://your-project.example.com/storage/v1/object/public"
bucket = "lab-documents"
api_key = "${MENDEL_STORAGE_API_KEY}"

[rulebase]
source = "file"
path = "rulebase.toml"

[reporting]
render_url = "https://render.example.com/render"
clinic_name = "Your PGx Laboratory"
clinic_address = "Street, City"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#;

const RULEBASE_TEMPLATE: &str = r#"# Example rulebase: one gene, two rules, one diplotype reference row.
# Rule order matters: the first matching rule wins.

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

[[diplotypes]]
gene = "CYP2D6"
label = "*1/*41"
phenotype = "Intermediate Metabolizer"
activity_score = 1.25
genotype_summary = "One normal-function and one decreased-function allele detected."
recommendation = "Consider alternative agent or dose adjustment per current guidelines."
"#;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,

    /// Where to write the configuration file
    #[arg(long, default_value = "mendel.toml")]
    pub output: String,

    /// Where to write the example rulebase
    #[arg(long, default_value = "rulebase.toml")]
    pub rulebase_output: String,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        for (path, contents) in [
            (&self.output, CONFIG_TEMPLATE),
            (&self.rulebase_output, RULEBASE_TEMPLATE),
        ] {
            if Path::new(path).exists() && !self.force {
                println!("❌ {path} already exists (use --force to overwrite)");
                return Ok(2);
            }
            std::fs::write(path, contents)?;
            println!("✅ Wrote {path}");
        }

        println!();
        println!("Next steps:");
        println!("  1. Fill in the datastore and storage URLs and API keys");
        println!("  2. Replace the example rulebase with your laboratory's tables");
        println!("  3. Run: mendel validate-config");
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::MendelConfig;
    use crate::rulebase::model::RuleTable;

    #[test]
    fn test_config_template_parses_after_substitution() {
        let substituted = CONFIG_TEMPLATE
            .replace("${MENDEL_DATASTORE_API_KEY}", "key")
            .replace("${MENDEL_STORAGE_API_KEY}", "key");
        let config: MendelConfig = toml::from_str(&substituted).unwrap();
        assert_eq!(config.application.name, "mendel");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rulebase_template_parses_and_validates() {
        let table: RuleTable = toml::from_str(RULEBASE_TEMPLATE).unwrap();
        assert_eq!(table.gene_count(), 1);
        assert_eq!(table.rule_count(), 2);
        assert!(table.validate().is_ok());
    }

    #[tokio::test]
    async fn test_init_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("mendel.toml");
        std::fs::write(&config_path, "existing").unwrap();

        let args = InitArgs {
            force: false,
            output: config_path.to_string_lossy().to_string(),
            rulebase_output: dir
                .path()
                .join("rulebase.toml")
                .to_string_lossy()
                .to_string(),
        };

        let code = args.execute().await.unwrap();
        assert_eq!(code, 2);
        assert_eq!(std::fs::read_to_string(&config_path).unwrap(), "existing");
    }

    #[tokio::test]
    async fn test_init_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let args = InitArgs {
            force: false,
            output: dir.path().join("mendel.toml").to_string_lossy().to_string(),
            rulebase_output: dir
                .path()
                .join("rulebase.toml")
                .to_string_lossy()
                .to_string(),
        };

        let code = args.execute().await.unwrap();
        assert_eq!(code, 0);
        assert!(dir.path().join("mendel.toml").exists());
        assert!(dir.path().join("rulebase.toml").exists());
    }
}
