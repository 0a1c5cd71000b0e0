//! Rulebase sources
//!
//! A [`RulebaseSource`] produces a fresh [`RuleTable`]. The file source reads
//! a TOML snapshot from disk; the REST datastore adapter implements the same
//! trait against the hosted rule reference tables.

use crate::domain::errors::MendelError;
use crate::domain::Result;
use crate::rulebase::model::RuleTable;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Source of rulebase reference data
///
/// Implementations must return the complete table in its stored rule order;
/// the handle swaps it in atomically.
#[async_trait]
pub trait RulebaseSource: Send + Sync {
    /// Loads the complete rule table
    ///
    /// # Errors
    ///
    /// Returns an error if the source is unreachable, unparseable, or the
    /// table fails structural validation.
    async fn load(&self) -> Result<RuleTable>;

    /// Human-readable description of where the table comes from
    fn describe(&self) -> String;
}

/// Rulebase source backed by a TOML file on disk
///
/// # Examples
///
/// ```no_run
/// use mendel::rulebase::{FileRulebaseSource, RulebaseSource};
///
/// # async fn example() -> mendel::domain::Result<()> {
/// let source = FileRulebaseSource::new("rulebase.toml");
/// let table = source.load().await?;
/// println!("{} genes loaded", table.gene_count());
/// # Ok(())
/// # }
/// ```
pub struct FileRulebaseSource {
    path: PathBuf,
}

impl FileRulebaseSource {
    /// Create a file source for the given path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The configured path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RulebaseSource for FileRulebaseSource {
    async fn load(&self) -> Result<RuleTable> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            MendelError::Rulebase(format!(
                "Failed to read rulebase file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let table: RuleTable = toml::from_str(&contents).map_err(|e| {
            MendelError::Rulebase(format!(
                "Failed to parse rulebase file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        table.validate().map_err(MendelError::Rulebase)?;

        tracing::info!(
            path = %self.path.display(),
            genes = table.gene_count(),
            rules = table.rule_count(),
            diplotypes = table.diplotypes.len(),
            "Loaded rulebase from file"
        );

        Ok(table)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
