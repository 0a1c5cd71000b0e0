//! Shared rulebase handle with atomic reload
//!
//! The table is read-only after load and read concurrently by every caller.
//! `reload` builds the replacement table first and then swaps the `Arc` under
//! a short write lock, so in-flight readers see either the old or the new
//! table in full, never a partially-updated one.

use crate::domain::Result;
use crate::rulebase::model::RuleTable;
use crate::rulebase::source::RulebaseSource;
use std::sync::{Arc, RwLock};

/// Summary of a completed reload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadSummary {
    /// Genes in the new table
    pub genes: usize,
    /// Rules across all genes in the new table
    pub rules: usize,
    /// Diplotype reference rows in the new table
    pub diplotypes: usize,
}

/// Shared, reloadable rulebase
///
/// Constructed once at startup and passed to the engine explicitly; there is
/// no global table.
pub struct RulebaseHandle {
    table: RwLock<Arc<RuleTable>>,
    source: Arc<dyn RulebaseSource>,
}

impl RulebaseHandle {
    /// Loads the initial table from the source
    ///
    /// # Errors
    ///
    /// Returns an error if the initial load fails; the handle is never
    /// created with an empty placeholder table.
    pub async fn load(source: Arc<dyn RulebaseSource>) -> Result<Self> {
        let table = source.load().await?;
        Ok(Self {
            table: RwLock::new(Arc::new(table)),
            source,
        })
    }

    /// Creates a handle around an already-built table
    ///
    /// Used by tests and the CLI when the table comes from a fixture rather
    /// than a reloadable source.
    pub fn from_table(table: RuleTable, source: Arc<dyn RulebaseSource>) -> Self {
        Self {
            table: RwLock::new(Arc::new(table)),
            source,
        }
    }

    /// Returns the current table snapshot
    ///
    /// The returned `Arc` stays valid across reloads; callers doing several
    /// related lookups should take one snapshot and reuse it.
    pub fn snapshot(&self) -> Arc<RuleTable> {
        self.table
            .read()
            .expect("rulebase lock poisoned")
            .clone()
    }

    /// Reloads the table from the source and swaps it in atomically
    ///
    /// The new table is fully loaded and validated before the swap; a failed
    /// load leaves the current table untouched.
    pub async fn reload(&self) -> Result<ReloadSummary> {
        let new_table = self.source.load().await?;
        let summary = ReloadSummary {
            genes: new_table.gene_count(),
            rules: new_table.rule_count(),
            diplotypes: new_table.diplotypes.len(),
        };

        {
            let mut guard = self.table.write().expect("rulebase lock poisoned");
            *guard = Arc::new(new_table);
        }

        tracing::info!(
            source = %self.source.describe(),
            genes = summary.genes,
            rules = summary.rules,
            diplotypes = summary.diplotypes,
            "Rulebase reloaded"
        );

        Ok(summary)
    }

    /// Where this handle loads its table from
    pub fn source_description(&self) -> String {
        self.source.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::MendelError;
    use crate::rulebase::model::{DefaultRule, GeneRules};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        loads: AtomicUsize,
        fail: bool,
    }

    impl CountingSource {
        fn new(fail: bool) -> Self {
            Self {
                loads: AtomicUsize::new(0),
                fail,
            }
        }

        fn table_with_genes(count: usize) -> RuleTable {
            RuleTable {
                genes: (0..count)
                    .map(|i| GeneRules {
                        symbol: crate::domain::GeneSymbol::new(format!("GENE{i}")).unwrap(),
                        allele_slots: vec!["*1".to_string()],
                        rules: Vec::new(),
                        default_rule: DefaultRule {
                            genotype: "*1/*1".to_string(),
                            phenotype: "Normal Metabolizer".to_string(),
                            activity_score: 2.0,
                        },
                    })
                    .collect(),
                diplotypes: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl RulebaseSource for CountingSource {
        async fn load(&self) -> Result<RuleTable> {
            let n = self.loads.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail && n > 1 {
                return Err(MendelError::Rulebase("source unavailable".to_string()));
            }
            Ok(Self::table_with_genes(n))
        }

        fn describe(&self) -> String {
            "test:counting".to_string()
        }
    }

    #[tokio::test]
    async fn test_load_and_snapshot() {
        let handle = RulebaseHandle::load(Arc::new(CountingSource::new(false)))
            .await
            .unwrap();
        assert_eq!(handle.snapshot().gene_count(), 1);
    }

    #[tokio::test]
    async fn test_reload_swaps_table() {
        let handle = RulebaseHandle::load(Arc::new(CountingSource::new(false)))
            .await
            .unwrap();
        let before = handle.snapshot();

        let summary = handle.reload().await.unwrap();
        assert_eq!(summary.genes, 2);
        assert_eq!(handle.snapshot().gene_count(), 2);

        // The old snapshot is still fully intact for in-flight readers.
        assert_eq!(before.gene_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_current_table() {
        let handle = RulebaseHandle::load(Arc::new(CountingSource::new(true)))
            .await
            .unwrap();
        assert_eq!(handle.snapshot().gene_count(), 1);

        let result = handle.reload().await;
        assert!(result.is_err());
        assert_eq!(handle.snapshot().gene_count(), 1);
    }
}
