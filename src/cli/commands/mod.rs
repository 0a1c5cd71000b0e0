//! CLI command implementations

pub mod confirm;
pub mod init;
pub mod predict;
pub mod reject;
pub mod rules;
pub mod submit;
pub mod validate;

use crate::adapters::datastore::RestDatastore;
use crate::config::schema::{MendelConfig, RulebaseSourceKind};
use crate::domain::errors::MendelError;
use crate::rulebase::{FileRulebaseSource, RulebaseHandle, RulebaseSource};
use std::sync::Arc;

/// Builds the configured rulebase handle
///
/// Shared by the commands that need a loaded table.
pub(crate) async fn load_rulebase(config: &MendelConfig) -> crate::domain::Result<RulebaseHandle> {
    let source: Arc<dyn RulebaseSource> = match config.rulebase.source {
        RulebaseSourceKind::File => {
            let path = config.rulebase.path.as_deref().ok_or_else(|| {
                MendelError::Configuration("rulebase.path is not configured".to_string())
            })?;
            Arc::new(FileRulebaseSource::new(path))
        }
        RulebaseSourceKind::Datastore => {
            Arc::new(RestDatastore::new(config.datastore.clone()))
        }
    };

    RulebaseHandle::load(source).await
}
