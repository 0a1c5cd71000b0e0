//! Reject command implementation
//!
//! Rejects a request with a free-text reason against the configured
//! datastore.

use crate::config::load_config;
use crate::domain::ids::{RequestId, StaffId};
use crate::workflow::WorkflowService;
use clap::Args;
use std::str::FromStr;

/// Arguments for the reject command
#[derive(Args, Debug)]
pub struct RejectArgs {
    /// Request to reject
    #[arg(long)]
    pub request: String,

    /// Rejecting staff member
    #[arg(long)]
    pub staff: String,

    /// Rejection reason, stored verbatim
    #[arg(long)]
    pub reason: String,
}

impl RejectArgs {
    /// Execute the reject command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let (request_id, staff_id) =
            match (RequestId::from_str(&self.request), StaffId::from_str(&self.staff)) {
                (Ok(request_id), Ok(staff_id)) => (request_id, staff_id),
                (Err(e), _) | (_, Err(e)) => {
                    eprintln!("❌ Invalid argument: {e}");
                    return Ok(2);
                }
            };

        let service = WorkflowService::from_config(&config).await?;
        match service.reject(&request_id, &staff_id, &self.reason).await {
            Ok(outcome) => {
                println!("✅ {}", outcome.message());
                println!();
                println!("  Status: {}", outcome.request.status);
                println!(
                    "  Reason: {}",
                    outcome.request.rejection_reason.as_deref().unwrap_or("-")
                );
                Ok(0)
            }
            Err(e) => {
                println!("❌ Rejection denied: {e}");
                Ok(1)
            }
        }
    }
}
