//! Confirm command implementation
//!
//! Records one of the two required confirmations on a request against the
//! configured datastore.

use crate::config::load_config;
use crate::domain::errors::WorkflowError;
use crate::domain::ids::{RequestId, StaffId};
use crate::workflow::WorkflowService;
use clap::Args;
use std::str::FromStr;

/// Arguments for the confirm command
#[derive(Args, Debug)]
pub struct ConfirmArgs {
    /// Request to confirm
    #[arg(long)]
    pub request: String,

    /// Confirming staff member
    #[arg(long)]
    pub staff: String,
}

impl ConfirmArgs {
    /// Execute the confirm command
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
        match service.confirm(&request_id, &staff_id).await {
            Ok(outcome) => {
                println!("✅ {}", outcome.message());
                println!();
                println!("  Status: {}", outcome.status());
                Ok(0)
            }
            Err(e @ WorkflowError::ConcurrentUpdate) => {
                println!("⚠️  {e}");
                Ok(1)
            }
            Err(e) => {
                println!("❌ Confirmation denied: {e}");
                Ok(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_args_creation() {
        let args = ConfirmArgs {
            request: "req-1".to_string(),
            staff: "alice".to_string(),
        };
        let _ = format!("{args:?}");
    }
}
