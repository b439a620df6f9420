//! Feedback command handler.

use super::open_service;
use clap::Args;
use helpdesk_core::{config::AppConfig, AppResult};

/// Rate an answer as helpful or not
#[derive(Args, Debug)]
pub struct FeedbackCommand {
    /// Query log id printed after an answer
    pub log_id: String,

    /// The answer was helpful
    #[arg(long, conflicts_with = "unhelpful", required_unless_present = "unhelpful")]
    pub helpful: bool,

    /// The answer was not helpful
    #[arg(long)]
    pub unhelpful: bool,
}

impl FeedbackCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing feedback command");

        let service = open_service(config)?;

        // Best effort: a failed write is logged by the service and not retried
        if service.mark_feedback(&self.log_id, self.helpful).await {
            println!("Thanks for your feedback!");
        } else {
            println!("Feedback could not be recorded.");
        }

        Ok(())
    }
}
