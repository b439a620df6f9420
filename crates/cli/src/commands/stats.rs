//! Stats command handler.
//!
//! Handles usage statistics display.

use super::{open_service, print_json, resolve_session};
use clap::Args;
use helpdesk_core::{config::AppConfig, AppResult};
use helpdesk_faq::{compute_stats, require_admin};

/// Show helpdesk usage statistics (admin)
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let service = open_service(config)?;
        let session = resolve_session(config, &service).await;
        require_admin(&session)?;

        let logs = service.list_query_logs().await?;
        let faqs = service.list_faqs().await?;
        let report = compute_stats(&logs, &faqs);

        if self.json {
            return print_json(&report);
        }

        println!("Total queries:  {}", report.total_queries);
        println!("Total FAQs:     {}", report.total_faqs);
        println!(
            "Helpful rate:   {:.1}% ({} helpful, {} not helpful)",
            report.helpful_rate, report.helpful_count, report.unhelpful_count
        );
        println!(
            "Views:          {} total, {:.1} per FAQ",
            report.total_views, report.average_views
        );

        if !report.top_faqs.is_empty() {
            println!();
            println!("Most viewed:");
            for (rank, faq) in report.top_faqs.iter().enumerate() {
                println!("  {}. {} ({} views)", rank + 1, faq.question, faq.view_count);
            }
        }

        Ok(())
    }
}
