//! Import command handler.
//!
//! Seeds the store from `<workspace>/data/faqs.json`.

use super::{open_service, preview};
use clap::Args;
use helpdesk_core::{config::AppConfig, AppResult};
use helpdesk_faq::{import_faqs, ImportEvent};

/// Characters of each question echoed in progress lines.
const PREVIEW_CHARS: usize = 50;

/// Import FAQ entries from data/faqs.json
#[derive(Args, Debug)]
pub struct ImportCommand {}

impl ImportCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing import command");

        let service = open_service(config)?;
        let seed_path = config.seed_path();

        println!("Starting FAQ import...");

        let report = import_faqs(&service, &seed_path, |event| match event {
            ImportEvent::Imported { question } => {
                println!("✓ Imported: \"{}\"", preview(question, PREVIEW_CHARS));
            }
            ImportEvent::Skipped { error, .. } => {
                eprintln!("✗ Error importing FAQ: {}", error);
            }
        })
        .await
        .map_err(|e| {
            eprintln!("Fatal error during import: {}", e);
            e
        })?;

        println!();
        println!("✓ Import complete!");
        println!("  Total imported: {}", report.imported);
        println!("  Skipped: {}", report.skipped);
        if report.admins > 0 {
            println!("  Admins provisioned: {}", report.admins);
        }

        Ok(())
    }
}
