//! Bulk import of FAQ entries (and admin records) from a JSON seed file.

use crate::service::FaqService;
use crate::types::{AdminRecord, NewFaq};
use helpdesk_core::{AppError, AppResult};
use serde::Deserialize;
use std::path::Path;

/// Seed file layout: `{ "faqs": [...], "admins": [...] }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub faqs: Vec<SeedFaq>,

    #[serde(default)]
    pub admins: Vec<AdminRecord>,
}

/// One FAQ record of a seed file. Missing fields are caught at import time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedFaq {
    #[serde(default)]
    pub question: String,

    #[serde(default)]
    pub answer: String,

    #[serde(default)]
    pub category: Option<String>,
}

/// Per-record outcome reported while importing.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportEvent {
    Imported { question: String },
    Skipped { question: String, error: String },
}

/// Totals of one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub admins: usize,
}

/// Read and parse a seed file. Any failure here is fatal to the import.
pub fn read_seed_file(path: &Path) -> AppResult<SeedFile> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read seed file {}: {}", path.display(), e),
        ))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        AppError::Serialization(format!("Invalid seed file {}: {}", path.display(), e))
    })
}

/// Create every seed entry in order. A failing record is reported and
/// skipped; the run continues.
pub async fn import_seed<F>(service: &FaqService, seed: SeedFile, mut progress: F) -> ImportReport
where
    F: FnMut(&ImportEvent),
{
    let mut report = ImportReport::default();

    for faq in seed.faqs {
        let new_faq = NewFaq {
            question: faq.question.clone(),
            answer: faq.answer,
            category: faq.category,
        };

        let event = match service.create_faq(new_faq).await {
            Ok(_) => {
                report.imported += 1;
                ImportEvent::Imported {
                    question: faq.question,
                }
            }
            Err(e) => {
                tracing::warn!("Skipping seed entry: {}", e);
                report.skipped += 1;
                ImportEvent::Skipped {
                    question: faq.question,
                    error: e.to_string(),
                }
            }
        };
        progress(&event);
    }

    for admin in &seed.admins {
        match service.put_admin(admin).await {
            Ok(()) => report.admins += 1,
            Err(e) => tracing::warn!("Skipping admin record '{}': {}", admin.id, e),
        }
    }

    tracing::info!(
        "Import finished: {} imported, {} skipped, {} admins",
        report.imported,
        report.skipped,
        report.admins
    );

    report
}

/// Read `seed_path` and import its contents.
pub async fn import_faqs<F>(
    service: &FaqService,
    seed_path: &Path,
    progress: F,
) -> AppResult<ImportReport>
where
    F: FnMut(&ImportEvent),
{
    let seed = read_seed_file(seed_path)?;
    tracing::info!(
        "Importing {} FAQ entries from {}",
        seed.faqs.len(),
        seed_path.display()
    );

    Ok(import_seed(service, seed, progress).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::tests::support::FlakyStore;
    use crate::types::{DEFAULT_CATEGORY, FAQS};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn write_seed(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("faqs.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_import_counts_and_defaults() {
        let temp = TempDir::new().unwrap();
        let path = write_seed(
            &temp,
            r#"{
                "faqs": [
                    {"question": "What is the grading system?", "answer": "1.0 to 5.0", "category": "Grading"},
                    {"question": "Where is the clinic?", "answer": "Building C"},
                    {"question": "", "answer": "orphan answer"}
                ],
                "admins": [{"id": "uid-admin", "email": "registrar@example.edu"}]
            }"#,
        );

        let service = FaqService::new(Arc::new(MemoryStore::new()));
        let mut events = Vec::new();
        let report = import_faqs(&service, &path, |event| events.push(event.clone()))
            .await
            .unwrap();

        assert_eq!(
            report,
            ImportReport {
                imported: 2,
                skipped: 1,
                admins: 1
            }
        );
        assert_eq!(events.len(), 3);
        assert!(matches!(events[2], ImportEvent::Skipped { .. }));

        let faqs = service.list_faqs().await.unwrap();
        assert_eq!(faqs[0].category, "Grading");
        assert_eq!(faqs[0].keywords, vec!["grading", "system?"]);
        assert_eq!(faqs[1].category, DEFAULT_CATEGORY);
        assert!(service.find_admin("uid-admin").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_store_failures_are_skipped() {
        let service = FaqService::new(Arc::new(FlakyStore::failing_writes(&[FAQS])));
        let seed = SeedFile {
            faqs: vec![SeedFaq {
                question: "Dress code?".to_string(),
                answer: "Uniform.".to_string(),
                category: None,
            }],
            admins: Vec::new(),
        };

        let report = import_seed(&service, seed, |_| {}).await;
        assert_eq!(report.imported, 0);
        assert_eq!(report.skipped, 1);
    }

    #[tokio::test]
    async fn test_missing_or_invalid_seed_is_fatal() {
        let temp = TempDir::new().unwrap();
        let service = FaqService::new(Arc::new(MemoryStore::new()));

        let missing = temp.path().join("absent.json");
        assert!(matches!(
            import_faqs(&service, &missing, |_| {}).await,
            Err(AppError::Io(_))
        ));

        let invalid = write_seed(&temp, "{ not json");
        assert!(matches!(
            import_faqs(&service, &invalid, |_| {}).await,
            Err(AppError::Serialization(_))
        ));
    }
}
