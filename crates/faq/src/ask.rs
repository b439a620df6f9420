//! The end-user helpdesk flow: search, compose, audit.

use crate::compose::AnswerComposer;
use crate::service::FaqService;
use crate::types::FaqEntry;
use helpdesk_core::{AppError, AppResult};
use serde::Serialize;

/// Result of answering one question.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskOutcome {
    pub answer: String,

    /// Entries the answer was grounded on, most viewed first
    pub related_faqs: Vec<FaqEntry>,

    /// Id of the audit record, used to submit feedback. `None` if logging failed.
    pub log_id: Option<String>,
}

/// Answer a question from the handbook.
///
/// The question is searched, sent and logged exactly as given. Search and
/// completion errors propagate; the audit write never fails the call.
pub async fn ask(
    service: &FaqService,
    composer: &AnswerComposer,
    question: &str,
) -> AppResult<AskOutcome> {
    if question.trim().is_empty() {
        return Err(AppError::Validation("Question must not be empty".to_string()));
    }

    let related_faqs = service.search_faqs(question).await?;
    tracing::info!("Found {} related FAQ entries", related_faqs.len());

    let answer = composer.compose(question, &related_faqs).await?;
    let log_id = service
        .log_query(question, &answer, related_faqs.len())
        .await;

    Ok(AskOutcome {
        answer,
        related_faqs,
        log_id,
    })
}
