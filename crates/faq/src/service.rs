//! FAQ service: typed operations over the document store.

use crate::keywords::extract_keywords;
use crate::search::rank_matches;
use crate::store::{DocumentStore, Fields};
use crate::types::{
    decode, encode, AdminRecord, FaqEntry, FaqUpdate, NewFaq, QueryLogEntry, ADMINS,
    ANONYMOUS_USER, DEFAULT_CATEGORY, FAQS, QUERY_LOGS,
};
use chrono::Utc;
use helpdesk_core::{AppError, AppResult};
use serde_json::{json, Value};
use std::sync::Arc;

/// Field holding an entry's view counter.
const VIEW_COUNT_FIELD: &str = "viewCount";

/// Entry point for FAQ retrieval, curation and query auditing.
#[derive(Clone)]
pub struct FaqService {
    store: Arc<dyn DocumentStore>,
}

impl FaqService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// All FAQ entries in insertion order.
    pub async fn list_faqs(&self) -> AppResult<Vec<FaqEntry>> {
        self.store
            .list(FAQS)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Entries relevant to `query`, most viewed first, at most five.
    pub async fn search_faqs(&self, query: &str) -> AppResult<Vec<FaqEntry>> {
        let snapshot = self.list_faqs().await.map_err(|e| {
            tracing::error!("Error searching FAQs: {}", e);
            e
        })?;

        Ok(rank_matches(query, snapshot))
    }

    pub async fn get_faq(&self, id: &str) -> AppResult<FaqEntry> {
        self.store
            .get(FAQS, id)
            .await?
            .map(decode)
            .transpose()?
            .ok_or_else(|| AppError::NotFound(format!("FAQ '{}'", id)))
    }

    /// Entries whose category equals `category` exactly.
    pub async fn faqs_by_category(&self, category: &str) -> AppResult<Vec<FaqEntry>> {
        Ok(self
            .list_faqs()
            .await?
            .into_iter()
            .filter(|faq| faq.category == category)
            .collect())
    }

    /// Create an entry and return its id. Keywords are derived from the question.
    pub async fn create_faq(&self, faq: NewFaq) -> AppResult<String> {
        let question = require_text("question", &faq.question)?;
        let answer = require_text("answer", &faq.answer)?;
        let category = faq
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        let now = Utc::now();
        let entry = FaqEntry {
            id: String::new(),
            keywords: extract_keywords(&question),
            question,
            answer,
            category,
            view_count: 0,
            created_at: Some(now),
            updated_at: Some(now),
        };

        let id = self.store.create(FAQS, encode(&entry)?).await?;
        tracing::info!("Created FAQ {} ({} keywords)", id, entry.keywords.len());
        Ok(id)
    }

    /// Merge the provided fields into an entry and refresh `updatedAt`.
    ///
    /// A new question re-derives the keywords.
    pub async fn update_faq(&self, id: &str, update: FaqUpdate) -> AppResult<()> {
        if update.is_empty() {
            return Err(AppError::Validation("Nothing to update".to_string()));
        }

        let mut patch = Fields::new();
        if let Some(ref question) = update.question {
            let question = require_text("question", question)?;
            patch.insert("keywords".to_string(), json!(extract_keywords(&question)));
            patch.insert("question".to_string(), Value::String(question));
        }
        if let Some(ref answer) = update.answer {
            patch.insert(
                "answer".to_string(),
                Value::String(require_text("answer", answer)?),
            );
        }
        if let Some(ref category) = update.category {
            let category = category.trim();
            let category = if category.is_empty() {
                DEFAULT_CATEGORY
            } else {
                category
            };
            patch.insert("category".to_string(), Value::String(category.to_string()));
        }
        patch.insert("updatedAt".to_string(), json!(Utc::now()));

        self.store.update(FAQS, id, patch).await?;
        tracing::info!("Updated FAQ {}", id);
        Ok(())
    }

    pub async fn delete_faq(&self, id: &str) -> AppResult<()> {
        self.store.delete(FAQS, id).await?;
        tracing::info!("Deleted FAQ {}", id);
        Ok(())
    }

    /// Record one view of an entry. Failures are logged, never returned.
    pub async fn increment_view_count(&self, id: &str) -> Option<u64> {
        match self.store.increment(FAQS, id, VIEW_COUNT_FIELD, 1).await {
            Ok(count) => Some(count.max(0) as u64),
            Err(e) => {
                tracing::error!("Error incrementing view count for {}: {}", id, e);
                None
            }
        }
    }

    /// Persist an audit record of one answered question.
    ///
    /// Best effort: a store failure is logged and `None` returned so the
    /// user-facing flow is never interrupted.
    pub async fn log_query(
        &self,
        question: &str,
        answer: &str,
        related_faq_count: usize,
    ) -> Option<String> {
        let entry = QueryLogEntry {
            id: String::new(),
            question: question.to_string(),
            answer: answer.to_string(),
            related_faq_count,
            timestamp: Some(Utc::now()),
            was_helpful: None,
            user_id: ANONYMOUS_USER.to_string(),
        };

        let result = match encode(&entry) {
            Ok(fields) => self.store.create(QUERY_LOGS, fields).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(id) => {
                tracing::debug!("Logged query {}", id);
                Some(id)
            }
            Err(e) => {
                tracing::error!("Error logging query: {}", e);
                None
            }
        }
    }

    /// Set the helpfulness flag of a query log. Returns whether it was stored.
    ///
    /// The flag is meant to be set once; overwriting is allowed but logged.
    pub async fn mark_feedback(&self, log_id: &str, helpful: bool) -> bool {
        match self.store.get(QUERY_LOGS, log_id).await {
            Ok(Some(doc)) => {
                if let Some(previous) = doc.fields.get("wasHelpful").and_then(Value::as_bool) {
                    tracing::warn!(
                        "Query log {} already rated (was_helpful = {}), overwriting",
                        log_id,
                        previous
                    );
                }
            }
            Ok(None) => {
                tracing::error!("Error marking feedback: query log {} not found", log_id);
                return false;
            }
            Err(e) => {
                tracing::error!("Error marking feedback: {}", e);
                return false;
            }
        }

        let mut patch = Fields::new();
        patch.insert("wasHelpful".to_string(), Value::Bool(helpful));

        match self.store.update(QUERY_LOGS, log_id, patch).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error marking feedback: {}", e);
                false
            }
        }
    }

    /// All query logs in insertion order.
    pub async fn list_query_logs(&self) -> AppResult<Vec<QueryLogEntry>> {
        self.store
            .list(QUERY_LOGS)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Admin record for a user id, if the user is an admin.
    pub async fn find_admin(&self, uid: &str) -> AppResult<Option<AdminRecord>> {
        self.store.get(ADMINS, uid).await?.map(decode).transpose()
    }

    /// Provision an admin record. Only seed tooling writes this collection.
    pub async fn put_admin(&self, admin: &AdminRecord) -> AppResult<()> {
        let uid = require_text("admin id", &admin.id)?;
        self.store.put(ADMINS, &uid, encode(admin)?).await
    }
}

/// Trimmed, non-empty text or a validation error naming the field.
fn require_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}
