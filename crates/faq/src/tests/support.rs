//! Shared test doubles and fixtures.

use crate::keywords::extract_keywords;
use crate::store::{Document, DocumentStore, Fields, MemoryStore};
use crate::types::{FaqEntry, QueryLogEntry, ANONYMOUS_USER, DEFAULT_CATEGORY};
use helpdesk_core::{AppError, AppResult};
use helpdesk_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::sync::Mutex;

/// FAQ entry fixture; the question doubles as the id.
pub(crate) fn faq(question: &str, answer: &str, views: u64) -> FaqEntry {
    FaqEntry {
        id: question.to_string(),
        question: question.to_string(),
        answer: answer.to_string(),
        category: DEFAULT_CATEGORY.to_string(),
        keywords: extract_keywords(question),
        view_count: views,
        created_at: None,
        updated_at: None,
    }
}

pub(crate) fn query_log(was_helpful: Option<bool>) -> QueryLogEntry {
    QueryLogEntry {
        id: String::new(),
        question: "q".to_string(),
        answer: "a".to_string(),
        related_faq_count: 0,
        timestamp: None,
        was_helpful,
        user_id: ANONYMOUS_USER.to_string(),
    }
}

/// Completion client that records requests and returns a canned outcome.
pub(crate) struct MockLlm {
    outcome: Result<String, String>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlm {
    pub(crate) fn answering(answer: &str) -> Self {
        Self {
            outcome: Ok(answer.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails every call with `AppError::Llm(message)`.
    pub(crate) fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlm {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());

        match &self.outcome {
            Ok(answer) => Ok(LlmResponse {
                content: answer.clone(),
                model: request.model.clone(),
                usage: LlmUsage::new(10, 5),
            }),
            Err(message) => Err(AppError::Llm(message.clone())),
        }
    }
}

/// Memory store whose reads or writes fail for selected collections.
pub(crate) struct FlakyStore {
    inner: MemoryStore,
    failing_reads: Vec<String>,
    failing_writes: Vec<String>,
}

impl FlakyStore {
    pub(crate) fn failing_writes(collections: &[&str]) -> Self {
        Self {
            inner: MemoryStore::new(),
            failing_reads: Vec::new(),
            failing_writes: collections.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub(crate) fn failing_reads(collections: &[&str]) -> Self {
        Self {
            inner: MemoryStore::new(),
            failing_reads: collections.iter().map(|c| c.to_string()).collect(),
            failing_writes: Vec::new(),
        }
    }

    /// The wrapped store, for seeding data past the failure injection.
    pub(crate) fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn check_read(&self, collection: &str) -> AppResult<()> {
        if self.failing_reads.iter().any(|c| c == collection) {
            return Err(AppError::Store(format!("{} unavailable", collection)));
        }
        Ok(())
    }

    fn check_write(&self, collection: &str) -> AppResult<()> {
        if self.failing_writes.iter().any(|c| c == collection) {
            return Err(AppError::Store(format!("{} is read-only", collection)));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentStore for FlakyStore {
    async fn create(&self, collection: &str, fields: Fields) -> AppResult<String> {
        self.check_write(collection)?;
        self.inner.create(collection, fields).await
    }

    async fn put(&self, collection: &str, id: &str, fields: Fields) -> AppResult<()> {
        self.check_write(collection)?;
        self.inner.put(collection, id, fields).await
    }

    async fn list(&self, collection: &str) -> AppResult<Vec<Document>> {
        self.check_read(collection)?;
        self.inner.list(collection).await
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        self.check_read(collection)?;
        self.inner.get(collection, id).await
    }

    async fn update(&self, collection: &str, id: &str, patch: Fields) -> AppResult<()> {
        self.check_write(collection)?;
        self.inner.update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        self.check_write(collection)?;
        self.inner.delete(collection, id).await
    }

    async fn increment(&self, collection: &str, id: &str, field: &str, by: i64) -> AppResult<i64> {
        self.check_write(collection)?;
        self.inner.increment(collection, id, field, by).await
    }
}
