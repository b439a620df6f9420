//! Answer composition: grounds the completion request in matched FAQ entries.

use crate::types::FaqEntry;
use helpdesk_core::AppResult;
use helpdesk_llm::{LlmClient, LlmRequest};
use helpdesk_prompt::{build_prompt, default_answer_prompt, PromptDefinition};
use std::collections::HashMap;
use std::sync::Arc;

/// Context used when no entry matched the question.
pub const NO_CONTENT_PLACEHOLDER: &str = "No specific handbook content found for this query.";

/// Institution named in the system instruction unless configured otherwise.
pub const DEFAULT_INSTITUTION: &str = "the university";

/// Render matched entries as `Q: …\nA: …` blocks separated by blank lines.
pub fn build_context(entries: &[FaqEntry]) -> String {
    if entries.is_empty() {
        return NO_CONTENT_PLACEHOLDER.to_string();
    }

    entries
        .iter()
        .map(|faq| format!("Q: {}\nA: {}", faq.question, faq.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Turns a question plus its related entries into a completion request and
/// returns the generated answer.
#[derive(Clone)]
pub struct AnswerComposer {
    client: Arc<dyn LlmClient>,
    prompt: PromptDefinition,
    model: String,
    institution: String,
    max_tokens: Option<u32>,
}

impl AnswerComposer {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            prompt: default_answer_prompt(),
            model: model.into(),
            institution: DEFAULT_INSTITUTION.to_string(),
            max_tokens: None,
        }
    }

    /// Use a workspace prompt instead of the built-in one.
    pub fn with_prompt(mut self, prompt: PromptDefinition) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = institution.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Build the completion request without sending it.
    pub fn build_request(&self, question: &str, related: &[FaqEntry]) -> AppResult<LlmRequest> {
        let mut variables = HashMap::new();
        variables.insert("context".to_string(), build_context(related));
        variables.insert("institution".to_string(), self.institution.clone());

        let built = build_prompt(&self.prompt, variables, question)?;

        let mut request = LlmRequest::new(built.user, self.model.clone());
        if let Some(system) = built.system {
            request = request.with_system(system);
        }
        if let Some(temperature) = self.prompt.behavior.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        Ok(request)
    }

    /// Ask the completion API for an answer. One attempt; errors propagate.
    pub async fn compose(&self, question: &str, related: &[FaqEntry]) -> AppResult<String> {
        let request = self.build_request(question, related)?;

        tracing::info!(
            "Requesting answer from {} ({} related entries)",
            self.client.provider_name(),
            related.len()
        );

        let response = self.client.complete(&request).await.map_err(|e| {
            tracing::error!("Error querying AI: {}", e);
            e
        })?;

        tracing::debug!(
            "Answer received: {} tokens",
            response.usage.total_tokens
        );

        Ok(response.content)
    }
}
