//! Built-in prompt definitions.

use crate::types::{PromptBehavior, PromptDefinition, PromptOutputSpec};

/// Identifier of the handbook answering prompt.
pub const DEFAULT_ANSWER_PROMPT_ID: &str = "handbook.answer";

const ANSWER_TEMPLATE: &str = "You are an AI assistant for {{institution}}.
You can ONLY answer questions based on the Student Handbook of {{institution}}.

Here is the relevant handbook content:
{{context}}

Rules:
- Only provide information from the handbook above
- If asked about topics outside the handbook, politely say you can only answer handbook-related questions
- Be helpful, accurate, and concise
- Reference specific policies when applicable
- Use a friendly, professional tone
- If information is not available in the handbook, suggest contacting the registrar or student affairs office";

/// The handbook answering prompt used when the workspace has no override.
pub fn default_answer_prompt() -> PromptDefinition {
    PromptDefinition {
        id: DEFAULT_ANSWER_PROMPT_ID.to_string(),
        title: "Student handbook answer".to_string(),
        api_version: "1.0".to_string(),
        created_by: "helpdesk".to_string(),
        behavior: PromptBehavior {
            tone: "friendly".to_string(),
            style: "concise".to_string(),
            temperature: None,
        },
        template: ANSWER_TEMPLATE.to_string(),
        output: PromptOutputSpec {
            format: "markdown".to_string(),
        },
    }
}
