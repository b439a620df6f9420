//! Prompt builder for rendering the system instruction.

use crate::types::{BuiltPrompt, PromptDefinition};
use helpdesk_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build a prompt from a definition, template variables and the user's question.
///
/// The definition's template is rendered into the system instruction; the
/// question is passed through untouched as the user message.
///
/// # Example
/// ```no_run
/// use helpdesk_prompt::{build_prompt, default_answer_prompt};
/// use std::collections::HashMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut vars = HashMap::new();
/// vars.insert("context".to_string(), "Q: ...\nA: ...".to_string());
///
/// let built = build_prompt(&default_answer_prompt(), vars, "What is the dress code?")?;
/// println!("System: {:?}", built.system);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: HashMap<String, String>,
    question: &str,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let system = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt::new(
        Some(system),
        question.to_string(),
        definition.id.clone(),
        variables,
    ))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text output; FAQ answers may contain characters HTML escaping would mangle
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}
