//! Prompt loader for YAML prompt definitions.

use crate::defaults::{default_answer_prompt, DEFAULT_ANSWER_PROMPT_ID};
use crate::types::PromptDefinition;
use helpdesk_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(".helpdesk").join("prompts")
}

/// Load a prompt definition by ID from `.helpdesk/prompts/<id>.yml`.
///
/// # Example
/// ```no_run
/// use helpdesk_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "handbook.answer")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Load a workspace override if present, otherwise the built-in prompt.
///
/// Only the built-in id has a fallback; any other missing id is an error
/// naming the prompts the workspace does provide.
pub fn load_prompt_or_default(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    if prompt_file.exists() {
        return load_prompt(workspace_path, prompt_id);
    }

    if prompt_id != DEFAULT_ANSWER_PROMPT_ID {
        let mut available = vec![DEFAULT_ANSWER_PROMPT_ID.to_string()];
        available.extend(
            list_prompts(workspace_path)?
                .into_iter()
                .filter(|id| id != DEFAULT_ANSWER_PROMPT_ID),
        );
        return Err(AppError::Prompt(format!(
            "Unknown prompt '{}'. Available: {}",
            prompt_id,
            available.join(", ")
        )));
    }

    tracing::debug!("Using built-in prompt '{}'", prompt_id);
    Ok(default_answer_prompt())
}

/// List all prompt IDs available in the workspace.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<String>> {
    let dir = prompts_dir(workspace_path);

    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut prompt_ids = Vec::new();

    for entry in walkdir::WalkDir::new(&dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                prompt_ids.push(stem.to_string());
            }
        }
    }

    prompt_ids.sort();
    Ok(prompt_ids)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    // Without the context slot the matched FAQ entries would never reach the model
    if !def.template.contains("{{context}}") {
        return Err(AppError::Prompt(format!(
            "Prompt '{}' template must reference {{{{context}}}}",
            def.id
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_prompt(dir: &Path, id: &str, body: &str) -> PathBuf {
        let prompts = prompts_dir(dir);
        fs::create_dir_all(&prompts).unwrap();

        let file_path = prompts.join(format!("{}.yml", id));
        fs::write(&file_path, body).unwrap();
        file_path
    }

    fn valid_prompt(id: &str) -> String {
        format!(
            r#"
id: {}
title: "Registrar prompt"
apiVersion: "1.0"
createdBy: registrar
behavior:
  tone: professional
  style: concise
template: "Registrar office. Content: {{{{context}}}}"
output:
  format: text
"#,
            id
        )
    }

    #[test]
    fn test_load_valid_prompt() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "registrar", &valid_prompt("registrar"));

        let prompt = load_prompt(temp_dir.path(), "registrar").unwrap();
        assert_eq!(prompt.id, "registrar");
        assert_eq!(prompt.title, "Registrar prompt");
    }

    #[test]
    fn test_load_nonexistent_prompt() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_prompt(temp_dir.path(), "nonexistent").is_err());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "invalid", "invalid: yaml: content:");

        assert!(load_prompt(temp_dir.path(), "invalid").is_err());
    }

    #[test]
    fn test_template_without_context_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let body = valid_prompt("bare").replace("{{context}}", "nothing");
        write_prompt(temp_dir.path(), "bare", &body);

        let err = load_prompt(temp_dir.path(), "bare").unwrap_err();
        assert!(err.to_string().contains("{{context}}"));
    }

    #[test]
    fn test_default_fallback() {
        let temp_dir = TempDir::new().unwrap();

        let prompt = load_prompt_or_default(temp_dir.path(), DEFAULT_ANSWER_PROMPT_ID).unwrap();
        assert_eq!(prompt.id, DEFAULT_ANSWER_PROMPT_ID);
        assert_eq!(prompt.created_by, "helpdesk");

        assert!(load_prompt_or_default(temp_dir.path(), "other").is_err());
    }

    #[test]
    fn test_unknown_prompt_lists_available() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "registrar", &valid_prompt("registrar"));

        let err = load_prompt_or_default(temp_dir.path(), "registar").unwrap_err();
        assert!(matches!(err, AppError::Prompt(_)));
        assert!(err
            .to_string()
            .contains("Unknown prompt 'registar'. Available: handbook.answer, registrar"));
    }

    #[test]
    fn test_workspace_override_wins() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(
            temp_dir.path(),
            DEFAULT_ANSWER_PROMPT_ID,
            &valid_prompt(DEFAULT_ANSWER_PROMPT_ID),
        );

        let prompt = load_prompt_or_default(temp_dir.path(), DEFAULT_ANSWER_PROMPT_ID).unwrap();
        assert_eq!(prompt.created_by, "registrar");
    }

    #[test]
    fn test_list_prompts() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "prompt2", &valid_prompt("prompt2"));
        write_prompt(temp_dir.path(), "prompt1", &valid_prompt("prompt1"));

        let prompts = list_prompts(temp_dir.path()).unwrap();
        assert_eq!(prompts, vec!["prompt1".to_string(), "prompt2".to_string()]);
    }
}
