//! Prompt system for the helpdesk answer composer.
//!
//! This crate provides:
//! - YAML-based prompt definitions (`.helpdesk/prompts/<id>.yml`)
//! - A built-in handbook answering prompt used when no override exists
//! - Handlebars template rendering of the system instruction

pub mod builder;
pub mod defaults;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use defaults::{default_answer_prompt, DEFAULT_ANSWER_PROMPT_ID};
pub use loader::{list_prompts, load_prompt, load_prompt_or_default};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptBehavior, PromptDefinition, PromptOutputSpec};
