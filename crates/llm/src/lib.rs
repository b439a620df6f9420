//! Completion API integration for the helpdesk.
//!
//! This crate provides a provider-agnostic abstraction over hosted
//! language models. The helpdesk only needs single-shot text completion:
//! a system instruction plus one user message in, one answer out.
//!
//! # Providers
//! - **OpenRouter** (default) and **OpenAI**: both speak the
//!   chat-completions protocol and share [`ChatCompletionsClient`].
//!
//! # Example
//! ```no_run
//! use helpdesk_llm::{create_client, LlmRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_client("openrouter", None, Some("sk-or-..."), None)?;
//! let request = LlmRequest::new("When is the enrollment deadline?", "deepseek/deepseek-r1:free")
//!     .with_system("Answer only from the student handbook.");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{Attribution, ChatCompletionsClient};
pub use types::ProviderType;
