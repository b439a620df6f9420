//! LLM provider factory.
//!
//! Builds completion clients from configuration. Credential checks happen
//! here, before any network traffic.

use crate::client::LlmClient;
use crate::providers::{Attribution, ChatCompletionsClient};
use crate::types::ProviderType;
use helpdesk_core::{AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("openrouter", "openai")
/// * `endpoint` - Optional custom base URL
/// * `api_key` - API key; required by every supported provider
/// * `attribution` - Optional `HTTP-Referer` / `X-Title` headers
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or the API key is
/// missing or blank.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    attribution: Option<Attribution>,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    let api_key = api_key
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            AppError::Config(format!(
                "{} API key not configured",
                provider_type.display_name()
            ))
        })?;

    let base_url = endpoint.unwrap_or(provider_type.default_endpoint());
    tracing::debug!("Creating {} client for {}", provider_type.as_str(), base_url);

    let client = ChatCompletionsClient::with_base_url(provider_type, base_url, api_key)
        .with_attribution(attribution.unwrap_or_default());

    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_openrouter_client() {
        let client = create_client("openrouter", None, Some("sk-or-test"), None).unwrap();
        assert_eq!(client.provider_name(), "openrouter");
    }

    #[test]
    fn test_create_openai_with_custom_endpoint() {
        let client =
            create_client("openai", Some("http://localhost:8080/v1"), Some("sk-test"), None)
                .unwrap();
        assert_eq!(client.provider_name(), "openai");
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        match create_client("openrouter", None, None, None) {
            Err(AppError::Config(msg)) => assert_eq!(msg, "OpenRouter API key not configured"),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("Expected error for OpenRouter without API key"),
        }
    }

    #[test]
    fn test_blank_api_key_is_rejected() {
        assert!(matches!(
            create_client("openai", None, Some("   "), None),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None, Some("k"), None) {
            Err(err) => assert!(err.to_string().contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
