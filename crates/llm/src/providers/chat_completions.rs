//! Chat-completions provider implementation.
//!
//! Speaks the OpenAI-style `POST {endpoint}/chat/completions` protocol used
//! by both OpenRouter and OpenAI.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use crate::types::ProviderType;
use helpdesk_core::{AppError, AppResult};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Optional attribution headers (`HTTP-Referer`, `X-Title`) sent with each request.
#[derive(Debug, Clone, Default)]
pub struct Attribution {
    pub referer: Option<String>,
    pub title: Option<String>,
}

/// Chat message in the request body.
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Chat-completions request body.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Chat-completions client.
pub struct ChatCompletionsClient {
    provider: ProviderType,

    /// Base URL, without the `/chat/completions` suffix
    base_url: String,

    api_key: String,

    attribution: Attribution,

    client: reqwest::Client,
}

impl ChatCompletionsClient {
    /// Create a client against the provider's public endpoint.
    pub fn new(provider: ProviderType, api_key: impl Into<String>) -> Self {
        Self::with_base_url(provider, provider.default_endpoint(), api_key)
    }

    /// Create a client against a custom base URL.
    pub fn with_base_url(
        provider: ProviderType,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            attribution: Attribution::default(),
            client: reqwest::Client::new(),
        }
    }

    /// Attach attribution headers.
    pub fn with_attribution(mut self, attribution: Attribution) -> Self {
        self.attribution = attribution;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Convert LlmRequest to the wire format: system first, then the user message.
    fn to_chat_request(&self, request: &LlmRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(ref system) = request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: request.prompt.clone(),
        });

        ChatRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

/// Build the error for a non-success status.
///
/// Prefers a server-provided `message` (top level, then `error.message`),
/// falling back to the status text.
fn api_error(status: StatusCode, body: &str) -> AppError {
    let server_message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(|m| m.as_str())
                .or_else(|| value.pointer("/error/message").and_then(|m| m.as_str()))
                .map(str::to_string)
        })
        .filter(|m| !m.trim().is_empty());

    let message = server_message.unwrap_or_else(|| {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_str().to_string())
    });

    AppError::Llm(format!("API Error: {}", message))
}

/// Extract `choices[0].message.content` from a success body.
fn parse_completion(body: &str, requested_model: &str) -> AppResult<LlmResponse> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| AppError::InvalidResponse(format!("unreadable body: {}", e)))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| {
            AppError::InvalidResponse("missing choices[0].message.content".to_string())
        })?;

    let usage = parsed
        .usage
        .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
        .unwrap_or_default();

    Ok(LlmResponse {
        content,
        model: parsed.model.unwrap_or_else(|| requested_model.to_string()),
        usage,
    })
}

#[async_trait::async_trait]
impl LlmClient for ChatCompletionsClient {
    fn provider_name(&self) -> &str {
        self.provider.as_str()
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!(
            provider = self.provider.as_str(),
            model = %request.model,
            "Sending completion request"
        );

        let body = self.to_chat_request(request);

        let mut builder = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body);

        if let Some(ref referer) = self.attribution.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(ref title) = self.attribution.title {
            builder = builder.header("X-Title", title);
        }

        let response = builder.send().await.map_err(|e| {
            AppError::Llm(format!(
                "Failed to send request to {}: {}",
                self.provider.display_name(),
                e
            ))
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            tracing::warn!("Completion API returned {}", status);
            return Err(api_error(status, &text));
        }

        let completion = parse_completion(&text, &request.model)?;

        tracing::info!("Received completion");
        tracing::debug!(
            "Token usage - Prompt: {}, Completion: {}, Total: {}",
            completion.usage.prompt_tokens,
            completion.usage.completion_tokens,
            completion.usage.total_tokens
        );

        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve exactly one canned HTTP response and hand back the raw request.
    async fn serve_once(status_line: &str, body: &str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];

            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);

                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if raw.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }

            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let _ = tx.send(String::from_utf8_lossy(&raw).to_string());
        });

        (format!("http://{}", addr), rx)
    }

    fn handbook_request() -> LlmRequest {
        LlmRequest::new("When is enrollment?", "test-model")
            .with_system("You answer from the handbook.")
    }

    #[test]
    fn test_chat_request_puts_system_first() {
        let client = ChatCompletionsClient::new(ProviderType::OpenRouter, "sk-test");
        let chat = client.to_chat_request(&handbook_request());

        assert_eq!(chat.model, "test-model");
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].role, "system");
        assert_eq!(chat.messages[1].role, "user");
        assert_eq!(chat.messages[1].content, "When is enrollment?");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client =
            ChatCompletionsClient::with_base_url(ProviderType::OpenAI, "http://local/v1/", "k");
        assert_eq!(client.completions_url(), "http://local/v1/chat/completions");
    }

    #[test]
    fn test_api_error_prefers_server_message() {
        let err = api_error(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"message": "Rate limit exceeded"}"#,
        );
        assert_eq!(err.to_string(), "LLM error: API Error: Rate limit exceeded");

        let err = api_error(
            StatusCode::UNAUTHORIZED,
            r#"{"error": {"message": "No auth credentials found", "code": 401}}"#,
        );
        assert!(err.to_string().contains("No auth credentials found"));
    }

    #[test]
    fn test_api_error_falls_back_to_status_text() {
        let err = api_error(StatusCode::BAD_GATEWAY, "<html>upstream down</html>");
        assert_eq!(err.to_string(), "LLM error: API Error: Bad Gateway");
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{
            "model": "deepseek/deepseek-r1:free",
            "choices": [{"message": {"role": "assistant", "content": "Enrollment opens in June."}}],
            "usage": {"prompt_tokens": 40, "completion_tokens": 8}
        }"#;

        let response = parse_completion(body, "fallback").unwrap();
        assert_eq!(response.content, "Enrollment opens in June.");
        assert_eq!(response.model, "deepseek/deepseek-r1:free");
        assert_eq!(response.usage.total_tokens, 48);
    }

    #[test]
    fn test_parse_completion_malformed() {
        for body in [
            r#"{"choices": []}"#,
            r#"{"choices": [{}]}"#,
            r#"{"choices": [{"message": {}}]}"#,
            r#"{"id": "gen-1"}"#,
            "not json at all",
        ] {
            let result = parse_completion(body, "m");
            assert!(
                matches!(result, Err(AppError::InvalidResponse(_))),
                "body {:?} should be rejected",
                body
            );
        }
    }

    #[tokio::test]
    async fn test_complete_against_local_server() {
        let (base_url, request_rx) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"content":"Classes start in August."}}]}"#,
        )
        .await;

        let client = ChatCompletionsClient::with_base_url(ProviderType::OpenRouter, base_url, "sk-test")
            .with_attribution(Attribution {
                referer: Some("https://handbook.example".to_string()),
                title: Some("Student Handbook FAQ".to_string()),
            });

        let response = client.complete(&handbook_request()).await.unwrap();
        assert_eq!(response.content, "Classes start in August.");
        assert_eq!(response.model, "test-model");

        let raw = request_rx.await.unwrap().to_lowercase();
        assert!(raw.starts_with("post /chat/completions"));
        assert!(raw.contains("authorization: bearer sk-test"));
        assert!(raw.contains("http-referer: https://handbook.example"));
        assert!(raw.contains("x-title: student handbook faq"));
        assert!(raw.contains(r#""role":"system""#));
    }

    #[tokio::test]
    async fn test_complete_non_success_status() {
        let (base_url, _rx) = serve_once(
            "503 Service Unavailable",
            r#"{"message": "Model is overloaded"}"#,
        )
        .await;

        let client = ChatCompletionsClient::with_base_url(ProviderType::OpenRouter, base_url, "sk-test");
        let err = client.complete(&handbook_request()).await.unwrap_err();

        assert!(matches!(err, AppError::Llm(_)));
        assert!(err.to_string().contains("Model is overloaded"));
    }

    #[tokio::test]
    async fn test_complete_malformed_success_body() {
        let (base_url, _rx) = serve_once("200 OK", r#"{"object": "chat.completion"}"#).await;

        let client = ChatCompletionsClient::with_base_url(ProviderType::OpenAI, base_url, "sk-test");
        let err = client.complete(&handbook_request()).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidResponse(_)));
    }
}
