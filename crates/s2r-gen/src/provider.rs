//! Completion provider abstraction.
//!
//! Speaks the OpenAI-compatible chat-completions API over blocking HTTP via
//! `ureq`; the CLI has no async runtime.

use s2r_core::config::LlmConfig;
use serde::Serialize;
use serde_json::Value;

/// Errors from completion calls.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("rate limited by provider: {0}")]
    RateLimit(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("provider returned an empty response")]
    EmptyResponse,
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("response parse error: {0}")]
    Parse(String),
}

/// A completed LLM response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmResponse {
    /// The text content of the response.
    pub text: String,
    /// Input tokens used (from API response, if reported).
    pub input_tokens: Option<u64>,
    /// Output tokens used (from API response, if reported).
    pub output_tokens: Option<u64>,
}

/// Abstraction over completion API providers.
pub trait LlmProvider {
    /// Send a completion request with system and user messages.
    fn complete(&self, system: &str, user: &str) -> Result<LlmResponse, CompletionError>;

    /// The model name (for display/logging).
    fn model_name(&self) -> &str;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

/// OpenAI-compatible provider (works with OpenAI, Azure, gateways).
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
    agent: ureq::Agent,
}

impl OpenAiProvider {
    pub fn new(api_key: String, config: &LlmConfig) -> Self {
        Self {
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            agent: ureq::Agent::new_with_config(
                ureq::config::Config::builder()
                    .timeout_global(Some(std::time::Duration::from_secs(config.timeout_secs)))
                    // Status codes are classified by hand, with the error body.
                    .http_status_as_error(false)
                    .build(),
            ),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        )
    }
}

impl LlmProvider for OpenAiProvider {
    fn complete(&self, system: &str, user: &str) -> Result<LlmResponse, CompletionError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut response = self
            .agent
            .post(&self.endpoint())
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .send_json(&body)
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(transport_error)?;

        if !(200..300).contains(&status) {
            return Err(classify_status(status, &text));
        }

        let json: Value =
            serde_json::from_str(&text).map_err(|e| CompletionError::Parse(e.to_string()))?;
        parse_chat_response(&json)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Create the provider used for README generation.
pub fn create_provider(api_key: String, config: &LlmConfig) -> Box<dyn LlmProvider> {
    Box::new(OpenAiProvider::new(api_key, config))
}

fn transport_error(err: ureq::Error) -> CompletionError {
    match err {
        ureq::Error::StatusCode(status) => classify_status(status, ""),
        other => CompletionError::Network(other.to_string()),
    }
}

/// Map a non-success HTTP status (and its body) to an error kind.
pub fn classify_status(status: u16, body: &str) -> CompletionError {
    let message = error_message(body).unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            format!("HTTP {}", status)
        } else {
            trimmed.chars().take(200).collect()
        }
    });
    match status {
        401 | 403 => CompletionError::Authentication(message),
        429 => CompletionError::RateLimit(message),
        _ => CompletionError::Api { status, message },
    }
}

fn error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    json.get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

/// Extract text and usage from a chat-completions response body.
///
/// The text is returned as-is; emptiness is judged by the caller.
pub fn parse_chat_response(json: &Value) -> Result<LlmResponse, CompletionError> {
    // Some gateways report errors with a 200 status.
    if let Some(err) = json.get("error") {
        let message = err
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown error")
            .to_string();
        let status = err
            .get("code")
            .and_then(Value::as_u64)
            .and_then(|c| u16::try_from(c).ok())
            .unwrap_or(400);
        return Err(classify_status(
            status,
            &serde_json::json!({ "error": { "message": message } }).to_string(),
        ));
    }

    if json.get("choices").and_then(|c| c.as_array()).is_none() {
        return Err(CompletionError::Parse(
            "response has no 'choices' array".to_string(),
        ));
    }

    // Extract text from choices
    let text = json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|msg| msg.get("content"))
        .and_then(|c| c.as_str())
        .ok_or(CompletionError::EmptyResponse)?
        .to_string();

    // Extract usage
    let input_tokens = json
        .get("usage")
        .and_then(|u| u.get("prompt_tokens"))
        .and_then(|t| t.as_u64());
    let output_tokens = json
        .get("usage")
        .and_then(|u| u.get("completion_tokens"))
        .and_then(|t| t.as_u64());

    Ok(LlmResponse {
        text,
        input_tokens,
        output_tokens,
    })
}
