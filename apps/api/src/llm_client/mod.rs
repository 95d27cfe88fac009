/// LLM Client: the single point of entry for all language-model calls in the ATS engine.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Extraction, generation and judging go through the `LanguageModel` trait so the
/// collaborator can be swapped (or scripted in tests) without touching callers.
///
/// Every call is raced against `LLM_CALL_TIMEOUT`. When the guard fires the in-flight
/// future is dropped, which also drops the underlying HTTP request.
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls. Hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;

/// Upper bound a caller ever waits on a single language-model call.
pub const LLM_CALL_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM call timed out after {secs}s")]
    Timeout { secs: u64 },
}

impl LlmError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, LlmError::Timeout { .. })
    }

    /// True when the model answered but the payload did not fit the expected schema.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, LlmError::Parse(_) | LlmError::EmptyContent)
    }
}

/// The language-understanding collaborator. Returns the raw text of the model's reply.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

/// Races `fut` against `limit`. On expiry the future is dropped and `LlmError::Timeout` returned.
pub async fn guard<T, F>(limit: Duration, fut: F) -> Result<T, LlmError>
where
    F: Future<Output = Result<T, LlmError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!("LLM call exceeded {}s guard, abandoning", limit.as_secs());
            Err(LlmError::Timeout {
                secs: limit.as_secs(),
            })
        }
    }
}

/// Calls the model under the timeout guard and deserializes the reply as JSON.
/// The prompt must instruct the model to return valid JSON.
pub async fn call_json<T: DeserializeOwned>(
    llm: &dyn LanguageModel,
    prompt: &str,
    system: &str,
) -> Result<T, LlmError> {
    let text = guard(LLM_CALL_TIMEOUT, llm.complete(prompt, system)).await?;
    parse_json(&text)
}

/// Parses a raw model reply as JSON, tolerating markdown fences.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let text = strip_json_fences(text);
    if text.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    serde_json::from_str(text).map_err(LlmError::Parse)
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Turn<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Turn<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<Block>,
    usage: TokenUsage,
}

#[derive(Debug, Deserialize)]
struct Block {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Outcome of one HTTP attempt.
enum Attempt {
    Done(String),
    /// Rate limit, server error or transport failure; worth another try.
    Retry(LlmError),
}

/// Anthropic Messages API client. Retries rate limits, 5xx and transport errors.
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        // The transport timeout sits above the 60s guard so the guard is what callers observe.
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self { client, api_key })
    }

    async fn attempt(&self, body: &MessagesRequest<'_>) -> Result<Attempt, LlmError> {
        let response = match self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Ok(Attempt::Retry(LlmError::Http(e))),
        };

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&raw)
                .map(|envelope| envelope.error.message)
                .unwrap_or(raw);
            let error = LlmError::Api {
                status: status.as_u16(),
                message,
            };
            return if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                Ok(Attempt::Retry(error))
            } else {
                Err(error)
            };
        }

        let reply: MessagesResponse = response.json().await?;
        debug!(
            "LLM usage: {} in / {} out tokens",
            reply.usage.input_tokens, reply.usage.output_tokens
        );
        reply
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .map(Attempt::Done)
            .ok_or(LlmError::EmptyContent)
    }
}

#[async_trait]
impl LanguageModel for AnthropicClient {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let body = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: [Turn {
                role: "user",
                content: prompt,
            }],
        };

        let mut last = None;
        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let backoff = Duration::from_secs(1 << (attempt - 1));
                tokio::time::sleep(backoff).await;
            }
            match self.attempt(&body).await? {
                Attempt::Done(text) => return Ok(text),
                Attempt::Retry(e) => {
                    warn!("LLM attempt {}/{} failed: {e}", attempt + 1, MAX_RETRIES);
                    last = Some(e);
                }
            }
        }

        Err(match last {
            Some(LlmError::Api { status: 429, .. }) | None => LlmError::RateLimited {
                retries: MAX_RETRIES,
            },
            Some(e) => e,
        })
    }
}

/// Removes a surrounding markdown code fence (with or without a `json` tag).
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(body) = text.strip_prefix("```") else {
        return text;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.trim().strip_suffix("```").unwrap_or(body).trim()
}


#[cfg(test)]
mod tests {
    use super::testing::{Reply, ScriptedLlm};
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        key: String,
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[tokio::test]
    async fn test_call_json_parses_fenced_reply() {
        let llm = ScriptedLlm::new().route(
            "probe",
            Reply::Text("```json\n{\"key\": \"ok\"}\n```".to_string()),
        );
        let probe: Probe = call_json(&llm, "probe", "sys").await.unwrap();
        assert_eq!(probe.key, "ok");
    }

    #[tokio::test]
    async fn test_call_json_schema_mismatch_is_parse_error() {
        let llm = ScriptedLlm::new().route("probe", Reply::Text("{\"other\": 1}".to_string()));
        let err = call_json::<Probe>(&llm, "probe", "sys").await.unwrap_err();
        assert!(err.is_schema_mismatch());
        assert!(!err.is_timeout());
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_json_times_out_after_guard() {
        let llm = ScriptedLlm::new().route("probe", Reply::Hang);
        let started = tokio::time::Instant::now();
        let err = call_json::<Probe>(&llm, "probe", "sys").await.unwrap_err();
        assert!(err.is_timeout());
        assert!(started.elapsed() <= LLM_CALL_TIMEOUT + Duration::from_millis(1));
    }

    #[tokio::test]
    async fn test_guard_passes_through_inner_error() {
        let err = guard::<(), _>(Duration::from_secs(1), async {
            Err(LlmError::Api {
                status: 400,
                message: "bad".to_string(),
            })
        })
        .await
        .unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 400, .. }));
    }
}
