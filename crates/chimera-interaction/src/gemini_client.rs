//! GeminiGenerationClient - Direct REST API implementation for Gemini.
//!
//! Calls the `generateContent` endpoint with the prompt and generation
//! parameters of one migration run. The credential is either supplied at
//! construction or resolved on first use from a [`SecretService`].

use async_trait::async_trait;
use chimera_core::generation::{GenerationClient, GenerationRequest, NO_OUTPUT_PLACEHOLDER};
use chimera_core::secret::SecretService;
use chimera_core::{ChimeraError, Result};
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

enum Credential {
    Static(String),
    Lazy {
        service: Arc<dyn SecretService>,
        api_key: OnceCell<String>,
    },
}

/// Generation client that talks to the Gemini HTTP API.
pub struct GeminiGenerationClient {
    client: Client,
    credential: Credential,
    base_url: String,
    retry_delay: Duration,
}

impl GeminiGenerationClient {
    /// Creates a client with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_credential(Credential::Static(api_key.into()))
    }

    /// Creates a client that loads its API key from `service` on the first call.
    ///
    /// A missing key surfaces as `ChimeraError::Configuration` from
    /// [`GenerationClient::generate`], before any request is sent.
    pub fn from_secret_service(service: Arc<dyn SecretService>) -> Self {
        Self::with_credential(Credential::Lazy {
            service,
            api_key: OnceCell::new(),
        })
    }

    fn with_credential(credential: Credential) -> Self {
        Self {
            client: Client::new(),
            credential,
            base_url: BASE_URL.to_string(),
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Overrides the models endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the base delay between retries of retryable failures.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    async fn api_key(&self) -> Result<&str> {
        match &self.credential {
            Credential::Static(key) if key.trim().is_empty() => Err(missing_key_error()),
            Credential::Static(key) => Ok(key.as_str()),
            Credential::Lazy { service, api_key } => api_key
                .get_or_try_init(|| async {
                    service
                        .gemini_api_key()
                        .await
                        .map_err(|e| {
                            ChimeraError::configuration(format!(
                                "{e}. Fix the secret file or set GEMINI_API_KEY."
                            ))
                        })?
                        .ok_or_else(missing_key_error)
                })
                .await
                .map(String::as_str),
        }
    }

    async fn send_request(
        &self,
        api_key: &str,
        request: &GenerationRequest,
        body: &GenerateContentRequest,
    ) -> std::result::Result<String, AttemptFailure> {
        let url = format!(
            "{}/{model}:generateContent",
            self.base_url,
            model = request.model_name
        );

        let mut builder = self.client.post(url).query(&[("key", api_key)]).json(body);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|err| AttemptFailure {
            error: ChimeraError::generation(format!("Gemini API request failed: {err}")),
            is_retryable: err.is_connect() || err.is_timeout(),
            retry_after: None,
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: GenerateContentResponse =
            response.json().await.map_err(|err| AttemptFailure {
                error: ChimeraError::generation(format!("Failed to parse Gemini response: {err}")),
                is_retryable: false,
                retry_after: None,
            })?;

        Ok(extract_text_response(parsed))
    }
}

#[async_trait]
impl GenerationClient for GeminiGenerationClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let api_key = self.api_key().await?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                top_p: request.top_p,
            },
        };

        let mut attempt = 0;
        loop {
            tracing::debug!(
                model = %request.model_name,
                attempt,
                "Sending Gemini generateContent request"
            );

            match self.send_request(api_key, &request, &body).await {
                Ok(text) => return Ok(text),
                Err(failure) if failure.is_retryable && attempt < request.max_retries => {
                    attempt += 1;
                    let delay = failure
                        .retry_after
                        .unwrap_or_else(|| self.retry_delay * attempt);
                    tracing::warn!(
                        attempt,
                        max_retries = request.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying Gemini request: {}",
                        failure.error
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }
}

fn missing_key_error() -> ChimeraError {
    ChimeraError::configuration(
        "Gemini API key not configured. Add it to ~/.config/chimera/secret.json or set GEMINI_API_KEY.",
    )
}

/// A failed attempt, with what the retry loop needs to decide on another one.
struct AttemptFailure {
    error: ChimeraError,
    is_retryable: bool,
    retry_after: Option<Duration>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Joins the text parts of the first candidate; never returns an empty string.
fn extract_text_response(response: GenerateContentResponse) -> String {
    let text: String = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        NO_OUTPUT_PLACEHOLDER.to_string()
    } else {
        text
    }
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> AttemptFailure {
    let upstream = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    AttemptFailure {
        error: ChimeraError::generation_with_status(
            status.as_u16(),
            format!("Gemini API error: {upstream}"),
        ),
        is_retryable,
        retry_after,
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    // HTTP-date values are ignored; only delay-seconds is honoured.
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_extract_joins_text_parts() {
        let parsed = response(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "a" }, { "text": "b" }] } }]
        }));
        assert_eq!(extract_text_response(parsed), "ab");
    }

    #[test]
    fn test_extract_empty_payload_yields_placeholder() {
        assert_eq!(
            extract_text_response(response(serde_json::json!({}))),
            NO_OUTPUT_PLACEHOLDER
        );
        let blank = response(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "  " }] } }]
        }));
        assert_eq!(extract_text_response(blank), NO_OUTPUT_PLACEHOLDER);
    }

    #[test]
    fn test_map_http_error_uses_upstream_message() {
        let body = r#"{"error": {"code": 429, "message": "quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        let failure = map_http_error(StatusCode::TOO_MANY_REQUESTS, body.to_string(), None);

        assert!(failure.is_retryable);
        match failure.error {
            ChimeraError::Generation {
                message,
                status_code,
            } => {
                assert_eq!(status_code, Some(429));
                assert!(message.contains("RESOURCE_EXHAUSTED: quota exceeded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_with_plain_body() {
        let failure = map_http_error(StatusCode::BAD_REQUEST, "bad model".to_string(), None);
        assert!(!failure.is_retryable);
        assert!(failure.error.to_string().contains("bad model"));
    }

    #[test]
    fn test_parse_retry_after_seconds_only() {
        let seconds = HeaderValue::from_static("7");
        assert_eq!(parse_retry_after(Some(&seconds)), Some(Duration::from_secs(7)));
        let date = HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(parse_retry_after(Some(&date)), None);
        assert_eq!(parse_retry_after(None), None);
    }

    #[tokio::test]
    async fn test_blank_static_key_is_configuration_error() {
        let client = GeminiGenerationClient::new("  ");
        let err = client.api_key().await.unwrap_err();
        assert!(err.is_configuration());
    }
}
