//! HTTP translation oracle for OpenAI-compatible chat completion APIs.
//!
//! One request translates one source text into every target locale. The
//! model is constrained to a JSON schema of the form
//! `{"translations": [{"language": "<code>", "translate": "<text>"}]}`.
//! Transient failures are retried a bounded number of times.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use super::oracle::{OracleError, OracleResponse, TranslationOracle};
use crate::storage::config::OracleSettings;

/// Default instructions sent with every request.
pub const SYSTEM_PROMPT: &str = "You translate user interface strings of a software application. \
You receive a JSON object with the source `text` and a list of target `languages` given as \
locale codes. Return exactly one translation per requested language code. Keep placeholders \
such as {name}, %s, %(count)d and markup tags unchanged, and keep leading and trailing \
whitespace and punctuation as in the source.";

/// Chat completion client implementing [`TranslationOracle`].
pub struct OpenAiOracle {
    /// HTTP client
    http: reqwest::Client,
    /// Base URL for API
    base_url: String,
    /// API key for authentication
    api_key: String,
    /// Chat model name
    model: String,
    /// System instructions
    system_prompt: String,
    /// Retries after a transient failure
    max_retries: u32,
    /// Delay before each retry
    retry_intervals: Vec<Duration>,
}

impl OpenAiOracle {
    /// Create a client from resolved settings.
    ///
    /// Fails with [`OracleError::Config`] when no API key is set or the proxy
    /// URL is invalid.
    pub fn new(settings: &OracleSettings) -> Result<Self, OracleError> {
        let api_key = settings
            .require_api_key()
            .map_err(|e| OracleError::Config(e.to_string()))?
            .to_string();

        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(settings.timeout_secs));
        if let Some(proxy_url) = &settings.proxy_url {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| OracleError::Config(format!("proxy {}: {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }
        let http = builder
            .build()
            .map_err(|e| OracleError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: settings.model.clone(),
            system_prompt: settings
                .system_prompt
                .clone()
                .unwrap_or_else(|| SYSTEM_PROMPT.to_string()),
            max_retries: settings.max_retries,
            retry_intervals: settings
                .retry_intervals_ms
                .iter()
                .map(|ms| Duration::from_millis(*ms))
                .collect(),
        })
    }

    /// Model used for requests.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        self.retry_intervals
            .get(attempt as usize)
            .or(self.retry_intervals.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }

    async fn send_request(&self, body: &serde_json::Value) -> Result<OracleResponse, OracleError> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    OracleError::Network(e.to_string())
                } else {
                    OracleError::Api(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                OracleError::Network(e.to_string())
            } else {
                OracleError::InvalidResponse(e.to_string())
            }
        })?;

        if status.is_success() {
            parse_completion(&text)
        } else if status.as_u16() == 429 {
            Err(OracleError::RateLimited)
        } else if status.as_u16() == 401 || status.as_u16() == 403 {
            Err(OracleError::Unauthorized)
        } else if status.is_server_error() {
            Err(OracleError::Unavailable(format!("status {}", status)))
        } else {
            Err(OracleError::Api(format!(
                "API returned status {}: {}",
                status,
                text.trim()
            )))
        }
    }
}

impl TranslationOracle for OpenAiOracle {
    async fn request_translation(
        &self,
        source_text: &str,
        target_locales: &[String],
    ) -> Result<OracleResponse, OracleError> {
        if target_locales.is_empty() {
            return Err(OracleError::NoTargets);
        }
        let body = build_request(&self.model, &self.system_prompt, source_text, target_locales);

        let mut attempt = 0;
        loop {
            match self.send_request(&body).await {
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay = self.retry_delay(attempt);
                    tracing::warn!(
                        "Translation request failed ({}), retry {} of {} in {:?}",
                        e,
                        attempt + 1,
                        self.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

/// Chat completion request body for one source text.
pub fn build_request(
    model: &str,
    system_prompt: &str,
    source_text: &str,
    target_locales: &[String],
) -> serde_json::Value {
    let user = json!({ "text": source_text, "languages": target_locales });
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": system_prompt },
            { "role": "user", "content": user.to_string() },
        ],
        "response_format": {
            "type": "json_schema",
            "json_schema": {
                "name": "translations",
                "strict": true,
                "schema": {
                    "type": "object",
                    "properties": {
                        "translations": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "language": { "type": "string" },
                                    "translate": { "type": "string" }
                                },
                                "required": ["language", "translate"],
                                "additionalProperties": false
                            }
                        }
                    },
                    "required": ["translations"],
                    "additionalProperties": false
                }
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranslationPayload {
    translations: Vec<TranslationItem>,
}

#[derive(Debug, Deserialize)]
struct TranslationItem {
    language: String,
    translate: String,
}

/// Extract the per-locale translations from a chat completion response body.
///
/// Empty translations are dropped; for a repeated language the first wins.
pub fn parse_completion(body: &str) -> Result<OracleResponse, OracleError> {
    let completion: ChatCompletion = serde_json::from_str(body)?;
    let message = completion
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| OracleError::InvalidResponse("no choices".to_string()))?;

    if let Some(refusal) = message.refusal.filter(|r| !r.is_empty()) {
        return Err(OracleError::Refused(refusal));
    }
    let content = message
        .content
        .ok_or_else(|| OracleError::InvalidResponse("empty message".to_string()))?;
    let payload: TranslationPayload = serde_json::from_str(&content)?;

    let mut response = OracleResponse::new();
    for item in payload.translations {
        if item.translate.trim().is_empty() {
            continue;
        }
        response.entry(item.language).or_insert(item.translate);
    }
    Ok(response)
}
