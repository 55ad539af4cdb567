//! Generic HTTP adapter for OpenAI-compatible `/chat/completions` APIs.
//!
//! One instance per provider family. Instances share a connection-pooled
//! `reqwest::Client`; the timeout is applied per request so every provider
//! keeps its own budget.

use std::error::Error as StdError;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, error, warn};

use chatlist_core::credentials::Secret;
use chatlist_core::types::{ChatCompletionRequest, ChatCompletionResponse, ErrorKind, Outcome};

use crate::registry::AdapterSpec;
use crate::traits::{CompletionAdapter, SendConfig};

const COMPLETIONS_PATH: &str = "/chat/completions";

// ─────────────────────────────────────────────
// HttpAdapter
// ─────────────────────────────────────────────

/// Talks to any OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct HttpAdapter {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// Human-readable family name (e.g. `"DeepSeek"`).
    name: String,
    /// API base URL (e.g. `"https://api.deepseek.com/v1"`).
    api_base: String,
    /// Model used when the provider config has none.
    default_model: String,
}

impl std::fmt::Debug for HttpAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAdapter")
            .field("name", &self.name)
            .field("api_base", &self.api_base)
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl HttpAdapter {
    pub fn new(
        client: reqwest::Client,
        name: impl Into<String>,
        api_base: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            name: name.into(),
            api_base: api_base.into(),
            default_model: default_model.into(),
        }
    }

    /// Build the adapter for one of the built-in families.
    pub fn from_spec(client: reqwest::Client, spec: &AdapterSpec) -> Self {
        Self::new(client, spec.display_name, spec.default_api_base, spec.default_model)
    }

    fn transport_failure(&self, err: reqwest::Error, config: &SendConfig, elapsed: Duration) -> Outcome {
        if err.is_timeout() {
            warn!(
                adapter = %self.name,
                timeout_secs = config.timeout.as_secs_f64(),
                "Request timed out"
            );
            return Outcome::timeout(config.timeout, elapsed);
        }

        let kind = if err.is_decode() {
            ErrorKind::UnexpectedError
        } else {
            ErrorKind::NetworkError
        };
        let message = error_chain(&err);
        error!(adapter = %self.name, kind = %kind, error = %message, "HTTP request failed");
        Outcome::failure(kind, message, elapsed)
    }
}

#[async_trait]
impl CompletionAdapter for HttpAdapter {
    async fn send(
        &self,
        prompt: &str,
        secret: &Secret,
        model: Option<&str>,
        config: &SendConfig,
    ) -> Outcome {
        let model = self.resolve_model(model);
        let url = self.completions_url(config.endpoint.as_deref());
        let body = ChatCompletionRequest::single_turn(model, prompt, config.temperature);

        debug!(
            adapter = %self.name,
            url = %url,
            model = %model,
            timeout_secs = config.timeout.as_secs_f64(),
            "Calling provider"
        );

        let started = Instant::now();
        let result = self
            .client
            .post(&url)
            .bearer_auth(secret.expose())
            .timeout(config.timeout)
            .json(&body)
            .send()
            .await;

        let response = match result {
            Ok(resp) => resp,
            Err(e) => return self.transport_failure(e, config, started.elapsed()),
        };

        let status = response.status();
        if status != StatusCode::OK {
            let error_text = match response.text().await {
                Ok(text) => text,
                Err(e) if e.is_timeout() => {
                    return Outcome::timeout(config.timeout, started.elapsed());
                }
                Err(_) => "Failed to read error body".to_string(),
            };
            warn!(
                adapter = %self.name,
                status = status.as_u16(),
                body = %error_text,
                "API error"
            );
            return Outcome::failure(
                ErrorKind::ApiError,
                format!("{} - {}", status.as_u16(), error_text),
                started.elapsed(),
            );
        }

        let bytes = match response.bytes().await {
            Ok(b) => b,
            Err(e) => return self.transport_failure(e, config, started.elapsed()),
        };

        match serde_json::from_slice::<ChatCompletionResponse>(&bytes) {
            Ok(parsed) => {
                let outcome = parsed.into_outcome(started.elapsed());
                debug!(
                    adapter = %self.name,
                    status = status.as_u16(),
                    success = outcome.is_success(),
                    elapsed_ms = outcome.elapsed().as_millis() as u64,
                    "Provider response received"
                );
                outcome
            }
            Err(e) => {
                error!(adapter = %self.name, error = %e, "Failed to parse provider response");
                Outcome::failure(
                    ErrorKind::UnexpectedError,
                    format!("Error parsing response: {e}"),
                    started.elapsed(),
                )
            }
        }
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// `<base>/chat/completions`. An endpoint that already ends with the
    /// completions path is used as is.
    fn completions_url(&self, endpoint: Option<&str>) -> String {
        let base = endpoint
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or(self.api_base.as_str())
            .trim_end_matches('/');
        if base.ends_with(COMPLETIONS_PATH) {
            base.to_string()
        } else {
            format!("{}{}", base, COMPLETIONS_PATH)
        }
    }
}

// ─────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────

/// Shared client for all adapters. Timeouts are set per request.
pub fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("chatlist/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

/// Flatten an error and its sources into one line.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
