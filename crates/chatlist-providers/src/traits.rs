//! Completion adapter trait — the capability the dispatcher fans out over.
//!
//! All built-in families (OpenAI, DeepSeek, Groq, OpenRouter) share one wire
//! protocol, so they are `HttpAdapter` instances that differ only in base URL
//! and default model.

use std::time::Duration;

use async_trait::async_trait;
use chatlist_core::credentials::Secret;
use chatlist_core::types::Outcome;

/// Sampling temperature sent with every request.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Per-call settings.
#[derive(Clone, Debug)]
pub struct SendConfig {
    /// Budget for the whole call, connect through body.
    pub timeout: Duration,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Provider-specific endpoint replacing the adapter's base URL.
    pub endpoint: Option<String>,
}

impl SendConfig {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            temperature: DEFAULT_TEMPERATURE,
            endpoint: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: Option<&str>) -> Self {
        self.endpoint = endpoint.map(String::from);
        self
    }
}

impl Default for SendConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

/// Translates a generic `(prompt, secret, model, timeout)` call into one
/// provider's wire protocol and back.
#[async_trait]
pub trait CompletionAdapter: Send + Sync {
    /// Send `prompt` as a single user turn.
    ///
    /// Never fails: every error is reported as `Outcome::Failure` with the
    /// time spent so far in `elapsed`.
    async fn send(
        &self,
        prompt: &str,
        secret: &Secret,
        model: Option<&str>,
        config: &SendConfig,
    ) -> Outcome;

    /// Model used when the provider config has none.
    fn default_model(&self) -> &str;

    /// Display name for logging.
    fn name(&self) -> &str;

    /// Full URL the call goes to, honoring `endpoint` when present.
    fn completions_url(&self, endpoint: Option<&str>) -> String;

    /// Effective model id for a call.
    fn resolve_model<'a>(&'a self, model: Option<&'a str>) -> &'a str {
        model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.default_model())
    }
}
