//! Core types for ChatList.
//!
//! Three groups live here:
//! - provider configuration (`ProviderConfig`, `ProviderType`)
//! - the dispatch envelope (`DispatchRequest`, `Outcome`, `DispatchResult`,
//!   `ResultRecord`)
//! - the OpenAI-compatible chat completions wire format shared by every
//!   supported provider family

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ─────────────────────────────────────────────
// Provider type
// ─────────────────────────────────────────────

/// Provider family tag, used to pick the adapter for a provider.
///
/// Tags are case-insensitive on input. Anything that is not one of the
/// built-in families lands in `Other`, which only resolves to an adapter if
/// a caller registered one for it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProviderType {
    OpenAi,
    DeepSeek,
    Groq,
    OpenRouter,
    Other(String),
}

impl ProviderType {
    /// Canonical lowercase tag (e.g. `"deepseek"`).
    pub fn as_str(&self) -> &str {
        match self {
            ProviderType::OpenAi => "openai",
            ProviderType::DeepSeek => "deepseek",
            ProviderType::Groq => "groq",
            ProviderType::OpenRouter => "openrouter",
            ProviderType::Other(tag) => tag,
        }
    }
}

impl From<&str> for ProviderType {
    fn from(tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        match tag.as_str() {
            "openai" => ProviderType::OpenAi,
            "deepseek" => ProviderType::DeepSeek,
            "groq" => ProviderType::Groq,
            "openrouter" => ProviderType::OpenRouter,
            _ => ProviderType::Other(tag),
        }
    }
}

impl From<String> for ProviderType {
    fn from(tag: String) -> Self {
        ProviderType::from(tag.as_str())
    }
}

impl From<ProviderType> for String {
    fn from(provider_type: ProviderType) -> Self {
        provider_type.as_str().to_string()
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────
// Provider configuration
// ─────────────────────────────────────────────

/// One configured completion provider.
///
/// Owned by the configuration store; the dispatcher only ever reads a
/// snapshot of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Opaque identifier, unique within one dispatch.
    pub id: String,
    /// Name shown next to the provider's answer.
    #[serde(alias = "name")]
    pub display_name: String,
    /// Base URL or full completions URL. Empty means "adapter default".
    #[serde(default, alias = "api_url")]
    pub endpoint_url: String,
    #[serde(alias = "model_type")]
    pub provider_type: ProviderType,
    /// Name of the environment variable holding the API key.
    #[serde(alias = "api_id")]
    pub credential_ref: String,
    /// Provider-side model id. Falls back to the adapter's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_identifier: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Per-provider timeout budget, overriding the request-wide one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_active() -> bool {
    true
}

impl ProviderConfig {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        provider_type: impl Into<ProviderType>,
        credential_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            endpoint_url: String::new(),
            provider_type: provider_type.into(),
            credential_ref: credential_ref.into(),
            model_identifier: None,
            active: true,
            timeout_secs: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = endpoint_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_identifier = Some(model.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// The configured endpoint, if it is non-blank.
    pub fn endpoint_override(&self) -> Option<&str> {
        let url = self.endpoint_url.trim();
        (!url.is_empty()).then_some(url)
    }

    /// The configured model id, if it is non-blank.
    pub fn model(&self) -> Option<&str> {
        self.model_identifier
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

// ─────────────────────────────────────────────
// Dispatch request
// ─────────────────────────────────────────────

/// One fan-out round: a prompt and the providers to send it to.
#[derive(Clone, Debug)]
pub struct DispatchRequest {
    pub prompt: String,
    pub providers: Vec<ProviderConfig>,
    /// Default budget for each call. A provider's `timeout_secs` wins.
    pub per_call_timeout: Duration,
}

impl DispatchRequest {
    pub fn new(
        prompt: impl Into<String>,
        providers: Vec<ProviderConfig>,
        per_call_timeout: Duration,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            providers,
            per_call_timeout,
        }
    }

    /// Build a request from the active subset of `providers`.
    pub fn from_active<'a>(
        prompt: impl Into<String>,
        providers: impl IntoIterator<Item = &'a ProviderConfig>,
        per_call_timeout: Duration,
    ) -> Self {
        let active = providers
            .into_iter()
            .filter(|p| p.active)
            .cloned()
            .collect();
        Self::new(prompt, active, per_call_timeout)
    }

    /// Timeout budget for one provider's call. A provider `timeout_secs` of
    /// 0 is ignored, like every other zero timeout setting.
    pub fn budget_for(&self, provider: &ProviderConfig) -> Duration {
        provider
            .timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(self.per_call_timeout)
    }
}

// ─────────────────────────────────────────────
// Outcome
// ─────────────────────────────────────────────

/// Why a provider call did not produce an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingCredential,
    UnsupportedProviderType,
    Timeout,
    NetworkError,
    ApiError,
    UnexpectedError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingCredential => "missing_credential",
            ErrorKind::UnsupportedProviderType => "unsupported_provider_type",
            ErrorKind::Timeout => "timeout",
            ErrorKind::NetworkError => "network_error",
            ErrorKind::ApiError => "api_error",
            ErrorKind::UnexpectedError => "unexpected_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one provider call. `elapsed` is always populated.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Outcome {
    Success {
        response_text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        total_tokens: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        prompt_tokens: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        completion_tokens: Option<u32>,
        #[serde(serialize_with = "serialize_secs")]
        elapsed: Duration,
    },
    Failure {
        kind: ErrorKind,
        message: String,
        #[serde(serialize_with = "serialize_secs")]
        elapsed: Duration,
    },
}

fn serialize_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

impl Outcome {
    /// Successful answer with optional token usage.
    pub fn success(
        response_text: impl Into<String>,
        usage: Option<UsageInfo>,
        elapsed: Duration,
    ) -> Self {
        let usage = usage.unwrap_or_default();
        Outcome::Success {
            response_text: response_text.into(),
            total_tokens: usage.total_tokens,
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            elapsed,
        }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>, elapsed: Duration) -> Self {
        Outcome::Failure {
            kind,
            message: message.into(),
            elapsed,
        }
    }

    /// Timeout failure for a call that ran out of its `budget`.
    pub fn timeout(budget: Duration, elapsed: Duration) -> Self {
        Outcome::failure(
            ErrorKind::Timeout,
            format!("request exceeded {}s", budget.as_secs_f64()),
            elapsed,
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            Outcome::Success { elapsed, .. } | Outcome::Failure { elapsed, .. } => *elapsed,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Failure { kind, .. } => Some(*kind),
            Outcome::Success { .. } => None,
        }
    }

    pub fn response_text(&self) -> Option<&str> {
        match self {
            Outcome::Success { response_text, .. } => Some(response_text),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn total_tokens(&self) -> Option<u32> {
        match self {
            Outcome::Success { total_tokens, .. } => *total_tokens,
            Outcome::Failure { .. } => None,
        }
    }

    /// Text for a result row: the answer, or `Error: <message>`.
    pub fn display_text(&self) -> String {
        match self {
            Outcome::Success { response_text, .. } => response_text.clone(),
            Outcome::Failure { message, .. } => format!("Error: {message}"),
        }
    }
}

// ─────────────────────────────────────────────
// Dispatch result
// ─────────────────────────────────────────────

/// An `Outcome` bound to the provider that produced it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub provider_id: String,
    pub display_name: String,
    pub outcome: Outcome,
}

impl DispatchResult {
    pub fn new(provider: &ProviderConfig, outcome: Outcome) -> Self {
        Self {
            provider_id: provider.id.clone(),
            display_name: provider.display_name.clone(),
            outcome,
        }
    }

    /// Persistence record for a successful result; `None` for failures.
    pub fn to_record(&self, prompt_id: i64) -> Option<ResultRecord> {
        match &self.outcome {
            Outcome::Success {
                response_text,
                total_tokens,
                elapsed,
                ..
            } => Some(ResultRecord {
                prompt_id,
                provider_id: self.provider_id.clone(),
                display_name: self.display_name.clone(),
                response_text: response_text.clone(),
                total_tokens: *total_tokens,
                elapsed_secs: elapsed.as_secs_f64(),
                created_at: Utc::now(),
            }),
            Outcome::Failure { .. } => None,
        }
    }
}

/// What the storage layer keeps for a result the user chose to save.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub prompt_id: i64,
    pub provider_id: String,
    pub display_name: String,
    pub response_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u32>,
    pub elapsed_secs: f64,
    pub created_at: DateTime<Utc>,
}

/// Records for the user-selected, successful subset of `results`.
///
/// Failed results are skipped even when selected.
pub fn selected_records(
    results: &[DispatchResult],
    selected_ids: &[&str],
    prompt_id: i64,
) -> Vec<ResultRecord> {
    results
        .iter()
        .filter(|r| selected_ids.contains(&r.provider_id.as_str()))
        .filter_map(|r| r.to_record(prompt_id))
        .collect()
}

// ─────────────────────────────────────────────
// Wire format (OpenAI chat completions)
// ─────────────────────────────────────────────

/// A chat message. Dispatch only ever sends a single user turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body: `{"model", "messages": [{"role":"user","content"}], "temperature"}`.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
}

impl ChatCompletionRequest {
    pub fn single_turn(model: impl Into<String>, prompt: impl Into<String>, temperature: f64) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            temperature,
        }
    }
}

/// Token usage. Every field is optional on the wire.
///
/// Counts that are not non-negative integers (`5.5`, `"n/a"`, `-1`) decode
/// as `None`; a whole float such as `5.0` or a numeric string is accepted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageInfo {
    #[serde(default, deserialize_with = "lenient_count")]
    pub prompt_tokens: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub completion_tokens: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_tokens: Option<u32>,
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_from_value))
}

fn count_from_value(value: &serde_json::Value) -> Option<u32> {
    use serde_json::Value;

    let count = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    u32::try_from(count).ok()
}

/// Usage block that is not an object is treated as absent.
fn lenient_usage<'de, D>(deserializer: D) -> Result<Option<UsageInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .filter(serde_json::Value::is_object)
        .and_then(|v| serde_json::from_value(v).ok()))
}

/// Raw 200 response body. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default, deserialize_with = "lenient_usage")]
    pub usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Convert into an `Outcome`: first choice's content plus usage.
    ///
    /// A body without choices is an `UnexpectedError`; a `null` content is an
    /// empty answer.
    pub fn into_outcome(self, elapsed: Duration) -> Outcome {
        match self.choices.into_iter().next() {
            Some(choice) => Outcome::success(
                choice.message.content.unwrap_or_default(),
                self.usage,
                elapsed,
            ),
            None => Outcome::failure(
                ErrorKind::UnexpectedError,
                "No choices in response",
                elapsed,
            ),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── ProviderType ──

    #[test]
    fn test_provider_type_case_insensitive() {
        assert_eq!(ProviderType::from("OpenAI"), ProviderType::OpenAi);
        assert_eq!(ProviderType::from(" DeepSeek "), ProviderType::DeepSeek);
        assert_eq!(ProviderType::from("GROQ"), ProviderType::Groq);
        assert_eq!(ProviderType::from("openrouter"), ProviderType::OpenRouter);
    }

    #[test]
    fn test_provider_type_unknown_is_other() {
        let t = ProviderType::from("Mistral");
        assert_eq!(t, ProviderType::Other("mistral".to_string()));
        assert_eq!(t.to_string(), "mistral");
    }

    #[test]
    fn test_provider_type_serde_as_string() {
        let json = serde_json::to_value(ProviderType::DeepSeek).unwrap();
        assert_eq!(json, "deepseek");
        let back: ProviderType = serde_json::from_value(json!("Groq")).unwrap();
        assert_eq!(back, ProviderType::Groq);
    }

    // ── ProviderConfig ──

    #[test]
    fn test_provider_config_camel_case_json() {
        let cfg: ProviderConfig = serde_json::from_value(json!({
            "id": "1",
            "displayName": "GPT",
            "providerType": "openai",
            "credentialRef": "OPENAI_API_KEY",
            "modelIdentifier": "gpt-4o-mini"
        }))
        .unwrap();

        assert_eq!(cfg.display_name, "GPT");
        assert_eq!(cfg.provider_type, ProviderType::OpenAi);
        assert_eq!(cfg.model(), Some("gpt-4o-mini"));
        assert!(cfg.active);
        assert!(cfg.endpoint_override().is_none());
    }

    #[test]
    fn test_provider_config_legacy_field_names() {
        let cfg: ProviderConfig = serde_json::from_value(json!({
            "id": "7",
            "name": "DeepSeek Chat",
            "api_url": "https://api.deepseek.com/v1",
            "api_id": "DEEPSEEK_API_KEY",
            "model_type": "deepseek"
        }))
        .unwrap();

        assert_eq!(cfg.display_name, "DeepSeek Chat");
        assert_eq!(cfg.credential_ref, "DEEPSEEK_API_KEY");
        assert_eq!(cfg.endpoint_override(), Some("https://api.deepseek.com/v1"));
        assert_eq!(cfg.provider_type, ProviderType::DeepSeek);
    }

    #[test]
    fn test_blank_model_and_endpoint_are_none() {
        let cfg = ProviderConfig::new("a", "A", "openai", "KEY")
            .with_model("  ")
            .with_endpoint(" ");
        assert!(cfg.model().is_none());
        assert!(cfg.endpoint_override().is_none());
    }

    // ── DispatchRequest ──

    #[test]
    fn test_budget_for_prefers_provider_timeout() {
        let fast = ProviderConfig::new("a", "A", "openai", "K").with_timeout_secs(5);
        let default = ProviderConfig::new("b", "B", "groq", "K");
        let req = DispatchRequest::new("hi", vec![fast.clone(), default.clone()], Duration::from_secs(30));

        assert_eq!(req.budget_for(&fast), Duration::from_secs(5));
        assert_eq!(req.budget_for(&default), Duration::from_secs(30));
    }

    #[test]
    fn test_budget_for_ignores_zero_provider_timeout() {
        let zero = ProviderConfig::new("z", "Z", "openai", "K").with_timeout_secs(0);
        let req = DispatchRequest::new("hi", vec![zero.clone()], Duration::from_secs(30));
        assert_eq!(req.budget_for(&zero), Duration::from_secs(30));
    }

    #[test]
    fn test_from_active_filters_inactive() {
        let providers = vec![
            ProviderConfig::new("a", "A", "openai", "K"),
            ProviderConfig::new("b", "B", "groq", "K").inactive(),
        ];
        let req = DispatchRequest::from_active("hi", &providers, Duration::from_secs(1));
        assert_eq!(req.providers.len(), 1);
        assert_eq!(req.providers[0].id, "a");
    }

    // ── Wire format ──

    #[test]
    fn test_request_body_shape() {
        let body = ChatCompletionRequest::single_turn("gpt-3.5-turbo", "Hello", 0.7);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(
            json,
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [{"role": "user", "content": "Hello"}],
                "temperature": 0.7
            })
        );
    }

    #[test]
    fn test_response_with_full_usage() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{"message": {"content": "hi"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5}
        }))
        .unwrap();

        let outcome = resp.into_outcome(Duration::from_millis(120));
        assert_eq!(
            outcome,
            Outcome::Success {
                response_text: "hi".to_string(),
                total_tokens: Some(5),
                prompt_tokens: Some(3),
                completion_tokens: Some(2),
                elapsed: Duration::from_millis(120),
            }
        );
    }

    #[test]
    fn test_response_with_partial_usage() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "hi"}}],
            "usage": {"total_tokens": 5}
        }))
        .unwrap();

        match resp.into_outcome(Duration::ZERO) {
            Outcome::Success {
                total_tokens,
                prompt_tokens,
                completion_tokens,
                ..
            } => {
                assert_eq!(total_tokens, Some(5));
                assert!(prompt_tokens.is_none());
                assert!(completion_tokens.is_none());
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn test_response_without_usage() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "ok"}}]
        }))
        .unwrap();

        let outcome = resp.into_outcome(Duration::ZERO);
        assert_eq!(outcome.response_text(), Some("ok"));
        assert!(outcome.total_tokens().is_none());
    }

    #[test]
    fn test_response_with_odd_usage_types_keeps_answer() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "hi"}}],
            "usage": {"total_tokens": 5.0, "prompt_tokens": "2", "completion_tokens": 3.5}
        }))
        .unwrap();

        match resp.into_outcome(Duration::ZERO) {
            Outcome::Success {
                response_text,
                total_tokens,
                prompt_tokens,
                completion_tokens,
                ..
            } => {
                assert_eq!(response_text, "hi");
                assert_eq!(total_tokens, Some(5));
                assert_eq!(prompt_tokens, Some(2));
                assert_eq!(completion_tokens, None);
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn test_response_with_non_object_usage() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "ok"}}],
            "usage": "unavailable"
        }))
        .unwrap();
        assert!(resp.usage.is_none());

        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "ok"}}],
            "usage": {"total_tokens": -1, "prompt_tokens": null}
        }))
        .unwrap();
        assert_eq!(resp.usage, Some(UsageInfo::default()));
    }

    #[test]
    fn test_response_empty_choices_is_unexpected() {
        let resp: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": [], "usage": null})).unwrap();

        let outcome = resp.into_outcome(Duration::from_millis(3));
        assert_eq!(outcome.error_kind(), Some(ErrorKind::UnexpectedError));
        assert_eq!(outcome.elapsed(), Duration::from_millis(3));
    }

    // ── Outcome / DispatchResult ──

    #[test]
    fn test_timeout_message() {
        let outcome = Outcome::timeout(Duration::from_secs(30), Duration::from_secs(30));
        assert_eq!(outcome.error_kind(), Some(ErrorKind::Timeout));
        assert_eq!(outcome.display_text(), "Error: request exceeded 30s");
    }

    #[test]
    fn test_outcome_json() {
        let failure = Outcome::failure(ErrorKind::ApiError, "429 - slow down", Duration::from_millis(1500));
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["kind"], "api_error");
        assert_eq!(json["elapsed"], 1.5);

        let success = Outcome::success("hi", None, Duration::ZERO);
        let json = serde_json::to_value(&success).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["responseText"], "hi");
        assert!(json.get("totalTokens").is_none());
    }

    #[test]
    fn test_to_record_only_for_success() {
        let provider = ProviderConfig::new("p1", "GPT", "openai", "K");
        let usage = UsageInfo {
            total_tokens: Some(9),
            ..Default::default()
        };
        let ok = DispatchResult::new(&provider, Outcome::success("answer", Some(usage), Duration::from_secs(2)));
        let record = ok.to_record(42).unwrap();
        assert_eq!(record.prompt_id, 42);
        assert_eq!(record.provider_id, "p1");
        assert_eq!(record.response_text, "answer");
        assert_eq!(record.total_tokens, Some(9));
        assert_eq!(record.elapsed_secs, 2.0);

        let failed = DispatchResult::new(
            &provider,
            Outcome::failure(ErrorKind::NetworkError, "refused", Duration::ZERO),
        );
        assert!(failed.to_record(42).is_none());
    }

    #[test]
    fn test_selected_records_skips_unselected_and_failed() {
        let a = ProviderConfig::new("a", "A", "openai", "K");
        let b = ProviderConfig::new("b", "B", "groq", "K");
        let c = ProviderConfig::new("c", "C", "deepseek", "K");
        let results = vec![
            DispatchResult::new(&a, Outcome::success("one", None, Duration::ZERO)),
            DispatchResult::new(&b, Outcome::failure(ErrorKind::Timeout, "t", Duration::ZERO)),
            DispatchResult::new(&c, Outcome::success("three", None, Duration::ZERO)),
        ];

        let records = selected_records(&results, &["a", "b"], 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].provider_id, "a");
    }
}
