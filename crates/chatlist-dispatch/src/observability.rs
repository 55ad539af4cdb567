//! Structured log records for dispatches.
//!
//! One record per provider result (endpoint, model, temperature, token
//! breakdown, error kind) and one summary per dispatch.

use std::time::Duration;

use chatlist_core::types::{DispatchResult, Outcome, ProviderConfig};
use tracing::{info, warn};

/// Technical details of how a provider was called.
///
/// Empty when the pipeline stopped before reaching an adapter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallTrace {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
}

/// Log one provider's result.
pub fn log_result(provider: &ProviderConfig, trace: &CallTrace, result: &DispatchResult) {
    let endpoint = trace.endpoint.as_deref().unwrap_or("-");
    let model = trace.model.as_deref().unwrap_or("-");

    match &result.outcome {
        Outcome::Success {
            response_text,
            total_tokens,
            prompt_tokens,
            completion_tokens,
            elapsed,
        } => info!(
            provider = %result.provider_id,
            name = %result.display_name,
            provider_type = %provider.provider_type,
            endpoint,
            model,
            temperature = ?trace.temperature,
            prompt_tokens = ?prompt_tokens,
            completion_tokens = ?completion_tokens,
            total_tokens = ?total_tokens,
            response_chars = response_text.chars().count(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Provider succeeded"
        ),
        Outcome::Failure {
            kind,
            message,
            elapsed,
        } => warn!(
            provider = %result.provider_id,
            name = %result.display_name,
            provider_type = %provider.provider_type,
            endpoint,
            model,
            temperature = ?trace.temperature,
            kind = %kind,
            error = %message,
            elapsed_ms = elapsed.as_millis() as u64,
            "Provider failed"
        ),
    }
}

/// Counts for one finished dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct DispatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Wall-clock time of the whole fan-out.
    pub wall_time: Duration,
    /// Longest single provider call.
    pub slowest: Duration,
}

impl DispatchSummary {
    pub fn from_results(results: &[DispatchResult], wall_time: Duration) -> Self {
        let succeeded = results.iter().filter(|r| r.outcome.is_success()).count();
        let slowest = results
            .iter()
            .map(|r| r.outcome.elapsed())
            .max()
            .unwrap_or_default();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            wall_time,
            slowest,
        }
    }

    pub fn log(&self) {
        info!(
            total = self.total,
            ok = self.succeeded,
            failed = self.failed,
            wall_ms = self.wall_time.as_millis() as u64,
            slowest_ms = self.slowest.as_millis() as u64,
            "Dispatch complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlist_core::types::ErrorKind;

    #[test]
    fn test_summary_counts() {
        let a = ProviderConfig::new("a", "A", "openai", "K");
        let b = ProviderConfig::new("b", "B", "groq", "K");
        let c = ProviderConfig::new("c", "C", "deepseek", "K");
        let results = vec![
            DispatchResult::new(&a, Outcome::success("x", None, Duration::from_millis(200))),
            DispatchResult::new(
                &b,
                Outcome::failure(ErrorKind::Timeout, "request exceeded 1s", Duration::from_secs(1)),
            ),
            DispatchResult::new(
                &c,
                Outcome::failure(ErrorKind::MissingCredential, "no key", Duration::ZERO),
            ),
        ];

        let summary = DispatchSummary::from_results(&results, Duration::from_millis(1010));
        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.slowest, Duration::from_secs(1));
    }

    #[test]
    fn test_summary_empty() {
        let summary = DispatchSummary::from_results(&[], Duration::ZERO);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.slowest, Duration::ZERO);
    }

    #[test]
    fn test_log_result_accepts_both_variants() {
        let provider = ProviderConfig::new("a", "A", "openai", "K");
        let trace = CallTrace {
            endpoint: Some("https://api.openai.com/v1/chat/completions".into()),
            model: Some("gpt-3.5-turbo".into()),
            temperature: Some(0.7),
        };
        log_result(
            &provider,
            &trace,
            &DispatchResult::new(&provider, Outcome::success("ok", None, Duration::ZERO)),
        );
        log_result(
            &provider,
            &CallTrace::default(),
            &DispatchResult::new(
                &provider,
                Outcome::failure(ErrorKind::NetworkError, "refused", Duration::ZERO),
            ),
        );
    }
}
