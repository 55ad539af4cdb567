//! Fan-out dispatcher.
//!
//! Every provider in a `DispatchRequest` gets its own pipeline, spawned as a
//! separate `tokio` task:
//!
//! 1. resolve the credential (missing → `MissingCredential`, no network)
//! 2. look up the adapter (unknown type → `UnsupportedProviderType`, no network)
//! 3. call the adapter under the provider's own timeout budget
//!
//! Tasks share only the prompt and read-only lookups. Each task returns its
//! own `DispatchResult` and the dispatcher joins them into a buffer indexed
//! by provider position, so the output always has exactly one entry per
//! provider, in request order. A failing, slow, or panicking provider only
//! affects its own entry.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

use chatlist_core::credentials::{CredentialSource, EnvCredentials};
use chatlist_core::types::{DispatchRequest, DispatchResult, ErrorKind, Outcome, ProviderConfig};
use chatlist_core::utils::truncate_string;
use chatlist_providers::registry::AdapterRegistry;
use chatlist_providers::traits::SendConfig;

use crate::observability::{log_result, CallTrace, DispatchSummary};

// ─────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────

/// Caller-side precondition violations, rejected before any task starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("no providers to dispatch to")]
    NoProviders,
    #[error("provider id '{0}' appears more than once in one dispatch")]
    DuplicateProviderId(String),
}

// ─────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────

/// Sends one prompt to many providers concurrently.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<AdapterRegistry>,
    credentials: Arc<dyn CredentialSource>,
}

impl Dispatcher {
    pub fn new(registry: Arc<AdapterRegistry>, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            registry,
            credentials,
        }
    }

    /// Built-in adapters, keys from the process environment.
    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(AdapterRegistry::with_defaults()),
            Arc::new(EnvCredentials),
        )
    }

    /// Check dispatch preconditions: at least one provider, unique ids.
    pub fn validate(request: &DispatchRequest) -> Result<(), DispatchError> {
        if request.providers.is_empty() {
            return Err(DispatchError::NoProviders);
        }
        let mut seen = HashSet::with_capacity(request.providers.len());
        for provider in &request.providers {
            if !seen.insert(provider.id.as_str()) {
                return Err(DispatchError::DuplicateProviderId(provider.id.clone()));
            }
        }
        Ok(())
    }

    /// Dispatch `request` to all of its providers and wait for every one of
    /// them to finish, fail, or time out.
    ///
    /// Returns one result per provider in request order. Individual provider
    /// failures are results, never errors.
    pub async fn dispatch(
        &self,
        request: DispatchRequest,
    ) -> Result<Vec<DispatchResult>, DispatchError> {
        Self::validate(&request)?;

        let started = Instant::now();
        info!(
            providers = request.providers.len(),
            prompt = %truncate_string(&request.prompt, 100),
            "Dispatching prompt"
        );

        let prompt: Arc<str> = Arc::from(request.prompt.as_str());
        let handles: Vec<JoinHandle<DispatchResult>> = request
            .providers
            .iter()
            .map(|provider| {
                let call = ProviderCall {
                    provider: provider.clone(),
                    prompt: Arc::clone(&prompt),
                    budget: request.budget_for(provider),
                    registry: Arc::clone(&self.registry),
                    credentials: Arc::clone(&self.credentials),
                };
                tokio::spawn(call.run())
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (provider, handle) in request.providers.iter().zip(handles) {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    error!(provider = %provider.id, error = %e, "Provider task failed");
                    DispatchResult::new(
                        provider,
                        Outcome::failure(
                            ErrorKind::UnexpectedError,
                            format!("provider task failed: {e}"),
                            started.elapsed(),
                        ),
                    )
                }
            };
            results.push(result);
        }

        DispatchSummary::from_results(&results, started.elapsed()).log();
        Ok(results)
    }
}

// ─────────────────────────────────────────────
// Per-provider pipeline
// ─────────────────────────────────────────────

/// Everything one provider task owns.
struct ProviderCall {
    provider: ProviderConfig,
    prompt: Arc<str>,
    budget: Duration,
    registry: Arc<AdapterRegistry>,
    credentials: Arc<dyn CredentialSource>,
}

impl ProviderCall {
    async fn run(self) -> DispatchResult {
        let (outcome, trace) = self.execute().await;
        let result = DispatchResult::new(&self.provider, outcome);
        log_result(&self.provider, &trace, &result);
        result
    }

    async fn execute(&self) -> (Outcome, CallTrace) {
        let provider = &self.provider;

        let Some(secret) = self.credentials.resolve(&provider.credential_ref) else {
            let outcome = Outcome::failure(
                ErrorKind::MissingCredential,
                format!("API key not found for {}", provider.credential_ref),
                Duration::ZERO,
            );
            return (outcome, CallTrace::default());
        };

        let Some(adapter) = self.registry.lookup(&provider.provider_type) else {
            let outcome = Outcome::failure(
                ErrorKind::UnsupportedProviderType,
                format!("Unsupported provider type: {}", provider.provider_type),
                Duration::ZERO,
            );
            return (outcome, CallTrace::default());
        };

        let config = SendConfig::new(self.budget).with_endpoint(provider.endpoint_override());
        let trace = CallTrace {
            endpoint: Some(adapter.completions_url(config.endpoint.as_deref())),
            model: Some(adapter.resolve_model(provider.model()).to_string()),
            temperature: Some(config.temperature),
        };

        // The adapter enforces the budget on the HTTP call; this bounds
        // adapters that do not.
        let started = Instant::now();
        let call = adapter.send(&self.prompt, &secret, provider.model(), &config);
        let outcome = match tokio::time::timeout(self.budget, call).await {
            Ok(outcome) => outcome,
            Err(_) => Outcome::timeout(self.budget, started.elapsed()),
        };

        (outcome, trace)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
