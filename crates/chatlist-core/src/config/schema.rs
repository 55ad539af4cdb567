//! Configuration schema.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! Provider secrets are never stored here: each provider names the
//! environment variable that holds its key.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{ProviderConfig, ProviderType};

/// Root configuration — loaded from `~/.chatlist/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub dispatch: DispatchDefaults,
    pub providers: Vec<ProviderConfig>,
    /// Provider id used to rewrite prompts. Must be an active OpenRouter
    /// provider; otherwise the first active one is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvement_provider: Option<String>,
}

/// Dispatch-wide defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DispatchDefaults {
    /// Per-call timeout in seconds, unless a provider sets its own.
    pub timeout_secs: u64,
}

impl Default for DispatchDefaults {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl Config {
    /// Default per-call timeout as a `Duration`.
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch.timeout_secs)
    }

    /// Providers with `active = true`, in configured order.
    pub fn active_providers(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter().filter(|p| p.active)
    }

    pub fn find_provider(&self, id: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// Provider that rewrites prompts: the configured `improvementProvider`
    /// if it is an active OpenRouter provider, else the first such provider.
    pub fn improvement_provider(&self) -> Option<&ProviderConfig> {
        let eligible = |p: &&ProviderConfig| p.active && p.provider_type == ProviderType::OpenRouter;

        self.improvement_provider
            .as_deref()
            .and_then(|id| self.find_provider(id))
            .filter(eligible)
            .or_else(|| self.providers.iter().find(eligible))
    }
}
