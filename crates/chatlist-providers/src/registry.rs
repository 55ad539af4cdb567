//! Adapter registry — static specs for the built-in provider families and the
//! `ProviderType → adapter` lookup the dispatcher uses.
//!
//! All four built-in families speak the same chat completions protocol, so
//! each spec is just a base URL and a default model for an `HttpAdapter`.

use std::collections::HashMap;
use std::sync::Arc;

use chatlist_core::types::ProviderType;
use tracing::debug;

use crate::http_adapter::{build_http_client, HttpAdapter};
use crate::traits::CompletionAdapter;

// ─────────────────────────────────────────────
// AdapterSpec — static metadata for one family
// ─────────────────────────────────────────────

/// Static specification describing one provider family.
#[derive(Clone, Debug)]
pub struct AdapterSpec {
    /// Type tag (e.g. `"deepseek"`), matched against `ProviderType`.
    pub name: &'static str,
    /// Human-readable name for logs. E.g. `"DeepSeek"`.
    pub display_name: &'static str,
    /// Base URL; requests go to `<base>/chat/completions`.
    pub default_api_base: &'static str,
    /// Model used when the provider config names none.
    pub default_model: &'static str,
    /// Conventional environment variable for the API key.
    pub env_key: &'static str,
}

impl AdapterSpec {
    pub fn provider_type(&self) -> ProviderType {
        ProviderType::from(self.name)
    }
}

/// The built-in families.
pub static ADAPTERS: &[AdapterSpec] = &[
    AdapterSpec {
        name: "openai",
        display_name: "OpenAI",
        default_api_base: "https://api.openai.com/v1",
        default_model: "gpt-3.5-turbo",
        env_key: "OPENAI_API_KEY",
    },
    AdapterSpec {
        name: "deepseek",
        display_name: "DeepSeek",
        default_api_base: "https://api.deepseek.com/v1",
        default_model: "deepseek-chat",
        env_key: "DEEPSEEK_API_KEY",
    },
    AdapterSpec {
        name: "groq",
        display_name: "Groq",
        default_api_base: "https://api.groq.com/openai/v1",
        default_model: "llama2-70b-4096",
        env_key: "GROQ_API_KEY",
    },
    AdapterSpec {
        name: "openrouter",
        display_name: "OpenRouter",
        default_api_base: "https://openrouter.ai/api/v1",
        default_model: "openai/gpt-3.5-turbo",
        env_key: "OPENROUTER_API_KEY",
    },
];

/// Find a built-in spec by type tag (case-insensitive).
pub fn find_by_name(name: &str) -> Option<&'static AdapterSpec> {
    let name = name.trim();
    ADAPTERS.iter().find(|spec| spec.name.eq_ignore_ascii_case(name))
}

// ─────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────

/// Maps provider types to the adapter responsible for them.
///
/// Pure lookup, no I/O. Adapters are `Arc`-shared so dispatch tasks can hold
/// them across `tokio::spawn`.
pub struct AdapterRegistry {
    adapters: HashMap<ProviderType, Arc<dyn CompletionAdapter>>,
}

impl AdapterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Registry with every built-in family, sharing one fresh HTTP client.
    pub fn with_defaults() -> Self {
        Self::with_client(build_http_client())
    }

    /// Registry with every built-in family, sharing `client`.
    pub fn with_client(client: reqwest::Client) -> Self {
        let mut registry = Self::new();
        for spec in ADAPTERS {
            registry.register(
                spec.provider_type(),
                Arc::new(HttpAdapter::from_spec(client.clone(), spec)),
            );
        }
        registry
    }

    /// Register an adapter. Overwrites any previous adapter for the type.
    pub fn register(&mut self, provider_type: ProviderType, adapter: Arc<dyn CompletionAdapter>) {
        debug!(provider_type = %provider_type, adapter = adapter.name(), "registered adapter");
        self.adapters.insert(provider_type, adapter);
    }

    /// Remove the adapter for a type. Returns it, if any.
    pub fn unregister(&mut self, provider_type: &ProviderType) -> Option<Arc<dyn CompletionAdapter>> {
        self.adapters.remove(provider_type)
    }

    /// Look up the adapter for a provider type.
    pub fn lookup(&self, provider_type: &ProviderType) -> Option<Arc<dyn CompletionAdapter>> {
        self.adapters.get(provider_type).cloned()
    }

    pub fn has(&self, provider_type: &ProviderType) -> bool {
        self.adapters.contains_key(provider_type)
    }

    /// Registered type tags, sorted for determinism.
    pub fn provider_types(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.adapters.keys().map(|t| t.to_string()).collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chatlist_core::credentials::Secret;
    use chatlist_core::types::Outcome;
    use std::time::Duration;

    use crate::traits::SendConfig;

    /// Minimal adapter that answers with a fixed string.
    struct EchoAdapter;

    #[async_trait]
    impl CompletionAdapter for EchoAdapter {
        async fn send(
            &self,
            prompt: &str,
            _secret: &Secret,
            _model: Option<&str>,
            _config: &SendConfig,
        ) -> Outcome {
            Outcome::success(format!("echo: {prompt}"), None, Duration::ZERO)
        }

        fn default_model(&self) -> &str {
            "echo-1"
        }

        fn name(&self) -> &str {
            "Echo"
        }

        fn completions_url(&self, _endpoint: Option<&str>) -> String {
            "memory://echo".to_string()
        }
    }

    #[test]
    fn test_find_by_name_case_insensitive() {
        let spec = find_by_name("DeepSeek").unwrap();
        assert_eq!(spec.display_name, "DeepSeek");
        assert_eq!(spec.env_key, "DEEPSEEK_API_KEY");
        assert!(find_by_name("mistral").is_none());
    }

    #[test]
    fn test_all_specs_have_unique_names() {
        let names: Vec<&str> = ADAPTERS.iter().map(|s| s.name).collect();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(names.len(), unique.len(), "Duplicate adapter names found");
    }

    #[test]
    fn test_spec_names_map_to_builtin_types() {
        for spec in ADAPTERS {
            assert!(
                !matches!(spec.provider_type(), ProviderType::Other(_)),
                "{} should be a built-in type",
                spec.name
            );
        }
    }

    #[test]
    fn test_defaults_cover_builtin_families() {
        let registry = AdapterRegistry::with_defaults();
        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.provider_types(),
            vec!["deepseek", "groq", "openai", "openrouter"]
        );
        for provider_type in [
            ProviderType::OpenAi,
            ProviderType::DeepSeek,
            ProviderType::Groq,
            ProviderType::OpenRouter,
        ] {
            assert!(registry.has(&provider_type));
        }
    }

    #[test]
    fn test_lookup_returns_configured_adapter() {
        let registry = AdapterRegistry::with_defaults();
        let groq = registry.lookup(&ProviderType::Groq).unwrap();
        assert_eq!(groq.name(), "Groq");
        assert_eq!(groq.default_model(), "llama2-70b-4096");
    }

    #[test]
    fn test_lookup_unknown_type() {
        let registry = AdapterRegistry::with_defaults();
        assert!(registry.lookup(&ProviderType::from("anthropic")).is_none());
    }

    #[test]
    fn test_register_custom_type() {
        let mut registry = AdapterRegistry::new();
        assert!(registry.is_empty());

        registry.register(ProviderType::from("echo"), Arc::new(EchoAdapter));
        let adapter = registry.lookup(&ProviderType::from("ECHO")).unwrap();
        assert_eq!(adapter.name(), "Echo");

        assert!(registry.unregister(&ProviderType::from("echo")).is_some());
        assert!(!registry.has(&ProviderType::from("echo")));
    }

    #[tokio::test]
    async fn test_registered_adapter_is_callable() {
        let mut registry = AdapterRegistry::new();
        registry.register(ProviderType::from("echo"), Arc::new(EchoAdapter));

        let adapter = registry.lookup(&ProviderType::from("echo")).unwrap();
        let outcome = adapter
            .send("ping", &Secret::new("k"), None, &SendConfig::default())
            .await;
        assert_eq!(outcome.response_text(), Some("echo: ping"));
    }
}
