//! Prompt improver — rewrites a prompt through one completion provider.
//!
//! Three operations, each a single adapter `send` with a fixed instruction
//! template wrapped around the user's prompt:
//!
//! - `improve` — a clearer, more structured version of the prompt
//! - `variants` — up to three alternative phrasings
//! - `adapt` — the prompt tuned for code, analysis, or creative work
//!
//! Unlike dispatch, failures here are errors: there is exactly one provider
//! and nothing to aggregate.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

use chatlist_core::credentials::{CredentialSource, EnvCredentials};
use chatlist_core::types::{ErrorKind, Outcome, ProviderConfig};
use chatlist_core::utils::truncate_string;
use chatlist_providers::registry::AdapterRegistry;
use chatlist_providers::traits::SendConfig;

/// Most variants `variants` returns.
pub const MAX_VARIANTS: usize = 3;

// ─────────────────────────────────────────────
// Templates
// ─────────────────────────────────────────────

const IMPROVE_TEMPLATE: &str = "You are an expert at writing effective prompts for AI models.

Improve the following prompt so that it is clearer, better structured and more effective.

Original prompt:
{prompt}

The improved prompt should:
1. Be more specific and easier to understand
2. Contain clear instructions
3. Be structured, where that helps
4. Include context, if it is needed
5. Follow prompt-writing best practices

Return only the improved prompt, without any commentary.";

const VARIANTS_TEMPLATE: &str = "You are an expert at writing effective prompts for AI models.

Write 2-3 alternative phrasings of the following prompt, each suited to a different goal or communication style.

Original prompt:
{prompt}

Each variant must:
- Keep the core meaning and goal of the prompt
- Have its own style or approach
- Be effective at getting the desired result

Return the variants in exactly this format:
Variant 1: [variant text]
Variant 2: [variant text]
Variant 3: [variant text]";

const ADAPT_CODE_TEMPLATE: &str = "You are an expert at writing prompts for programming and working with code.

Adapt the following prompt for code and technical tasks:

Original prompt:
{prompt}

The adapted prompt should:
1. Use technical terminology
2. Include concrete requirements for the answer format (if applicable)
3. Name the programming language or technologies (if relevant)
4. Be structured for technical work

Return only the adapted prompt, without any commentary.";

const ADAPT_ANALYSIS_TEMPLATE: &str = "You are an expert at writing prompts for analytical tasks.

Adapt the following prompt for analysis and research tasks:

Original prompt:
{prompt}

The adapted prompt should:
1. Focus on analysis and investigation
2. Ask for a structured answer
3. Include evaluation or comparison criteria (if applicable)
4. Encourage deep reasoning and detailed analysis

Return only the adapted prompt, without any commentary.";

const ADAPT_CREATIVE_TEMPLATE: &str = "You are an expert at writing prompts for creative tasks.

Adapt the following prompt for creative and imaginative work:

Original prompt:
{prompt}

The adapted prompt should:
1. Encourage creativity and originality
2. Use more expressive language
3. Leave room for interpretation
4. Include elements of inspiration and imagination

Return only the adapted prompt, without any commentary.";

fn render(template: &str, prompt: &str) -> String {
    template.replace("{prompt}", prompt)
}

/// Kind of task a prompt is adapted for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptStyle {
    Code,
    Analysis,
    Creative,
}

impl PromptStyle {
    /// Parse a style name (case-insensitive). Unknown names mean `Code`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "analysis" => PromptStyle::Analysis,
            "creative" => PromptStyle::Creative,
            _ => PromptStyle::Code,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptStyle::Code => "code",
            PromptStyle::Analysis => "analysis",
            PromptStyle::Creative => "creative",
        }
    }

    fn template(&self) -> &'static str {
        match self {
            PromptStyle::Code => ADAPT_CODE_TEMPLATE,
            PromptStyle::Analysis => ADAPT_ANALYSIS_TEMPLATE,
            PromptStyle::Creative => ADAPT_CREATIVE_TEMPLATE,
        }
    }
}

impl fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────
// Results and errors
// ─────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ImproveError {
    #[error("API key not found for {0}")]
    MissingCredential(String),
    #[error("Unsupported provider type: {0}")]
    UnsupportedProviderType(String),
    #[error("{message}")]
    Failed { kind: ErrorKind, message: String },
}

impl ImproveError {
    /// Same taxonomy as dispatch outcomes.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImproveError::MissingCredential(_) => ErrorKind::MissingCredential,
            ImproveError::UnsupportedProviderType(_) => ErrorKind::UnsupportedProviderType,
            ImproveError::Failed { kind, .. } => *kind,
        }
    }
}

/// A rewritten prompt and the provider that wrote it.
#[derive(Clone, Debug, PartialEq)]
pub struct ImprovedPrompt {
    pub provider_id: String,
    pub display_name: String,
    pub text: String,
}

/// Alternative phrasings and the provider that wrote them.
#[derive(Clone, Debug, PartialEq)]
pub struct PromptVariants {
    pub provider_id: String,
    pub display_name: String,
    pub variants: Vec<String>,
}

// ─────────────────────────────────────────────
// PromptImprover
// ─────────────────────────────────────────────

pub struct PromptImprover {
    registry: Arc<AdapterRegistry>,
    credentials: Arc<dyn CredentialSource>,
    timeout: Duration,
}

impl PromptImprover {
    pub fn new(registry: Arc<AdapterRegistry>, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            registry,
            credentials,
            timeout: Duration::from_secs(30),
        }
    }

    /// Built-in adapters, keys from the process environment.
    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(AdapterRegistry::with_defaults()),
            Arc::new(EnvCredentials),
        )
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn improve(
        &self,
        provider: &ProviderConfig,
        prompt: &str,
    ) -> Result<ImprovedPrompt, ImproveError> {
        let text = self.ask(provider, render(IMPROVE_TEMPLATE, prompt)).await?;
        Ok(ImprovedPrompt {
            provider_id: provider.id.clone(),
            display_name: provider.display_name.clone(),
            text,
        })
    }

    pub async fn variants(
        &self,
        provider: &ProviderConfig,
        prompt: &str,
    ) -> Result<PromptVariants, ImproveError> {
        let text = self.ask(provider, render(VARIANTS_TEMPLATE, prompt)).await?;
        Ok(PromptVariants {
            provider_id: provider.id.clone(),
            display_name: provider.display_name.clone(),
            variants: parse_variants(&text),
        })
    }

    pub async fn adapt(
        &self,
        provider: &ProviderConfig,
        prompt: &str,
        style: PromptStyle,
    ) -> Result<ImprovedPrompt, ImproveError> {
        let text = self.ask(provider, render(style.template(), prompt)).await?;
        Ok(ImprovedPrompt {
            provider_id: provider.id.clone(),
            display_name: provider.display_name.clone(),
            text,
        })
    }

    /// One call through the provider's adapter. Returns the trimmed answer.
    async fn ask(&self, provider: &ProviderConfig, instruction: String) -> Result<String, ImproveError> {
        let secret = self
            .credentials
            .resolve(&provider.credential_ref)
            .ok_or_else(|| ImproveError::MissingCredential(provider.credential_ref.clone()))?;
        let adapter = self
            .registry
            .lookup(&provider.provider_type)
            .ok_or_else(|| ImproveError::UnsupportedProviderType(provider.provider_type.to_string()))?;

        info!(
            provider = %provider.id,
            prompt = %truncate_string(&instruction, 100),
            "Improving prompt"
        );

        let config = SendConfig::new(self.timeout).with_endpoint(provider.endpoint_override());
        let started = Instant::now();
        let call = adapter.send(&instruction, &secret, provider.model(), &config);
        let outcome = match tokio::time::timeout(self.timeout, call).await {
            Ok(outcome) => outcome,
            Err(_) => Outcome::timeout(self.timeout, started.elapsed()),
        };

        match outcome {
            Outcome::Success { response_text, .. } => Ok(response_text.trim().to_string()),
            Outcome::Failure { kind, message, .. } => {
                warn!(provider = %provider.id, kind = %kind, error = %message, "Prompt improvement failed");
                Err(ImproveError::Failed { kind, message })
            }
        }
    }
}

// ─────────────────────────────────────────────
// Variant parsing
// ─────────────────────────────────────────────

/// Split a model's answer into at most [`MAX_VARIANTS`] prompt variants.
///
/// Looks for `Variant N:` headed blocks first, then for numbered or bulleted
/// items longer than 10 characters, and finally treats the whole answer as
/// a single variant.
pub fn parse_variants(text: &str) -> Vec<String> {
    let mut variants = headed_variants(text);

    if variants.is_empty() {
        variants = listed_variants(text);
    }
    if variants.is_empty() && !text.trim().is_empty() {
        variants.push(text.trim().to_string());
    }

    variants.truncate(MAX_VARIANTS);
    variants
}

fn headed_variants(text: &str) -> Vec<String> {
    let mut variants = Vec::new();
    let mut current: Option<String> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let is_heading = line.to_lowercase().starts_with("variant") && line.contains(':');
        if is_heading {
            if let Some(done) = current.take().filter(|v| !v.trim().is_empty()) {
                variants.push(done.trim().to_string());
            }
            let body = line.split_once(':').map(|(_, rest)| rest.trim()).unwrap_or("");
            current = Some(body.to_string());
        } else if let Some(variant) = current.as_mut() {
            if !variant.is_empty() {
                variant.push(' ');
            }
            variant.push_str(line);
        }
    }

    if let Some(done) = current.filter(|v| !v.trim().is_empty()) {
        variants.push(done.trim().to_string());
    }
    variants
}

fn listed_variants(text: &str) -> Vec<String> {
    let Some(marker) = Regex::new(r"(?i)\n\s*(?:\d+\.|[-•]|variant\s*\d+:)").ok() else {
        return Vec::new();
    };
    marker
        .split(text)
        .map(str::trim)
        .filter(|part| part.chars().count() > 10)
        .map(String::from)
        .collect()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
