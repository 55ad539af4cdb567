//! `chatlist status` — show configuration and provider status.
//!
//! - Shows config path, default timeout and the prompt-improvement provider
//! - For each provider: type, active flag, adapter availability, key presence

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use chatlist_core::config::{get_config_path, load_config};
use chatlist_core::credentials::{CredentialSource, EnvCredentials};
use chatlist_core::types::ProviderConfig;
use chatlist_providers::registry::AdapterRegistry;

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);
    let config = load_config(Some(&config_path));
    let registry = AdapterRegistry::with_defaults();

    println!();
    println!("{}", "ChatList Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );
    println!(
        "  {:<18} {}s",
        "Timeout:".bold(),
        config.dispatch.timeout_secs
    );
    let improver = match config.improvement_provider() {
        Some(provider) => provider.display_name.clone(),
        None => "· no active OpenRouter provider".dimmed().to_string(),
    };
    println!("  {:<18} {}", "Improver:".bold(), improver);

    println!();
    println!("  {}", "Providers:".bold());
    if config.providers.is_empty() {
        println!("    {}", "· none configured".dimmed());
    }
    for provider in &config.providers {
        println!(
            "    {:<20} {}",
            provider.display_name,
            provider_status(provider, &registry, &EnvCredentials)
        );
    }
    println!();

    Ok(())
}

/// (active, adapter available, key present) for a provider.
fn provider_flags(
    provider: &ProviderConfig,
    registry: &AdapterRegistry,
    credentials: &dyn CredentialSource,
) -> (bool, bool, bool) {
    (
        provider.active,
        registry.has(&provider.provider_type),
        credentials.resolve(&provider.credential_ref).is_some(),
    )
}

fn provider_status(
    provider: &ProviderConfig,
    registry: &AdapterRegistry,
    credentials: &dyn CredentialSource,
) -> String {
    let (active, supported, has_key) = provider_flags(provider, registry, credentials);

    let active = if active {
        "active".green().to_string()
    } else {
        "inactive".dimmed().to_string()
    };
    let adapter = if supported {
        format!("{}", provider.provider_type)
    } else {
        format!("{} (unsupported)", provider.provider_type).red().to_string()
    };
    let key = if has_key {
        format!("{} ({} set)", "✓".green(), provider.credential_ref)
    } else {
        format!("· {} not set", provider.credential_ref).dimmed().to_string()
    };

    format!("{active} | {adapter} | {key}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlist_core::credentials::StaticCredentials;

    #[test]
    fn test_provider_flags() {
        let registry = AdapterRegistry::with_defaults();
        let creds = StaticCredentials::new().with("OPENAI_API_KEY", "sk");

        let ok = ProviderConfig::new("gpt", "GPT", "openai", "OPENAI_API_KEY");
        assert_eq!(provider_flags(&ok, &registry, &creds), (true, true, true));

        let odd = ProviderConfig::new("x", "X", "anthropic", "NOPE").inactive();
        assert_eq!(provider_flags(&odd, &registry, &creds), (false, false, false));
    }

    #[test]
    fn test_provider_status_mentions_credential_ref() {
        colored::control::set_override(false);
        let registry = AdapterRegistry::with_defaults();
        let provider = ProviderConfig::new("g", "Groq", "groq", "GROQ_API_KEY");
        let line = provider_status(&provider, &registry, &StaticCredentials::new());
        assert!(line.contains("groq"));
        assert!(line.contains("GROQ_API_KEY not set"));
    }
}
