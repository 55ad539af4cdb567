//! `chatlist onboard` — write a starter configuration.
//!
//! Creates `~/.chatlist/config.json` listing every built-in provider family,
//! each inactive until its key is set and the user flips `active`.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use chatlist_core::config::{get_config_path, save_config, Config};
use chatlist_core::types::ProviderConfig;
use chatlist_providers::registry::ADAPTERS;

/// Run the onboard command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    println!();
    println!("{}", "ChatList — Setup".cyan().bold());
    println!();

    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        save_config(&default_config(), Some(&config_path))
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    }

    println!();
    println!("  Set the API keys you have:");
    for spec in ADAPTERS {
        println!("    {:<20} {}", spec.display_name, spec.env_key.dimmed());
    }
    println!();
    println!(
        "{}",
        "  Then set \"active\": true for those providers and run `chatlist send`.".green()
    );
    println!();

    Ok(())
}

/// One inactive provider per built-in family, keyed by its conventional env var.
fn default_config() -> Config {
    let providers = ADAPTERS
        .iter()
        .map(|spec| {
            ProviderConfig::new(spec.name, spec.display_name, spec.name, spec.env_key)
                .with_model(spec.default_model)
                .inactive()
        })
        .collect();

    Config {
        providers,
        ..Default::default()
    }
}
