//! `chatlist improve` — rewrite a prompt before sending it.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Result};
use colored::Colorize;

use chatlist_core::config::{load_config, Config};
use chatlist_core::types::ProviderConfig;
use chatlist_dispatch::{PromptImprover, PromptStyle};

/// What to do with the prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImproveMode {
    Improve,
    Variants,
    Adapt(PromptStyle),
}

/// Arguments of one `improve` invocation.
pub struct ImproveOptions {
    pub prompt: String,
    pub mode: ImproveMode,
    pub provider: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Run the improve command.
pub async fn run(options: ImproveOptions, config_path: Option<&Path>) -> Result<()> {
    if options.prompt.trim().is_empty() {
        bail!("prompt is empty");
    }

    let config = load_config(config_path);
    let provider = resolve_provider(&config, options.provider.as_deref())?;
    let timeout = match options.timeout_secs {
        Some(0) => bail!("--timeout must be at least 1 second"),
        Some(secs) => Duration::from_secs(secs),
        None => config.default_timeout(),
    };
    let improver = PromptImprover::with_defaults().with_timeout(timeout);

    println!();
    match options.mode {
        ImproveMode::Improve => {
            let improved = improver.improve(provider, &options.prompt).await?;
            print_header("Improved prompt", &improved.display_name);
            println!("{}", improved.text);
        }
        ImproveMode::Adapt(style) => {
            let adapted = improver.adapt(provider, &options.prompt, style).await?;
            print_header(&format!("Adapted for {style}"), &adapted.display_name);
            println!("{}", adapted.text);
        }
        ImproveMode::Variants => {
            let result = improver.variants(provider, &options.prompt).await?;
            print_header("Variants", &result.display_name);
            for (i, variant) in result.variants.iter().enumerate() {
                println!("{} {}", format!("{}.", i + 1).bold(), variant);
            }
        }
    }
    println!();

    Ok(())
}

fn print_header(title: &str, provider_name: &str) {
    println!(
        "{} {}",
        title.cyan().bold(),
        format!("(via {provider_name})").dimmed()
    );
}

/// The provider named on the command line, or the configured improvement
/// provider.
fn resolve_provider<'a>(config: &'a Config, requested: Option<&str>) -> Result<&'a ProviderConfig> {
    match requested {
        Some(id) => match config.find_provider(id) {
            Some(provider) if provider.active => Ok(provider),
            Some(_) => bail!("provider '{id}' is inactive"),
            None => bail!("unknown provider id '{id}'"),
        },
        None => match config.improvement_provider() {
            Some(provider) => Ok(provider),
            None => bail!("no active OpenRouter provider configured for prompt improvement"),
        },
    }
}
