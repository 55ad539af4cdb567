//! `chatlist send` — fan a prompt out to the configured providers.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tracing::info;

use chatlist_core::config::{load_config, Config};
use chatlist_core::types::{DispatchRequest, ProviderConfig};
use chatlist_dispatch::{DispatchSummary, Dispatcher};

use crate::helpers;

/// Arguments of one `send` invocation.
pub struct SendOptions {
    pub prompt: String,
    pub timeout_secs: Option<u64>,
    pub only: Vec<String>,
    pub json: bool,
}

/// Run the send command.
pub async fn run(options: SendOptions, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let request = build_request(&config, &options)?;

    info!(
        providers = request.providers.len(),
        timeout_secs = request.per_call_timeout.as_secs(),
        "sending prompt"
    );

    let dispatcher = Dispatcher::with_defaults();
    let started = Instant::now();
    let results = dispatcher
        .dispatch(request)
        .await
        .context("dispatch rejected")?;
    let summary = DispatchSummary::from_results(&results, started.elapsed());

    if options.json {
        let out = serde_json::to_string_pretty(&results).context("failed to serialize results")?;
        println!("{out}");
        return Ok(());
    }

    println!();
    for result in &results {
        helpers::print_result(result);
    }
    println!(
        "{}",
        format!(
            "{}/{} succeeded in {}",
            summary.succeeded,
            summary.total,
            helpers::format_elapsed(summary.wall_time)
        )
        .dimmed()
    );
    println!();

    Ok(())
}

/// Turn the loaded config and command-line options into a dispatch request.
fn build_request(config: &Config, options: &SendOptions) -> Result<DispatchRequest> {
    if options.prompt.trim().is_empty() {
        bail!("prompt is empty");
    }

    let providers = select_providers(config, &options.only)?;
    if providers.is_empty() {
        bail!("no active providers configured; run `chatlist onboard` and edit the config");
    }

    let timeout = match options.timeout_secs {
        Some(0) => bail!("--timeout must be at least 1 second"),
        Some(secs) => Duration::from_secs(secs),
        None => config.default_timeout(),
    };

    Ok(DispatchRequest::from_active(
        options.prompt.clone(),
        providers,
        timeout,
    ))
}

/// Active providers, narrowed to `only` when it is non-empty.
fn select_providers<'a>(config: &'a Config, only: &[String]) -> Result<Vec<&'a ProviderConfig>> {
    if only.is_empty() {
        return Ok(config.active_providers().collect());
    }

    let mut selected = Vec::with_capacity(only.len());
    for id in only {
        let Some(provider) = config.find_provider(id) else {
            bail!("unknown provider id '{id}'");
        };
        if !provider.active {
            bail!("provider '{id}' is inactive");
        }
        if !selected.iter().any(|p: &&ProviderConfig| p.id == provider.id) {
            selected.push(provider);
        }
    }
    Ok(selected)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
