//! ChatList CLI — entry point.
//!
//! # Commands
//!
//! - `chatlist send <PROMPT>` — send one prompt to every active provider
//! - `chatlist improve <PROMPT>` — rewrite a prompt with one provider
//! - `chatlist status` — show configuration and provider status
//! - `chatlist onboard` — write a default config

mod helpers;
mod improve;
mod onboard;
mod send;
mod status;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use chatlist_dispatch::PromptStyle;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// ChatList — one prompt, many models
#[derive(Parser)]
#[command(name = "chatlist", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.chatlist/config.json)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a prompt to all active providers at once
    Send {
        /// The prompt text
        prompt: String,

        /// Per-call timeout in seconds (overrides config)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Only dispatch to these provider ids (repeatable)
        #[arg(long = "only", value_name = "ID")]
        only: Vec<String>,

        /// Print results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Rewrite a prompt: improve it, suggest variants, or adapt it
    Improve {
        /// The prompt text
        prompt: String,

        /// Suggest up to three alternative phrasings
        #[arg(long, default_value_t = false, conflicts_with = "adapt")]
        variants: bool,

        /// Adapt for a kind of task: code, analysis, or creative
        #[arg(long, value_name = "STYLE")]
        adapt: Option<String>,

        /// Provider id to use (defaults to the first active OpenRouter provider)
        #[arg(short, long)]
        provider: Option<String>,

        /// Request timeout in seconds (overrides config)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration and provider status
    Status,

    /// Write a default configuration
    Onboard,
}

impl Commands {
    /// Whether `--logs` was passed. Every command gets a subscriber so config
    /// warnings are shown.
    fn verbose_logs(&self) -> bool {
        match self {
            Commands::Send { logs, .. } | Commands::Improve { logs, .. } => *logs,
            Commands::Status | Commands::Onboard => false,
        }
    }
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.command.verbose_logs());
    let config_path: Option<PathBuf> = cli.config.as_deref().map(helpers::expand_tilde);

    match cli.command {
        Commands::Send {
            prompt,
            timeout,
            only,
            json,
            ..
        } => {
            let options = send::SendOptions {
                prompt,
                timeout_secs: timeout,
                only,
                json,
            };
            send::run(options, config_path.as_deref()).await
        }
        Commands::Improve {
            prompt,
            variants,
            adapt,
            provider,
            timeout,
            ..
        } => {
            let mode = match (variants, adapt) {
                (true, _) => improve::ImproveMode::Variants,
                (false, Some(style)) => improve::ImproveMode::Adapt(PromptStyle::from_name(&style)),
                (false, None) => improve::ImproveMode::Improve,
            };
            let options = improve::ImproveOptions {
                prompt,
                mode,
                provider,
                timeout_secs: timeout,
            };
            improve::run(options, config_path.as_deref()).await
        }
        Commands::Status => status::run(config_path.as_deref()),
        Commands::Onboard => onboard::run(config_path.as_deref()),
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("chatlist=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("chatlist").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_verbose_logs_per_command() {
        assert!(parse(&["send", "hi", "--logs"]).command.verbose_logs());
        assert!(!parse(&["send", "hi"]).command.verbose_logs());
        assert!(parse(&["improve", "hi", "--logs"]).command.verbose_logs());
        assert!(!parse(&["status"]).command.verbose_logs());
        assert!(!parse(&["onboard"]).command.verbose_logs());
    }

    #[test]
    fn test_send_flags() {
        let cli = parse(&["--config", "/tmp/c.json", "send", "hi", "--only", "a", "--only", "b", "-t", "5"]);
        assert_eq!(cli.config.as_deref(), Some("/tmp/c.json"));
        match cli.command {
            Commands::Send { only, timeout, json, .. } => {
                assert_eq!(only, vec!["a", "b"]);
                assert_eq!(timeout, Some(5));
                assert!(!json);
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_improve_variants_conflicts_with_adapt() {
        let args = ["chatlist", "improve", "hi", "--variants", "--adapt", "code"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
