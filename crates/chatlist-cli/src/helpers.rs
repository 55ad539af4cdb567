//! Shared CLI helpers — path expansion and result printing.

use std::path::PathBuf;
use std::time::Duration;

use colored::Colorize;

use chatlist_core::types::{DispatchResult, Outcome};

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Footer under a result: token count (when known) and elapsed time.
pub fn result_footer(outcome: &Outcome) -> String {
    let time = format_elapsed(outcome.elapsed());
    match outcome.total_tokens() {
        Some(tokens) => format!("tokens: {tokens} | time: {time}"),
        None => format!("time: {time}"),
    }
}

/// Elapsed time with two decimals, e.g. `1.25s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

/// Print one provider's result block to stdout.
pub fn print_result(result: &DispatchResult) {
    println!(
        "{} {}",
        result.display_name.cyan().bold(),
        format!("({})", result.provider_id).dimmed()
    );
    match &result.outcome {
        Outcome::Success { response_text, .. } if response_text.is_empty() => {
            println!("{}", "(empty response)".dimmed());
        }
        Outcome::Success { response_text, .. } => println!("{response_text}"),
        Outcome::Failure { .. } => println!("{}", result.outcome.display_text().red()),
    }
    println!("{}", result_footer(&result.outcome).dimmed());
    println!();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chatlist_core::types::{ErrorKind, UsageInfo};

    #[test]
    fn expand_tilde_home() {
        let result = expand_tilde("~/foo/bar");
        assert!(result.ends_with("foo/bar"));
        assert!(!result.starts_with("~"));
    }

    #[test]
    fn expand_tilde_no_tilde() {
        let result = expand_tilde("/absolute/path");
        assert_eq!(result, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn footer_with_tokens() {
        let usage = UsageInfo {
            total_tokens: Some(42),
            ..Default::default()
        };
        let outcome = Outcome::success("hi", Some(usage), Duration::from_millis(1250));
        assert_eq!(result_footer(&outcome), "tokens: 42 | time: 1.25s");
    }

    #[test]
    fn footer_without_tokens() {
        let outcome = Outcome::failure(ErrorKind::Timeout, "request exceeded 1s", Duration::from_secs(1));
        assert_eq!(result_footer(&outcome), "time: 1.00s");
    }

    #[test]
    fn format_elapsed_zero() {
        assert_eq!(format_elapsed(Duration::ZERO), "0.00s");
    }
}
