//! `changebot refresh` and the shared refresh presentation used by `/refresh`.

use std::time::Instant;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use changebot_infra::webhook::HttpRefreshClient;
use changebot_types::error::RefreshError;

/// Print the result of a refresh call.
///
/// Returns `true` when the refresh succeeded.
pub fn print_refresh_result(result: &Result<(), RefreshError>) -> bool {
    match result {
        Ok(()) => {
            println!("  {} Knowledge base refresh triggered.", style("*").green().bold());
            true
        }
        Err(RefreshError::NotConfigured) => {
            println!(
                "  {} Refresh is not configured. Set refresh_url in config.toml or CHANGEBOT_REFRESH_URL.",
                style("!").yellow().bold()
            );
            false
        }
        Err(e) => {
            eprintln!("  {} Refresh failed: {e}", style("!").red().bold());
            false
        }
    }
}

/// Spinner shown while waiting on the webhook.
pub(crate) fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let template = ProgressStyle::default_spinner()
        .template("  {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(template);
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Trigger the refresh webhook once.
///
/// Does not need the chat endpoint. A missing refresh endpoint is reported
/// but is not a failure.
pub async fn run_refresh(refresher: &HttpRefreshClient, json: bool, quiet: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let progress = (!json && !quiet).then(|| spinner("Refreshing..."));
    let result = refresher.refresh().await;
    if let Some(p) = progress {
        p.finish_and_clear();
    }
    let elapsed = start.elapsed().as_millis() as u64;

    if json {
        let body = match &result {
            Ok(()) => serde_json::json!({"refreshed": true, "response_ms": elapsed}),
            Err(e) => serde_json::json!({"refreshed": false, "error": e.to_string()}),
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else if !quiet || result.is_err() {
        print_refresh_result(&result);
    }

    match result {
        Ok(()) | Err(RefreshError::NotConfigured) => Ok(()),
        Err(e) => Err(anyhow::Error::new(e).context("refresh webhook call failed")),
    }
}
