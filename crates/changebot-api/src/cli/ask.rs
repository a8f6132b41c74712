//! `changebot ask` - one message, one reply.

use std::time::Instant;

use changebot_core::chat::session::ChatSession;

use crate::cli::chat::renderer::ChatRenderer;
use crate::cli::refresh::spinner;
use crate::state::AppState;

/// Send `text` as a single-turn conversation and print the reply.
///
/// On a failed exchange the generic reply is still printed, then the
/// error is returned so the process exits non-zero.
pub async fn run_ask(state: &AppState, text: &str, json: bool, quiet: bool) -> anyhow::Result<()> {
    let mut session = ChatSession::new();

    let start = Instant::now();
    let progress = (!json && !quiet).then(|| spinner("Thinking..."));
    let outcome = session.submit(state.client.as_ref(), text).await;
    if let Some(p) = progress {
        p.finish_and_clear();
    }
    let outcome = outcome?;
    let elapsed = start.elapsed().as_millis() as u64;

    if json {
        let body = serde_json::json!({
            "session_id": session.id(),
            "user": outcome.user,
            "assistant": outcome.assistant,
            "error": outcome.error.as_ref().map(|e| e.banner()),
            "response_ms": elapsed,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else if quiet {
        println!("{}", outcome.assistant.content);
    } else {
        let renderer = ChatRenderer::new();
        renderer.print_turn(&outcome.assistant);
        renderer.print_footer(elapsed);
        if let Some(e) = &outcome.error {
            renderer.print_error_banner(&e.banner());
        }
    }

    match outcome.error {
        Some(e) => Err(anyhow::Error::new(e).context("webhook exchange failed")),
        None => Ok(()),
    }
}
