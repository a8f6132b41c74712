//! Main chat loop orchestration.
//!
//! Reads lines from the prompt, dispatches slash commands, and runs each
//! message through the session's request/response cycle with a spinner.

use std::time::Instant;

use console::style;
use tracing::{Instrument, debug, info, info_span};

use changebot_core::chat::session::ChatSession;
use changebot_core::webhook::client::WebhookClient;

use crate::cli::refresh::{print_refresh_result, spinner};
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

/// Run the interactive chat loop until Ctrl+D or `/exit`.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let mut session = ChatSession::new();
    let session_id = session.id();
    let refresh_endpoint = state.config.refresh_endpoint();

    print_welcome_banner(
        state.client.endpoint(),
        refresh_endpoint,
        &session_id.to_string(),
    );
    info!(session_id = %session_id, "Chat session started");

    let renderer = ChatRenderer::new();
    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) => text,
        };

        if text.trim().is_empty() {
            continue;
        }

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(refresh_endpoint.is_some()),
                ChatCommand::Clear => {
                    session.clear();
                    chat_input.clear();
                    println!("  {}", style("Conversation cleared.").dim());
                    println!();
                }
                ChatCommand::Refresh => {
                    let progress = spinner("Refreshing...");
                    let result = state.client.refresh().await;
                    progress.finish_and_clear();
                    print_refresh_result(&result);
                    println!();
                }
                ChatCommand::History => print_history(&renderer, &session),
                ChatCommand::Exit => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                ChatCommand::Unknown(name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                }
            }
            continue;
        }

        send_message(state, &renderer, &mut session, &text).await;
    }

    chat_input.flush();
    info!(
        session_id = %session_id,
        turns = session.transcript().len(),
        "Chat session ended"
    );
    Ok(())
}

/// One interaction cycle with a spinner. Blank input is ignored.
async fn send_message(state: &AppState, renderer: &ChatRenderer, session: &mut ChatSession, text: &str) {
    let pending = match session.begin_submit(text) {
        Ok(p) => p,
        Err(e) => {
            debug!(error = %e, "Message rejected");
            return;
        }
    };

    let progress = spinner("Thinking...");
    let start = Instant::now();
    let span = info_span!(
        "webhook.exchange",
        session_id = %session.id(),
        endpoint = state.client.endpoint(),
        query_len = pending.query().len(),
    );
    let result = state.client.exchange(pending.query()).instrument(span).await;
    progress.finish_and_clear();
    let response_ms = start.elapsed().as_millis() as u64;

    let outcome = session.finish_submit(pending, result);
    renderer.print_turn(&outcome.assistant);
    renderer.print_footer(response_ms);
    if let Some(e) = &outcome.error {
        renderer.print_error_banner(&e.banner());
    }
    println!();
}

fn print_history(renderer: &ChatRenderer, session: &ChatSession) {
    println!();
    if session.transcript().is_empty() {
        println!("  {}", style("No messages yet.").dim());
    }
    for turn in session.transcript() {
        renderer.print_turn(turn);
    }
    println!();
}
