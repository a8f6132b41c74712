//! Welcome banner display for chat sessions.

use console::style;

/// Title shown at the top of every chat session.
pub const CHAT_TITLE: &str = "Change Machine ChatBot";

/// Print the welcome banner at the start of a chat session.
///
/// Shows the chat endpoint, whether refresh is available, and the short
/// session id, followed by a hint about slash commands.
pub fn print_welcome_banner(endpoint: &str, refresh_endpoint: Option<&str>, session_id: &str) {
    println!();
    println!("  {}", style(CHAT_TITLE).cyan().bold());
    println!();
    println!("  {}  {}", style("Endpoint:").bold(), style(endpoint).dim());
    println!(
        "  {}   {}",
        style("Refresh:").bold(),
        style(refresh_endpoint.unwrap_or("not configured")).dim()
    );
    println!(
        "  {}   {}",
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    );
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
