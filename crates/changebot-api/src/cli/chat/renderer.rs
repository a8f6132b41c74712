//! Terminal rendering of transcript turns.
//!
//! `ChatRenderer` renders assistant replies as markdown through `termimad`,
//! with fenced code blocks highlighted by `syntect`. User turns and error
//! banners are plain styled lines.

use console::style;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;
use termimad::crossterm::style::Color;

use changebot_types::chat::{Turn, TurnRole};

const THEME: &str = "base16-ocean.dark";

/// Label printed before assistant replies.
pub const ASSISTANT_LABEL: &str = "Bot";

/// Terminal markdown renderer with syntax highlighting.
pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render a markdown reply with syntax-highlighted code blocks.
    ///
    /// Code fences are highlighted via syntect; everything else goes
    /// through termimad.
    pub fn render_final(&self, markdown: &str) -> String {
        let mut output = String::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_buf = String::new();

        for line in markdown.lines() {
            let is_fence = line.trim_start().starts_with("```");
            if is_fence && !in_code_block {
                in_code_block = true;
                code_lang = line.trim().trim_start_matches('`').trim().to_string();
                code_buf.clear();
            } else if is_fence {
                in_code_block = false;
                output.push_str(&self.highlight_code(&code_buf, &code_lang));
                output.push('\n');
            } else if in_code_block {
                code_buf.push_str(line);
                code_buf.push('\n');
            } else {
                output.push_str(&self.skin.term_text(line).to_string());
            }
        }

        // Unclosed fence
        if in_code_block && !code_buf.is_empty() {
            output.push_str(&self.highlight_code(&code_buf, &code_lang));
        }

        output
    }

    /// Print one transcript turn with its role label.
    pub fn print_turn(&self, turn: &Turn) {
        match turn.role {
            TurnRole::User => {
                println!("  {} {}", style("You >").green().bold(), turn.content);
            }
            TurnRole::Assistant => {
                println!();
                println!("  {}", style(ASSISTANT_LABEL).cyan().bold());
                let rendered = self.render_final(&turn.content);
                for line in rendered.trim_end().lines() {
                    println!("  {line}");
                }
            }
        }
    }

    /// Print the footer after a reply: "| {time}s".
    pub fn print_footer(&self, response_ms: u64) {
        let seconds = response_ms as f64 / 1000.0;
        println!(
            "\n  {} {}",
            style("|").dim(),
            style(format!("{seconds:.1}s")).dim()
        );
    }

    /// Print the error banner for a failed exchange.
    pub fn print_error_banner(&self, banner: &str) {
        eprintln!("\n  {} {}", style("!").red().bold(), style(banner).red());
    }

    /// Highlight a code block using syntect.
    pub fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let mut output = String::new();
        output.push_str(&format!("  {}\n", style(format!("--- {lang} ---")).dim()));

        let Some(theme) = self.theme_set.themes.get(THEME) else {
            for line in code.lines() {
                output.push_str(&format!("  {line}\n"));
            }
            return output;
        };

        let mut h = HighlightLines::new(syntax, theme);
        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = h
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }

        output
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain_text_keeps_words() {
        let renderer = ChatRenderer::new();
        let out = console::strip_ansi_codes(&renderer.render_final("Refunds take five days.")).to_string();
        assert!(out.contains("Refunds take five days."));
    }

    #[test]
    fn test_code_block_is_highlighted_separately() {
        let renderer = ChatRenderer::new();
        let md = "Try this:\n```rust\nfn main() {}\n```\nDone.";
        let out = console::strip_ansi_codes(&renderer.render_final(md)).to_string();
        assert!(out.contains("--- rust ---"));
        assert!(out.contains("fn main() {}"));
        assert!(out.contains("Done."));
    }

    #[test]
    fn test_unclosed_fence_still_renders_code() {
        let renderer = ChatRenderer::new();
        let out = console::strip_ansi_codes(&renderer.render_final("```\nlet x = 1;")).to_string();
        assert!(out.contains("let x = 1;"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_text() {
        let renderer = ChatRenderer::new();
        let out = console::strip_ansi_codes(&renderer.highlight_code("abc\n", "nosuchlang")).to_string();
        assert!(out.contains("--- nosuchlang ---"));
        assert!(out.contains("abc"));
    }
}
