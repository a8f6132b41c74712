//! Interactive CLI chat experience.
//!
//! Implements the terminal chat loop: a welcome banner, a "Thinking..."
//! spinner while the webhook answers, markdown rendering of replies, and
//! slash commands for clearing, refreshing and reviewing the transcript.
//! Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
