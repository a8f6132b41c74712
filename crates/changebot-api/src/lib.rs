//! Change Machine chatbot application layer: CLI commands and REST API.

pub mod cli;
pub mod http;
pub mod state;
