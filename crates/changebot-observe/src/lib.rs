//! Observability setup for the Change Machine chatbot.
//!
//! Structured logging through `tracing-subscriber`, with an optional bridge
//! that exports spans to OpenTelemetry.

pub mod tracing_setup;
