//! Webhook client abstractions.
//!
//! `WebhookClient` is the port the infrastructure layer implements for the
//! outbound chat and refresh calls. `BoxWebhookClient` type-erases it so the
//! application can hold a client without naming its concrete type.

pub mod box_client;
pub mod client;
