//! zuruu-bedrock
//!
//! Flow invocation against a reasoning provider (Bedrock in production) and
//! structured output parsing.

pub mod client;
pub mod context;
pub mod error;
pub mod extract;
pub mod invoker;
pub mod prompt;
pub mod provider;
pub mod scripted;
