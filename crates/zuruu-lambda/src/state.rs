use std::sync::Arc;

use zuruu_bedrock::invoker::FlowInvoker;
use zuruu_core::redaction::RedactionPolicy;
use zuruu_session::registry::SessionRegistry;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub invoker: FlowInvoker,
    /// One session per `x-session-id`; see [`crate::session::Session`].
    pub sessions: Arc<SessionRegistry>,
    pub policy: Arc<RedactionPolicy>,
}
