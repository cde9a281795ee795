//! zuruu-session
//!
//! State around flow invocation: the process-local session store and its
//! per-client registry, the per-form result presenter, and the
//! generate-then-evaluate orchestrator used by the case and OSCE simulators.

pub mod error;
pub mod orchestrator;
pub mod presenter;
pub mod registry;
pub mod store;
