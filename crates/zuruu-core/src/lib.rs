//! zuruu-core
//!
//! Pure domain types shared by every Zuruu crate: patient records,
//! prescriptions, UI modes, the flow response union, and the role-based
//! redaction policy. No AWS dependency.

pub mod error;
pub mod models;
pub mod redaction;
