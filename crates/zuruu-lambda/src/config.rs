use std::env;
use std::path::PathBuf;

use eyre::WrapErr;
use zuruu_core::redaction::RedactionPolicy;
use zuruu_session::registry::DEFAULT_MAX_SESSIONS;

pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Settings read from the Lambda environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_id: String,
    pub region: String,
    /// JSON redaction policy; the built-in table is used when unset.
    pub redaction_policy_path: Option<PathBuf>,
    /// Sessions kept in memory before the least recently used is dropped.
    pub max_sessions: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            model_id: env::var("ZURUU_MODEL_ID").unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string()),
            region: env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            redaction_policy_path: env::var_os("ZURUU_REDACTION_POLICY").map(PathBuf::from),
            max_sessions: env::var("ZURUU_MAX_SESSIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_SESSIONS),
        }
    }

    pub fn load_redaction_policy(&self) -> eyre::Result<RedactionPolicy> {
        let Some(path) = &self.redaction_policy_path else {
            return Ok(RedactionPolicy::default());
        };

        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading redaction policy {}", path.display()))?;
        let policy = RedactionPolicy::from_json_str(&contents)
            .wrap_err_with(|| format!("parsing redaction policy {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded redaction policy");
        Ok(policy)
    }
}
