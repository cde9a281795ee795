use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid mode: {0}")]
    InvalidMode(String),

    #[error("invalid redaction policy: {0}")]
    InvalidPolicy(String),

    #[error("redaction policy version {found} is newer than this build supports ({supported})")]
    UnsupportedPolicyVersion { found: u64, supported: u32 },
}
