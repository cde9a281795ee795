//! Resolves the caller's session from the `x-session-id` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use zuruu_session::store::SessionHandle;

use crate::error::ApiError;
use crate::state::AppState;

pub const SESSION_HEADER: &str = "x-session-id";

/// The calling client's session. Requests without a usable
/// `x-session-id` header are rejected with 400.
pub struct Session(pub SessionHandle);

impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let id = parts
            .headers
            .get(SESSION_HEADER)
            .ok_or_else(|| ApiError::BadRequest(format!("missing {SESSION_HEADER} header")))?
            .to_str()
            .map_err(|_| ApiError::BadRequest(format!("{SESSION_HEADER} is not valid text")))?;

        let handle = state
            .sessions
            .handle(id)
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        Ok(Session(handle))
    }
}
