//! Session handles keyed by a client-chosen session id.
//!
//! Each id resolves to its own [`SessionHandle`]; two ids never share
//! state. The registry is bounded: once full, creating a session evicts the
//! least recently used one.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use crate::error::SessionIdError;
use crate::store::SessionHandle;

pub const DEFAULT_MAX_SESSIONS: usize = 10_000;
pub const MAX_SESSION_ID_LEN: usize = 128;

#[derive(Default)]
struct Sessions {
    handles: HashMap<String, SessionHandle>,
    /// Least recently used first.
    order: VecDeque<String>,
}

impl Sessions {
    fn touch(&mut self, id: &str) {
        self.order.retain(|existing| existing != id);
        self.order.push_back(id.to_string());
    }
}

pub struct SessionRegistry {
    sessions: Mutex<Sessions>,
    max_sessions: usize,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::with_max_sessions(DEFAULT_MAX_SESSIONS)
    }

    pub fn with_max_sessions(max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(Sessions::default()),
            max_sessions: max_sessions.max(1),
        }
    }

    /// The handle for `id`, created empty on first use.
    pub fn handle(&self, id: &str) -> Result<SessionHandle, SessionIdError> {
        validate_session_id(id)?;

        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = sessions.handles.get(id).cloned() {
            sessions.touch(id);
            return Ok(handle);
        }

        if sessions.handles.len() >= self.max_sessions
            && let Some(oldest) = sessions.order.pop_front()
        {
            sessions.handles.remove(&oldest);
            warn!(max_sessions = self.max_sessions, "session limit reached, evicted oldest");
        }

        let handle = SessionHandle::new();
        sessions.handles.insert(id.to_string(), handle.clone());
        sessions.touch(id);
        debug!(sessions = sessions.handles.len(), "session created");
        Ok(handle)
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handles
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn validate_session_id(id: &str) -> Result<(), SessionIdError> {
    if id.is_empty() {
        return Err(SessionIdError::Empty);
    }
    if id.len() > MAX_SESSION_ID_LEN {
        return Err(SessionIdError::TooLong {
            max: MAX_SESSION_ID_LEN,
        });
    }
    if !id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
    {
        return Err(SessionIdError::InvalidCharacters);
    }
    Ok(())
}
