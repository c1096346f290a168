//! Process-wide registry of login sessions.
//!
//! A session is nothing more than a random id and the VRChat client
//! holding that login's cookie jar. Sessions are created when a login
//! starts, looked up by every later call, and only go away when the
//! process exits. There is no expiry and no logout; a desktop companion
//! process lives exactly as long as its sessions are useful.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::Error;
use crate::http::DefaultHttpClient;
use crate::platforms::vrchat::VRChatClient;

/// One login attempt, pending or authenticated.
pub struct Session {
    pub session_id: Uuid,
    pub client: VRChatClient,
    pub created_at: DateTime<Utc>,
}

pub struct SessionRegistry {
    sessions: DashMap<Uuid, Arc<Session>>,
    base_url: String,
    user_agent: String,
}

impl SessionRegistry {
    pub fn new(base_url: &str, user_agent: &str) -> Self {
        Self {
            sessions: DashMap::new(),
            base_url: base_url.to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    /// Create a session with a fresh cookie jar and hand it back.
    pub fn create_session(&self) -> Result<Arc<Session>, Error> {
        let http = Arc::new(DefaultHttpClient::with_session_jar(&self.user_agent)?);
        let session_id = Uuid::new_v4();
        let session = Arc::new(Session {
            session_id,
            client: VRChatClient::with_base_url(http, &self.base_url),
            created_at: Utc::now(),
        });
        self.sessions.insert(session_id, session.clone());
        Ok(session)
    }

    pub fn get(&self, session_id: Uuid) -> Result<Arc<Session>, Error> {
        self.sessions
            .get(&session_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::NoSession(session_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
