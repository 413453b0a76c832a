//! Session data structure

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity record as returned by the backend. The shape belongs to the API,
/// so it is kept as an open JSON object.
pub type UserRecord = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer credential
    token: Option<String>,
    /// Identity of the logged-in user
    user: Option<UserRecord>,
}

impl Session {
    /// An unauthenticated session
    pub fn empty() -> Self {
        Self::default()
    }

    /// An authenticated session. Token and user only ever arrive together.
    pub fn authenticated(token: String, user: UserRecord) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
    }
}
