//! Session Store
//!
//! Owns the authentication session and its persistence. Every mutation
//! writes storage first and only then swaps the in-memory session, while
//! holding the session lock, so memory and storage never disagree.

use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;

use estoque_storage::Database;

use crate::api::{ApiError, AuthApi, AuthResponse, Credentials, RegistrationData};
use crate::error::{SessionError, DEFAULT_LOGIN_ERROR, DEFAULT_REGISTRATION_ERROR};
use crate::session::{Session, UserRecord};
use crate::Result;

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

/// Reasons a persisted session is discarded at startup. Never surfaced.
#[derive(Error, Debug)]
enum PersistedSessionError {
    #[error("persisted user is not valid JSON: {0}")]
    MalformedUser(#[from] serde_json::Error),

    #[error("persisted user is not a JSON object")]
    UserNotAnObject,

    #[error("token persisted without a user")]
    MissingUser,

    #[error("user persisted without a token")]
    MissingToken,
}

enum Persisted {
    Empty,
    Valid(Session),
    Corrupt(PersistedSessionError),
}

pub struct SessionStore {
    /// In-memory session
    session: Arc<RwLock<Session>>,
    /// Durable local storage
    db: Database,
    /// Remote authentication backend
    api: Arc<dyn AuthApi>,
}

impl SessionStore {
    /// Create a store with an empty session. Call [`SessionStore::initialize`]
    /// to restore whatever was persisted.
    pub fn new(db: Database, api: Arc<dyn AuthApi>) -> Self {
        Self {
            session: Arc::new(RwLock::new(Session::empty())),
            db,
            api,
        }
    }

    /// Restore the persisted session.
    ///
    /// Absent or corrupt values give an empty session; corrupt leftovers are
    /// removed from storage. Only a failing storage backend is an error.
    pub fn initialize(&self) -> Result<Session> {
        let mut session = self.session.write();

        *session = match self.read_persisted()? {
            Persisted::Empty => Session::empty(),
            Persisted::Valid(restored) => {
                tracing::debug!("Restored persisted session");
                restored
            }
            Persisted::Corrupt(reason) => {
                tracing::warn!(reason = %reason, "Discarding corrupt persisted session");
                if let Err(e) = self.db.remove_items(&[TOKEN_KEY, USER_KEY]) {
                    tracing::warn!(error = %e, "Failed to remove corrupt session keys");
                }
                Session::empty()
            }
        };

        tracing::info!(
            authenticated = session.is_authenticated(),
            "Initialized session store"
        );

        Ok(session.clone())
    }

    fn read_persisted(&self) -> Result<Persisted> {
        let token = self
            .db
            .get_item(TOKEN_KEY)?
            .filter(|token| !token.is_empty());
        let user = self.db.get_item(USER_KEY)?;

        let persisted = match (token, user) {
            (None, None) => Persisted::Empty,
            (Some(_), None) => Persisted::Corrupt(PersistedSessionError::MissingUser),
            (None, Some(_)) => Persisted::Corrupt(PersistedSessionError::MissingToken),
            (Some(token), Some(raw_user)) => match parse_user(&raw_user) {
                Ok(user) => Persisted::Valid(Session::authenticated(token, user)),
                Err(e) => Persisted::Corrupt(e),
            },
        };

        Ok(persisted)
    }

    /// Authenticate against the backend and persist the new session.
    ///
    /// On any failure the current session is left untouched.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let response = self
            .api
            .login(credentials)
            .await
            .map_err(|e| SessionError::Authentication(failure_message(&e, DEFAULT_LOGIN_ERROR)))?;

        if response.token.is_empty() {
            return Err(SessionError::Authentication(DEFAULT_LOGIN_ERROR.to_string()));
        }

        let session = self.establish(response)?;
        tracing::info!("User logged in");

        Ok(session)
    }

    /// Create an account and sign in with it, same contract as `login`.
    pub async fn register(&self, data: &RegistrationData) -> Result<Session> {
        let response = self.api.register(data).await.map_err(|e| {
            SessionError::Registration(failure_message(&e, DEFAULT_REGISTRATION_ERROR))
        })?;

        if response.token.is_empty() {
            return Err(SessionError::Registration(
                DEFAULT_REGISTRATION_ERROR.to_string(),
            ));
        }

        let session = self.establish(response)?;
        tracing::info!("User registered");

        Ok(session)
    }

    fn establish(&self, response: AuthResponse) -> Result<Session> {
        let AuthResponse { token, user } = response;
        let user_json = serde_json::to_string(&user)?;

        let mut session = self.session.write();
        self.db
            .set_items(&[(TOKEN_KEY, token.as_str()), (USER_KEY, user_json.as_str())])?;
        *session = Session::authenticated(token, user);

        Ok(session.clone())
    }

    /// Drop the session from memory and storage.
    pub fn logout(&self) {
        let mut session = self.session.write();
        if let Err(e) = self.db.remove_items(&[TOKEN_KEY, USER_KEY]) {
            tracing::error!(error = %e, "Failed to remove persisted session");
        }
        session.clear();

        tracing::info!("User logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    pub fn token(&self) -> Option<String> {
        self.session.read().token().map(str::to_string)
    }

    pub fn user(&self) -> Option<UserRecord> {
        self.session.read().user().cloned()
    }

    /// Copy of the current session
    pub fn snapshot(&self) -> Session {
        self.session.read().clone()
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            db: self.db.clone(),
            api: Arc::clone(&self.api),
        }
    }
}

fn parse_user(raw: &str) -> std::result::Result<UserRecord, PersistedSessionError> {
    match serde_json::from_str::<serde_json::Value>(raw)? {
        serde_json::Value::Object(user) => Ok(user),
        _ => Err(PersistedSessionError::UserNotAnObject),
    }
}

fn failure_message(error: &ApiError, default: &str) -> String {
    error
        .server_message()
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}
