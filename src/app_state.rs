//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{Error, auth::DEFAULT_SESSION_DURATION, db::initialize};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// How long a session token stays valid after log-in.
    pub session_duration: Duration,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// Sessions last for [DEFAULT_SESSION_DURATION], use [AppState::with_session_duration] to
    /// change it.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, cookie_secret: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            session_duration: DEFAULT_SESSION_DURATION,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }

    /// Set how long session tokens issued at log-in remain valid.
    pub fn with_session_duration(mut self, session_duration: Duration) -> Self {
        self.session_duration = session_duration;
        self
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
