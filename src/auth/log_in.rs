//! Handles log-in requests.
//! The rest of the auth module handles the lower level token and cookie logic.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{
    AppState, Error,
    auth::{SessionToken, cookie::set_session_cookie},
    db::lock_connection,
    extract::JsonBody,
    user::{User, UserID, get_user_by_email, set_session_token},
};

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How long a new session lasts.
    pub session_duration: Duration,
    /// The database connection for looking up users and storing tokens.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            session_duration: state.session_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The credentials a client sends to log in.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct LogInData {
    /// The email the user registered with.
    pub email: Option<String>,
    /// The user's password in plain text.
    #[serde(rename = "senha")]
    pub password: Option<String>,
}

/// The response to a successful log-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogInResponse {
    /// The session token to send in the `Authorization` header.
    pub token: SessionToken,
    /// The ID of the user that logged in.
    #[serde(rename = "userId")]
    pub user_id: UserID,
    /// The user's display name.
    #[serde(rename = "nome")]
    pub name: String,
    /// The user's email address.
    pub email: String,
}

/// Handler for log-in requests.
///
/// On success a new session token replaces the user's previous token. The
/// token is returned in the body and set in the private session cookie.
///
/// # Errors
///
/// Responds with:
/// - 400 if the email or password is missing,
/// - 401 if the email is not registered or the password does not match,
/// - 500 if an internal error occurred when verifying the password.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    JsonBody(data): JsonBody<LogInData>,
) -> Result<(PrivateCookieJar, Json<LogInResponse>), Error> {
    let email = data
        .email
        .ok_or_else(|| Error::InvalidField("email is required".to_owned()))?;
    let password = data
        .password
        .ok_or_else(|| Error::InvalidField("senha is required".to_owned()))?;

    let user = find_registered_user(&email, &state.db_connection)?;

    let is_password_valid = user.password_hash.verify(&password).map_err(|error| {
        tracing::error!("Error verifying password: {error}");
        Error::HashingError(error.to_string())
    })?;

    if !is_password_valid {
        tracing::debug!("Failed log-in attempt for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    let token = SessionToken::generate();
    let expires_at = OffsetDateTime::now_utc() + state.session_duration;
    set_session_token(
        user.id,
        &token,
        expires_at,
        &*lock_connection(&state.db_connection)?,
    )?;
    tracing::info!("User {} logged in", user.id);

    let jar = set_session_cookie(jar, &token, expires_at);

    Ok((
        jar,
        Json(LogInResponse {
            token,
            user_id: user.id,
            name: user.name,
            email: user.email.to_string(),
        }),
    ))
}

/// Look up the user registered with `email`.
///
/// The database lock is released before returning so that the slow password
/// check does not block other requests.
fn find_registered_user(email: &str, db_connection: &Mutex<Connection>) -> Result<User, Error> {
    let connection = lock_connection(db_connection)?;

    match get_user_by_email(email, &connection) {
        Ok(user) => Ok(user),
        Err(Error::NotFound) => Err(Error::InvalidCredentials),
        Err(error) => Err(error),
    }
}
