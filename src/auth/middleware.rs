//! Authentication middleware that resolves the session token of a request to a user.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::{SessionToken, cookie::get_token_from_cookies, token_from_headers},
    db::lock_connection,
    user::{UserID, get_user_by_token},
};

/// The state needed for the auth middleware
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for looking up session tokens.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that checks for a valid session token.
///
/// The token is read from the `Authorization` header, or from the private
/// session cookie if the header is missing. If the token belongs to a user and
/// has not expired, the user ID and token are placed into the request and the
/// request is executed normally. Otherwise a 401 response is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = token_from_headers(request.headers()).or_else(|| {
        let jar = PrivateCookieJar::from_headers(request.headers(), state.cookie_key.clone());
        get_token_from_cookies(&jar)
    });

    let Some(token) = token else {
        return Error::InvalidToken.into_response();
    };

    let user_id = match authenticate(&token, &state.db_connection) {
        Ok(user_id) => user_id,
        Err(error) => return error.into_response(),
    };

    request.extensions_mut().insert(user_id);
    request.extensions_mut().insert(token);

    next.run(request).await
}

fn authenticate(token: &SessionToken, db_connection: &Mutex<Connection>) -> Result<UserID, Error> {
    let connection = lock_connection(db_connection)?;

    get_user_by_token(token, OffsetDateTime::now_utc(), &connection).map(|user| user.id)
}
