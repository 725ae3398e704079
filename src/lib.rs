//! CashControl is a web API that helps people keep their betting in check.
//!
//! Users record their bets, investments and returns, earn badges for staying
//! away from betting, and compare what a bet would have returned against
//! investing the same amount. Bets that are large relative to the user's
//! balance are refused and put the user on a short cooldown.
//!
//! This library provides the JSON REST API. The `server` binary serves it.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::{Deserialize, Serialize};
use tokio::signal;

mod app_state;
mod auth;
mod badge;
mod dashboard;
mod database_id;
mod date_format;
mod db;
mod endpoints;
mod extract;
mod logging;
mod routing;
mod simulator;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{PasswordHash, ValidatedPassword};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::BetLimitBreach;
pub use user::{
    NewUser, User, UserID, clear_session_token, count_users, create_user, get_user_by_email,
    update_password,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for the ctrl+c signal: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email is not registered or the password does not match.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The request did not carry a session token, or the token is unknown or
    /// has expired.
    #[error("missing, invalid or expired session token")]
    InvalidToken,

    /// The session token is valid but belongs to a different user than the
    /// one the request refers to.
    #[error("the session token does not grant access to this resource")]
    Unauthorized,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The string could not be parsed as an email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// The email address already belongs to a registered user.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// A request field was missing or had an invalid value.
    ///
    /// The string describes which field and why.
    #[error("{0}")]
    InvalidField(String),

    /// The transaction type is not one of the supported kinds.
    #[error("\"{0}\" is not a valid transaction type, expected APOSTA, INVESTIMENTO or RETORNO")]
    InvalidTransactionKind(String),

    /// The user referenced in a request body does not exist.
    #[error("user not found")]
    UserNotFound,

    /// The user tried to bet while on a cooldown.
    ///
    /// Holds the number of minutes the user still has to wait.
    #[error(
        "you need to wait {0} minute(s) before betting again because a previous bet was above \
        your limit. Consider investing this amount instead!"
    )]
    BetCooldown(i64),

    /// The bet is too large relative to the user's balance.
    #[error("{0}")]
    BetLimitExceeded(BetLimitBreach),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent to clients when a request fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// A human readable description of what went wrong.
    pub error: String,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials | Error::InvalidToken | Error::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            Error::TooWeak(_)
            | Error::InvalidEmail(_)
            | Error::DuplicateEmail
            | Error::InvalidField(_)
            | Error::InvalidTransactionKind(_)
            | Error::UserNotFound
            | Error::BetCooldown(_)
            | Error::BetLimitExceeded(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::HashingError(_) | Error::SqlError(_) | Error::DatabaseLockError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
