//! Authentication: passwords, session tokens and the guard for protected routes.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod token;

pub use log_in::{LogInData, LogInResponse, LogInState, post_log_in};
pub use log_out::post_log_out;
pub use middleware::{AuthState, auth_guard};
pub use password::{PasswordHash, ValidatedPassword};
pub use token::{SessionToken, token_from_headers};

use time::Duration;

use crate::{Error, user::UserID};

/// How long a session token is valid for after log-in, unless configured otherwise.
pub const DEFAULT_SESSION_DURATION: Duration = Duration::hours(24);

/// Check that the user addressed by a request is the authenticated user.
///
/// # Errors
///
/// Returns [Error::Unauthorized] if the IDs differ.
pub fn require_same_user(requested: UserID, authenticated: UserID) -> Result<(), Error> {
    if requested == authenticated {
        Ok(())
    } else {
        tracing::debug!("User {authenticated} tried to access data of user {requested}");
        Err(Error::Unauthorized)
    }
}
