//! Defines functions for carrying the session token in a private cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::auth::SessionToken;

/// The name of the cookie that holds the session token.
pub(crate) const COOKIE_TOKEN: &str = "session_token";

/// Add the session cookie to the cookie jar so that browser clients stay
/// logged in without sending the `Authorization` header.
///
/// The cookie expires at `expires_at`, the same time as the token.
pub(crate) fn set_session_cookie(
    jar: PrivateCookieJar,
    token: &SessionToken,
    expires_at: OffsetDateTime,
) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, token.as_str().to_owned()))
            .path("/")
            .expires(expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Set the session cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub(crate) fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the session token from the cookie jar, if the cookie is present.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Option<SessionToken> {
    jar.get(COOKIE_TOKEN)
        .map(|cookie| cookie.value_trimmed().to_owned())
        .filter(|token| !token.is_empty())
        .map(|token| SessionToken::new(&token))
}
