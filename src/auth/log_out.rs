//! Handles log-out requests.

use axum::{Extension, extract::State, http::StatusCode};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    Error,
    auth::{LogInState, cookie::invalidate_session_cookie},
    db::lock_connection,
    user::{UserID, clear_session_token},
};

/// Invalidate the session of the authenticated user.
///
/// The stored token is removed so it can no longer be used, and the session
/// cookie is expired. Responds with 204 No Content.
pub async fn post_log_out(
    State(state): State<LogInState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Result<(StatusCode, PrivateCookieJar), Error> {
    let connection = lock_connection(&state.db_connection)?;
    clear_session_token(user_id, &connection)?;
    tracing::info!("User {user_id} logged out");

    Ok((StatusCode::NO_CONTENT, invalidate_session_cookie(jar)))
}

#[cfg(test)]
mod log_out_tests {
    use axum::http::StatusCode;
    use time::{Duration, OffsetDateTime};

    use crate::{
        auth::cookie::COOKIE_TOKEN,
        endpoints,
        test_utils::{TestApp, auth_header},
    };

    #[tokio::test]
    async fn log_out_invalidates_token_and_cookie() {
        let app = TestApp::new();
        let user = app.create_user("ana@example.com", 100.0);
        let token = app.log_in(user.id);
        let (name, value) = auth_header(&token);

        let response = app
            .server
            .post(endpoints::LOG_OUT)
            .add_header(name.clone(), value.clone())
            .await;

        response.assert_status(StatusCode::NO_CONTENT);
        let cookie = response.cookie(COOKIE_TOKEN);
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));

        app.server
            .post(endpoints::LOG_OUT)
            .add_header(name, value)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_out_requires_token() {
        let app = TestApp::new();

        app.server
            .post(endpoints::LOG_OUT)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
