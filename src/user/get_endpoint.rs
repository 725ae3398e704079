//! Defines the endpoint for fetching a single user.

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::token_from_headers,
    db::lock_connection,
    extract::PathParam,
    user::{UserID, UserResponse, UserState, get_user_by_id, get_user_by_token},
};

/// A route handler for getting a user by their ID.
///
/// The route is public, but if the request carries a session token it must
/// belong to the requested user.
///
/// # Errors
///
/// Responds with 404 if the user does not exist, or 401 if a token was given
/// that is invalid or belongs to someone else.
pub async fn get_user_endpoint(
    State(state): State<UserState>,
    PathParam(user_id): PathParam<i64>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let user = get_user_by_id(UserID::new(user_id), &connection)?;

    if let Some(token) = token_from_headers(&headers) {
        let token_owner = get_user_by_token(&token, OffsetDateTime::now_utc(), &connection)?;

        if token_owner.id != user.id {
            return Err(Error::Unauthorized);
        }
    }

    Ok(Json(UserResponse::from(&user)))
}

#[cfg(test)]
mod get_user_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{TestApp, auth_header},
        user::UserResponse,
    };

    #[tokio::test]
    async fn anyone_can_get_user_without_token() {
        let app = TestApp::new();
        let user = app.create_user("ana@example.com", 1000.0);

        let response = app
            .server
            .get(&format_endpoint(endpoints::USER, user.id.as_i64()))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<UserResponse>().email, "ana@example.com");
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let app = TestApp::new();

        app.server
            .get(&format_endpoint(endpoints::USER, 999))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn own_token_is_accepted() {
        let app = TestApp::new();
        let user = app.create_user("ana@example.com", 1000.0);
        let token = app.log_in(user.id);
        let (name, value) = auth_header(&token);

        app.server
            .get(&format_endpoint(endpoints::USER, user.id.as_i64()))
            .add_header(name, value)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn token_of_another_user_is_rejected() {
        let app = TestApp::new();
        let user = app.create_user("ana@example.com", 1000.0);
        let other = app.create_user("bruno@example.com", 1000.0);
        let token = app.log_in(other.id);
        let (name, value) = auth_header(&token);

        app.server
            .get(&format_endpoint(endpoints::USER, user.id.as_i64()))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
