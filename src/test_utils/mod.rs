#![allow(missing_docs)]

use std::str::FromStr;

use axum::http::{HeaderName, HeaderValue, header::AUTHORIZATION};
use axum_test::TestServer;
use email_address::EmailAddress;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use crate::{
    AppState, PasswordHash, ValidatedPassword,
    auth::SessionToken,
    build_router,
    db::initialize,
    user::{NewUser, User, UserID, create_user, set_session_token},
};

/// The password of every user made with [create_test_user].
pub(crate) const TEST_PASSWORD: &str = "tangerine-volcano-87-quietly";

/// An in-memory database with all tables created.
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");

    connection
}

pub(crate) fn get_test_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(connection, "42").expect("Could not create app state.")
}

/// Insert a user named "Test User" with [TEST_PASSWORD].
///
/// The password is hashed with the lowest cost to keep tests fast.
pub(crate) fn create_test_user(email: &str, monthly_income: f64, connection: &Connection) -> User {
    let password_hash = PasswordHash::new(ValidatedPassword::new_unchecked(TEST_PASSWORD), 4)
        .expect("Could not hash password.");

    create_user(
        NewUser {
            name: "Test User".to_owned(),
            email: EmailAddress::from_str(email).expect("Invalid test email."),
            password_hash,
            monthly_income,
        },
        connection,
    )
    .expect("Could not create test user.")
}

/// The `Authorization` header for `token`.
pub(crate) fn auth_header(token: &SessionToken) -> (HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
            .expect("Invalid header value."),
    )
}

/// A test server running the full application router.
pub(crate) struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let state = get_test_state();
        let server =
            TestServer::try_new(build_router(state.clone())).expect("Could not create test server.");

        Self { server, state }
    }

    pub fn create_user(&self, email: &str, monthly_income: f64) -> User {
        let connection = self.state.db_connection.lock().unwrap();

        create_test_user(email, monthly_income, &connection)
    }

    /// Give the user a session token valid for an hour without going through the log-in route.
    pub fn log_in(&self, user_id: UserID) -> SessionToken {
        let token = SessionToken::generate();
        let connection = self.state.db_connection.lock().unwrap();
        set_session_token(
            user_id,
            &token,
            OffsetDateTime::now_utc() + Duration::hours(1),
            &connection,
        )
        .expect("Could not set session token.");

        token
    }

    /// Run `f` with the locked database connection.
    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> T) -> T {
        let connection = self.state.db_connection.lock().unwrap();

        f(&connection)
    }
}
