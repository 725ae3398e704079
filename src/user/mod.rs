//! Users: registration, look-up and the queries that track their progress.

mod core;
mod get_endpoint;
mod register_endpoint;

pub use core::{
    NewUser, User, UserID, UserResponse, clear_session_token, count_users, create_user,
    create_user_table, get_user_by_email, get_user_by_id, get_user_by_token, set_bet_cooldown,
    set_session_token, update_password, update_user_progress,
};
pub use get_endpoint::get_user_endpoint;
pub use register_endpoint::{RegisterForm, register_user_endpoint};

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

/// The state needed to register and look up users.
#[derive(Debug, Clone)]
pub struct UserState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
