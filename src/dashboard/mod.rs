//! Dashboard module
//!
//! Summarises a user's balance, spending on bets, streak, XP and badges.

mod aggregation;
mod handlers;

pub use aggregation::DashboardSummary;
pub use handlers::get_dashboard_endpoint;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

/// The state needed for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading the user's data.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
