//! Badges users earn for staying away from betting.

mod core;
mod handlers;
mod milestones;

pub use core::{
    Badge, BadgeResponse, create_badge_table, get_all_badges, get_badge, get_badges_by_user,
    has_badge, insert_badge,
};
pub use handlers::{get_badge_endpoint, get_badges_endpoint, get_user_badges_endpoint};
pub use milestones::award_milestone_badges;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

/// The state needed to read badges.
#[derive(Debug, Clone)]
pub struct BadgeState {
    /// The database connection for reading badges.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BadgeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
