//! Gathers a user's balance, spending on bets, streak and badges into one summary.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    badge::{BadgeResponse, get_badges_by_user},
    transaction::total_bet_amount,
    user::{UserID, get_user_by_id},
};

/// A summary of a user's progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// The user's current balance.
    #[serde(rename = "saldo")]
    pub balance: f64,
    /// The sum of all of the user's bets.
    #[serde(rename = "gastosTotais")]
    pub total_bet_amount: f64,
    /// Transactions since the last bet.
    #[serde(rename = "diasSemApostar")]
    pub days_without_betting: i64,
    /// Experience points.
    pub xp: i64,
    /// The badges the user has earned.
    pub badges: Vec<BadgeResponse>,
}

/// Build the dashboard summary for `user_id`.
///
/// # Errors
/// Returns a:
/// - [Error::NotFound] if the user does not exist,
/// - or [Error::SqlError] if there is some SQL error.
pub(super) fn build_summary(
    user_id: UserID,
    connection: &Connection,
) -> Result<DashboardSummary, Error> {
    let user = get_user_by_id(user_id, connection)?;
    let total_bet_amount = total_bet_amount(user_id, connection)?;
    let badges = get_badges_by_user(user_id, connection)?;

    Ok(DashboardSummary {
        balance: user.balance,
        total_bet_amount,
        days_without_betting: user.days_without_betting,
        xp: user.xp,
        badges: badges.iter().map(BadgeResponse::from).collect(),
    })
}
