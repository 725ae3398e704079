//! Transactions: the bets, investments and returns users record.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and its database queries
//! - The betting limit that refuses oversized bets
//! - How a transaction changes the user's balance, XP and streak
//! - The route handlers for recording and reading transactions

mod betting_limit;
mod core;
mod create_endpoint;
mod handlers;
mod progress;

pub use betting_limit::BetLimitBreach;
pub use core::{
    NewTransaction, Transaction, TransactionKind, TransactionResponse,
    create_transaction_table, get_all_transactions, get_transaction, get_transactions_by_user,
    insert_transaction, total_bet_amount,
};
pub use create_endpoint::create_transaction_endpoint;
pub use handlers::{
    get_transaction_endpoint, get_transactions_endpoint, get_user_transactions_endpoint,
};
pub use progress::apply_transaction;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

/// The state needed to record and read transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
