//! Database set up and access to the shared connection.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error, badge::create_badge_table, transaction::create_transaction_table,
    user::create_user_table,
};

/// Create the all of the database tables for the application.
///
/// Foreign key enforcement is switched on for `connection`, so deleting a user
/// also deletes their transactions and badges.
///
/// # Errors
/// This function may return a [Error::SqlError] if an SQL related error occurred.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // The pragma is a no-op inside a transaction, so it must come first.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_badge_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Acquire the lock on the shared database connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned.
pub(crate) fn lock_connection(
    db_connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection.lock().map_err(|error| {
        tracing::error!("Could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}
