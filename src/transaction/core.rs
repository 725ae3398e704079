//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::TransactionId, date_format, user::UserID};

/// The status of every recorded transaction.
pub const COMPLETED_STATUS: &str = "REALIZADA";

// ============================================================================
// MODELS
// ============================================================================

/// What a transaction was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money put on a bet.
    #[serde(rename = "APOSTA")]
    Bet,
    /// Money put into an investment.
    #[serde(rename = "INVESTIMENTO")]
    Investment,
    /// Money coming back, e.g. winnings or investment returns.
    #[serde(rename = "RETORNO")]
    Return,
}

impl TransactionKind {
    /// The name used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Bet => "APOSTA",
            TransactionKind::Investment => "INVESTIMENTO",
            TransactionKind::Return => "RETORNO",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    /// Parse a kind, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "APOSTA" => Ok(TransactionKind::Bet),
            "INVESTIMENTO" => Ok(TransactionKind::Investment),
            "RETORNO" => Ok(TransactionKind::Return),
            _ => Err(Error::InvalidTransactionKind(s.to_owned())),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

/// A bet, investment or return recorded by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that made the transaction.
    pub user_id: UserID,
    /// How much money moved. Always positive.
    pub amount: f64,
    /// What the transaction was for.
    pub kind: TransactionKind,
    /// When the transaction was recorded.
    pub date: OffsetDateTime,
    /// Always [COMPLETED_STATUS].
    pub status: String,
}

/// A transaction that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The user making the transaction.
    pub user_id: UserID,
    /// How much money moved.
    pub amount: f64,
    /// What the transaction was for.
    pub kind: TransactionKind,
    /// When the transaction happened.
    pub date: OffsetDateTime,
}

/// The transaction data sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// How much money moved.
    #[serde(rename = "valor")]
    pub amount: f64,
    /// What the transaction was for.
    #[serde(rename = "tipo")]
    pub kind: TransactionKind,
    /// When the transaction was recorded.
    #[serde(rename = "data", with = "date_format::rfc3339")]
    pub date: OffsetDateTime,
    /// The transaction status.
    pub status: String,
    /// The user that made the transaction.
    #[serde(rename = "userId")]
    pub user_id: UserID,
}

impl From<&Transaction> for TransactionResponse {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id,
            amount: transaction.amount,
            kind: transaction.kind,
            date: transaction.date,
            status: transaction.status.clone(),
            user_id: transaction.user_id,
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('APOSTA', 'INVESTIMENTO', 'RETORNO')),
                date TEXT NOT NULL,
                status TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user ON \"transaction\"(user_id);",
        (),
    )?;

    Ok(())
}

/// Save a new transaction with the status [COMPLETED_STATUS].
///
/// # Errors
/// This function will return a:
/// - [Error::UserNotFound] if the user does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn insert_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, amount, kind, date, status)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, user_id, amount, kind, date, status",
        )?
        .query_row(
            (
                new_transaction.user_id.as_i64(),
                new_transaction.amount,
                new_transaction.kind,
                new_transaction.date,
                COMPLETED_STATUS,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::UserNotFound,
            error => error.into(),
        })
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, amount, kind, date, status FROM \"transaction\" WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve every transaction of every user, ordered by ID.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, amount, kind, date, status FROM \"transaction\" ORDER BY id ASC",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Retrieve the transactions of `user_id`, ordered by ID.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transactions_by_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, amount, kind, date, status FROM \"transaction\"
             WHERE user_id = :user_id ORDER BY id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get the sum of the amounts of the user's bets, or zero if they have not bet.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn total_bet_amount(user_id: UserID, connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM \"transaction\"
             WHERE user_id = ?1 AND kind = ?2",
            (user_id.as_i64(), TransactionKind::Bet),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        amount: row.get(2)?,
        kind: row.get(3)?,
        date: row.get(4)?,
        status: row.get(5)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod transaction_kind_tests {
    use crate::Error;

    use super::TransactionKind;

    #[test]
    fn parses_ignoring_case() {
        assert_eq!("aposta".parse(), Ok(TransactionKind::Bet));
        assert_eq!("Investimento".parse(), Ok(TransactionKind::Investment));
        assert_eq!(" RETORNO ".parse(), Ok(TransactionKind::Return));
    }

    #[test]
    fn rejects_unknown_kind() {
        assert_eq!(
            "SAQUE".parse::<TransactionKind>(),
            Err(Error::InvalidTransactionKind("SAQUE".to_owned()))
        );
    }

    #[test]
    fn serializes_as_upper_case_name() {
        assert_eq!(
            serde_json::to_string(&TransactionKind::Investment).unwrap(),
            "\"INVESTIMENTO\""
        );
    }
}
