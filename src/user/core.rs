//! Defines the user model and the database queries for users.

use std::{fmt::Display, str::FromStr};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, PasswordHash, auth::SessionToken};

/// The risk profile assigned to every new user.
pub const DEFAULT_RISK_PROFILE: &str = "moderado";

/// The share of the monthly income a new user may bet each month.
pub const MONTHLY_BET_LIMIT_SHARE: f64 = 0.1;

// ============================================================================
// MODELS
// ============================================================================

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application and their progress.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
    /// The email the user logs in with. Unique, ignoring case.
    pub email: EmailAddress,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// The income the user declared at registration.
    pub monthly_income: f64,
    /// How much risk the user is comfortable with, e.g. "moderado".
    pub risk_profile: String,
    /// How much the user should bet at most each month.
    pub monthly_bet_limit: f64,
    /// The user's current balance.
    pub balance: f64,
    /// Experience points earned by investing and staying away from bets.
    pub xp: i64,
    /// The number of non-bet transactions recorded since the last bet.
    pub days_without_betting: i64,
    /// Bets are refused until this time, if set.
    pub bet_cooldown_until: Option<OffsetDateTime>,
}

/// The details needed to register a new user.
///
/// The remaining fields of [User] are derived from these when the user is created.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// The user's display name.
    pub name: String,
    /// The email the user logs in with.
    pub email: EmailAddress,
    /// The hash of the user's password.
    pub password_hash: PasswordHash,
    /// The user's monthly income, which is also their starting balance.
    pub monthly_income: f64,
}

/// The user data that is safe to send to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    /// The user's ID.
    pub id: UserID,
    /// The user's display name.
    #[serde(rename = "nome")]
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The income the user declared at registration.
    #[serde(rename = "rendaMensal")]
    pub monthly_income: f64,
    /// The user's risk profile.
    #[serde(rename = "perfilRisco")]
    pub risk_profile: String,
    /// How much the user should bet at most each month.
    #[serde(rename = "limiteMensalAposta")]
    pub monthly_bet_limit: f64,
    /// The user's current balance.
    #[serde(rename = "saldo")]
    pub balance: f64,
    /// Experience points.
    pub xp: i64,
    /// Transactions since the last bet.
    #[serde(rename = "diasSemApostar")]
    pub days_without_betting: i64,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.to_string(),
            monthly_income: user.monthly_income,
            risk_profile: user.risk_profile.clone(),
            monthly_bet_limit: user.monthly_bet_limit,
            balance: user.balance,
            xp: user.xp,
            days_without_betting: user.days_without_betting,
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const USER_COLUMNS: &str = "id, name, email, password, monthly_income, risk_profile, \
    monthly_bet_limit, balance, xp, days_without_betting, bet_cooldown_until";

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                password TEXT NOT NULL,
                monthly_income REAL NOT NULL,
                risk_profile TEXT NOT NULL,
                monthly_bet_limit REAL NOT NULL,
                balance REAL NOT NULL,
                xp INTEGER NOT NULL DEFAULT 0,
                days_without_betting INTEGER NOT NULL DEFAULT 0,
                bet_cooldown_until TEXT,
                token TEXT UNIQUE,
                token_expires_at TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// The user starts with a balance equal to their monthly income, the
/// [DEFAULT_RISK_PROFILE], and a monthly bet limit of [MONTHLY_BET_LIMIT_SHARE]
/// of their income.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateEmail] if the email is already registered,
/// - or [Error::SqlError] if an SQL related error occurred.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO user
                (name, email, password, monthly_income, risk_profile, monthly_bet_limit, balance)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {USER_COLUMNS}"
        ))?
        .query_row(
            (
                &new_user.name,
                new_user.email.to_string(),
                new_user.password_hash.to_string(),
                new_user.monthly_income,
                DEFAULT_RISK_PROFILE,
                new_user.monthly_income * MONTHLY_BET_LIMIT_SHARE,
                new_user.monthly_income,
            ),
            map_user_row,
        )
        .map_err(|error| error.into())
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = :id"))?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user registered with `email`, ignoring case.
///
/// # Errors
///
/// Returns a [Error::NotFound] if no user has registered with `email`.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!(
            "SELECT {USER_COLUMNS} FROM user WHERE email = :email"
        ))?
        .query_row(&[(":email", &email.trim())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user that holds the session `token`, if the token has not expired at `now`.
///
/// # Errors
///
/// Returns a [Error::InvalidToken] if no user holds `token` or the token has expired.
pub fn get_user_by_token(
    token: &SessionToken,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<User, Error> {
    let (user, expires_at) = connection
        .prepare(&format!(
            "SELECT {USER_COLUMNS}, token_expires_at FROM user WHERE token = :token"
        ))?
        .query_row(&[(":token", &token.as_str())], |row| {
            let user = map_user_row(row)?;
            let expires_at: Option<OffsetDateTime> = row.get(11)?;

            Ok((user, expires_at))
        })
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::InvalidToken,
            error => error.into(),
        })?;

    match expires_at {
        Some(expires_at) if expires_at > now => Ok(user),
        _ => Err(Error::InvalidToken),
    }
}

/// Store `token` as the user's session token, replacing any previous token.
///
/// # Errors
///
/// Returns a [Error::NotFound] if `user_id` does not belong to a registered user.
pub fn set_session_token(
    user_id: UserID,
    token: &SessionToken,
    expires_at: OffsetDateTime,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET token = ?1, token_expires_at = ?2 WHERE id = ?3",
        (token.as_str(), expires_at, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Remove the user's session token, ending their session.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn clear_session_token(user_id: UserID, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "UPDATE user SET token = NULL, token_expires_at = NULL WHERE id = ?1",
        (user_id.as_i64(),),
    )?;

    Ok(())
}

/// Replace the user's password hash.
///
/// # Errors
///
/// Returns a [Error::NotFound] if `user_id` does not belong to a registered user.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.to_string(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Set or clear the time until which the user may not bet.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn set_bet_cooldown(
    user_id: UserID,
    cooldown_until: Option<OffsetDateTime>,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "UPDATE user SET bet_cooldown_until = ?1 WHERE id = ?2",
        (cooldown_until, user_id.as_i64()),
    )?;

    Ok(())
}

/// Save the balance, XP and days without betting of `user`.
///
/// # Errors
///
/// Returns a [Error::NotFound] if the user is not in the database.
pub fn update_user_progress(user: &User, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET balance = ?1, xp = ?2, days_without_betting = ?3 WHERE id = ?4",
        (
            user.balance,
            user.xp,
            user.days_without_betting,
            user.id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM user;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_email: String = row.get(2)?;
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        name: row.get(1)?,
        email: EmailAddress::from_str(&raw_email)
            .unwrap_or_else(|_| EmailAddress::new_unchecked(raw_email)),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        monthly_income: row.get(4)?,
        risk_profile: row.get(5)?,
        monthly_bet_limit: row.get(6)?,
        balance: row.get(7)?,
        xp: row.get(8)?,
        days_without_betting: row.get(9)?,
        bet_cooldown_until: row.get(10)?,
    })
}
