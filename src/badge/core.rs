//! Defines the badge model and the database queries for badges.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, database_id::BadgeId, date_format, user::UserID};

/// A milestone a user has reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    /// The ID of the badge.
    pub id: BadgeId,
    /// The user that earned the badge.
    pub user_id: UserID,
    /// The name of the milestone, e.g. "7 dias sem apostar".
    pub name: String,
    /// A congratulatory message.
    pub description: String,
    /// The day the badge was earned.
    pub earned_on: Date,
}

/// The badge data sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeResponse {
    /// The ID of the badge.
    pub id: BadgeId,
    /// The name of the milestone.
    #[serde(rename = "nome")]
    pub name: String,
    /// A congratulatory message.
    #[serde(rename = "descricao")]
    pub description: String,
    /// The day the badge was earned.
    #[serde(rename = "dataConquista", with = "date_format::iso_date")]
    pub earned_on: Date,
    /// The user that earned the badge.
    #[serde(rename = "userId")]
    pub user_id: UserID,
}

impl From<&Badge> for BadgeResponse {
    fn from(badge: &Badge) -> Self {
        Self {
            id: badge.id,
            name: badge.name.clone(),
            description: badge.description.clone(),
            earned_on: badge.earned_on,
            user_id: badge.user_id,
        }
    }
}

/// Create the badge table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_badge_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS badge (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                earned_on TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_badge_user ON badge(user_id);",
        (),
    )?;

    Ok(())
}

/// Save a badge for `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::UserNotFound] if the user does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn insert_badge(
    user_id: UserID,
    name: &str,
    description: &str,
    earned_on: Date,
    connection: &Connection,
) -> Result<Badge, Error> {
    connection
        .prepare(
            "INSERT INTO badge (user_id, name, description, earned_on)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, user_id, name, description, earned_on",
        )?
        .query_row(
            (user_id.as_i64(), name, description, earned_on),
            map_badge_row,
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

/// Retrieve a badge by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a badge,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_badge(id: BadgeId, connection: &Connection) -> Result<Badge, Error> {
    let badge = connection
        .prepare("SELECT id, user_id, name, description, earned_on FROM badge WHERE id = :id")?
        .query_one(&[(":id", &id)], map_badge_row)?;

    Ok(badge)
}

/// Retrieve every badge, ordered by ID.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_all_badges(connection: &Connection) -> Result<Vec<Badge>, Error> {
    connection
        .prepare("SELECT id, user_id, name, description, earned_on FROM badge ORDER BY id ASC")?
        .query_map([], map_badge_row)?
        .map(|maybe_badge| maybe_badge.map_err(Error::from))
        .collect()
}

/// Retrieve the badges earned by `user_id`, ordered by ID.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_badges_by_user(user_id: UserID, connection: &Connection) -> Result<Vec<Badge>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, description, earned_on FROM badge
             WHERE user_id = :user_id ORDER BY id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_badge_row)?
        .map(|maybe_badge| maybe_badge.map_err(Error::from))
        .collect()
}

/// Whether `user_id` already has a badge called `name`, ignoring case.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn has_badge(user_id: UserID, name: &str, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM badge WHERE user_id = ?1 AND name = ?2 COLLATE NOCASE
             )",
            (user_id.as_i64(), name),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

fn map_badge_row(row: &Row) -> Result<Badge, rusqlite::Error> {
    Ok(Badge {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
        description: row.get(3)?,
        earned_on: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        test_utils::{create_test_user, get_test_connection},
        user::UserID,
    };

    use super::{
        BadgeResponse, get_all_badges, get_badge, get_badges_by_user, has_badge, insert_badge,
    };

    #[test]
    fn insert_and_get_badge() {
        let conn = get_test_connection();
        let user = create_test_user("ana@example.com", 100.0, &conn);

        let badge = insert_badge(user.id, "Primeiro", "Bom começo", date!(2025 - 06 - 01), &conn)
            .unwrap();

        assert_eq!(badge.user_id, user.id);
        assert_eq!(badge.name, "Primeiro");
        assert_eq!(badge.earned_on, date!(2025 - 06 - 01));
        assert_eq!(get_badge(badge.id, &conn), Ok(badge));
    }

    #[test]
    fn insert_fails_for_missing_user() {
        let conn = get_test_connection();

        let result = insert_badge(UserID::new(9), "x", "y", date!(2025 - 06 - 01), &conn);

        assert_eq!(result, Err(Error::UserNotFound));
    }

    #[test]
    fn get_missing_badge_is_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_badge(3, &conn), Err(Error::NotFound));
    }

    #[test]
    fn lists_badges_by_user() {
        let conn = get_test_connection();
        let ana = create_test_user("ana@example.com", 100.0, &conn);
        let bruno = create_test_user("bruno@example.com", 100.0, &conn);
        let first = insert_badge(ana.id, "a", "a", date!(2025 - 06 - 01), &conn).unwrap();
        let second = insert_badge(bruno.id, "b", "b", date!(2025 - 06 - 02), &conn).unwrap();

        assert_eq!(get_badges_by_user(ana.id, &conn), Ok(vec![first.clone()]));
        assert_eq!(get_all_badges(&conn), Ok(vec![first, second]));
    }

    #[test]
    fn has_badge_ignores_case() {
        let conn = get_test_connection();
        let ana = create_test_user("ana@example.com", 100.0, &conn);
        let bruno = create_test_user("bruno@example.com", 100.0, &conn);
        insert_badge(ana.id, "7 dias sem apostar", "", date!(2025 - 06 - 01), &conn).unwrap();

        assert_eq!(has_badge(ana.id, "7 DIAS SEM APOSTAR", &conn), Ok(true));
        assert_eq!(has_badge(ana.id, "30 dias sem apostar", &conn), Ok(false));
        assert_eq!(has_badge(bruno.id, "7 dias sem apostar", &conn), Ok(false));
    }

    #[test]
    fn response_uses_wire_names() {
        let conn = get_test_connection();
        let user = create_test_user("ana@example.com", 100.0, &conn);
        let badge = insert_badge(user.id, "n", "d", date!(2025 - 06 - 01), &conn).unwrap();

        let json = serde_json::to_value(BadgeResponse::from(&badge)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": badge.id,
                "nome": "n",
                "descricao": "d",
                "dataConquista": "2025-06-01",
                "userId": user.id.as_i64(),
            })
        );
    }
}
