//! Badges awarded for going a number of days without betting.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    badge::{Badge, has_badge, insert_badge},
    user::User,
};

/// A streak length that earns a badge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Milestone {
    /// The number of days without betting that earns the badge.
    pub days: i64,
    /// The badge name.
    pub name: &'static str,
    /// The badge description.
    pub description: &'static str,
}

/// Every milestone, in order of streak length.
pub const MILESTONES: [Milestone; 2] = [
    Milestone {
        days: 7,
        name: "7 dias sem apostar",
        description: "Parabéns! Você ficou uma semana sem apostas.",
    },
    Milestone {
        days: 30,
        name: "30 dias sem apostar",
        description: "Incrível! Um mês sem apostas!",
    },
];

/// Award the badge for the user's current streak, if there is one and they do not have it yet.
///
/// Returns the badges that were awarded.
///
/// # Errors
/// Returns a [Error::SqlError] if there is some SQL error.
pub fn award_milestone_badges(
    user: &User,
    today: Date,
    connection: &Connection,
) -> Result<Vec<Badge>, Error> {
    let mut awarded = Vec::new();

    for milestone in MILESTONES
        .iter()
        .filter(|milestone| milestone.days == user.days_without_betting)
    {
        if has_badge(user.id, milestone.name, connection)? {
            continue;
        }

        let badge = insert_badge(
            user.id,
            milestone.name,
            milestone.description,
            today,
            connection,
        )?;
        tracing::info!("User {} earned the badge \"{}\"", user.id, badge.name);
        awarded.push(badge);
    }

    Ok(awarded)
}
