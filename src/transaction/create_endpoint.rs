//! Defines the endpoint for recording a new transaction.

use axum::{Extension, Json, extract::State};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    auth::require_same_user,
    badge::award_milestone_badges,
    db::lock_connection,
    extract::JsonBody,
    transaction::{
        NewTransaction, Transaction, TransactionKind, TransactionResponse, TransactionState,
        apply_transaction,
        betting_limit::{BET_COOLDOWN, BetScreening, screen_bet},
        insert_transaction,
    },
    user::{UserID, get_user_by_id, set_bet_cooldown, update_user_progress},
};

/// The data a client sends to record a transaction.
///
/// Fields are optional so that missing fields produce a descriptive error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionForm {
    /// How much money moved.
    #[serde(rename = "valor")]
    pub amount: Option<f64>,
    /// "APOSTA", "INVESTIMENTO" or "RETORNO", in any case.
    #[serde(rename = "tipo")]
    pub kind: Option<String>,
    /// The user making the transaction.
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
}

/// A route handler for recording a transaction for the authenticated user.
///
/// # Errors
///
/// Responds with 400 if the form is invalid, the user does not exist, or the
/// bet was refused, and 401 if the form is for another user.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(auth_user_id): Extension<UserID>,
    JsonBody(form): JsonBody<TransactionForm>,
) -> Result<Json<TransactionResponse>, Error> {
    let mut connection = lock_connection(&state.db_connection)?;
    let transaction =
        record_transaction(form, auth_user_id, OffsetDateTime::now_utc(), &mut connection)?;

    Ok(Json(TransactionResponse::from(&transaction)))
}

/// Validate and save a transaction made at `now`, updating the user's progress.
///
/// Bets are screened against the user's balance and cooldown first. A refused
/// bet starts a cooldown, which is saved even though an error is returned.
/// The user's progress, any new badges and the transaction are saved together.
///
/// # Errors
///
/// Returns a:
/// - [Error::InvalidField] or [Error::InvalidTransactionKind] if the form is invalid,
/// - [Error::UserNotFound] if the form's user does not exist,
/// - [Error::Unauthorized] if the form's user is not `auth_user_id`,
/// - [Error::BetCooldown] or [Error::BetLimitExceeded] if the bet was refused,
/// - or [Error::SqlError] if there is some SQL error.
pub fn record_transaction(
    form: TransactionForm,
    auth_user_id: UserID,
    now: OffsetDateTime,
    connection: &mut Connection,
) -> Result<Transaction, Error> {
    let (amount, kind, user_id) = validate_form(form)?;

    let mut user = match get_user_by_id(user_id, connection) {
        Ok(user) => user,
        Err(Error::NotFound) => return Err(Error::UserNotFound),
        Err(error) => return Err(error),
    };

    require_same_user(user.id, auth_user_id)?;

    if kind == TransactionKind::Bet {
        match screen_bet(amount, user.balance, user.bet_cooldown_until, now) {
            BetScreening::CoolingDown { minutes_left } => {
                tracing::info!("Refused bet from user {} during cooldown", user.id);
                return Err(Error::BetCooldown(minutes_left));
            }
            BetScreening::Refused(breach) => {
                set_bet_cooldown(user.id, Some(now + BET_COOLDOWN), connection)?;
                tracing::info!(
                    "Refused bet of {:.2} from user {} ({:.1}% of balance)",
                    breach.amount,
                    user.id,
                    breach.share * 100.0
                );
                return Err(Error::BetLimitExceeded(breach));
            }
            BetScreening::Allowed { clear_cooldown } => {
                if clear_cooldown {
                    set_bet_cooldown(user.id, None, connection)?;
                    user.bet_cooldown_until = None;
                }
            }
        }
    }

    let sql_transaction = connection.transaction()?;

    apply_transaction(&mut user, kind, amount);
    update_user_progress(&user, &sql_transaction)?;
    let new_badges =
        award_milestone_badges(&user, now.to_offset(UtcOffset::UTC).date(), &sql_transaction)?;
    if !new_badges.is_empty() {
        tracing::debug!(
            "Transaction earned user {} {} new badge(s)",
            user.id,
            new_badges.len()
        );
    }
    let transaction = insert_transaction(
        NewTransaction {
            user_id: user.id,
            amount,
            kind,
            date: now,
        },
        &sql_transaction,
    )?;

    sql_transaction.commit()?;

    Ok(transaction)
}

fn validate_form(form: TransactionForm) -> Result<(f64, TransactionKind, UserID), Error> {
    let amount = match form.amount {
        Some(amount) if amount.is_finite() && amount > 0.0 => amount,
        Some(_) => {
            return Err(Error::InvalidField(
                "valor must be a number greater than zero".to_owned(),
            ));
        }
        None => return Err(Error::InvalidField("valor is required".to_owned())),
    };

    let kind = form
        .kind
        .ok_or_else(|| Error::InvalidField("tipo is required".to_owned()))?
        .parse()?;

    let user_id = form
        .user_id
        .map(UserID::new)
        .ok_or_else(|| Error::InvalidField("userId is required".to_owned()))?;

    Ok((amount, kind, user_id))
}

#[cfg(test)]
mod record_transaction_tests {
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime, macros::datetime};

    use crate::{
        Error,
        badge::get_badges_by_user,
        test_utils::{create_test_user, get_test_connection},
        transaction::{
            BetLimitBreach, TransactionKind, betting_limit::BET_COOLDOWN,
            get_transactions_by_user,
        },
        user::{User, get_user_by_id, set_bet_cooldown},
    };

    use super::{TransactionForm, record_transaction};

    const NOW: OffsetDateTime = datetime!(2025-05-20 18:00:00 UTC);

    fn form(user: &User, amount: f64, kind: &str) -> TransactionForm {
        TransactionForm {
            amount: Some(amount),
            kind: Some(kind.to_owned()),
            user_id: Some(user.id.as_i64()),
        }
    }

    fn setup() -> (Connection, User) {
        let conn = get_test_connection();
        let user = create_test_user("ana@example.com", 1000.0, &conn);

        (conn, user)
    }

    #[test]
    fn records_investment() {
        let (mut conn, user) = setup();

        let transaction =
            record_transaction(form(&user, 100.0, "investimento"), user.id, NOW, &mut conn)
                .unwrap();

        assert_eq!(transaction.kind, TransactionKind::Investment);
        assert_eq!(transaction.amount, 100.0);
        assert_eq!(transaction.date, NOW);
        assert_eq!(transaction.status, "REALIZADA");
        let user = get_user_by_id(user.id, &conn).unwrap();
        assert_eq!(user.balance, 1000.0);
        assert_eq!(user.xp, 15);
        assert_eq!(user.days_without_betting, 1);
    }

    #[test]
    fn records_bet_within_limit() {
        let (mut conn, user) = setup();
        record_transaction(form(&user, 10.0, "RETORNO"), user.id, NOW, &mut conn).unwrap();

        record_transaction(form(&user, 200.0, "APOSTA"), user.id, NOW, &mut conn).unwrap();

        let user = get_user_by_id(user.id, &conn).unwrap();
        assert_eq!(user.balance, 810.0);
        assert_eq!(user.days_without_betting, 0);
        assert_eq!(user.xp, 10);
        assert_eq!(get_transactions_by_user(user.id, &conn).unwrap().len(), 2);
    }

    #[test]
    fn refused_bet_starts_cooldown_and_is_not_saved() {
        let (mut conn, user) = setup();

        let result = record_transaction(form(&user, 300.0, "APOSTA"), user.id, NOW, &mut conn);

        assert_eq!(
            result,
            Err(Error::BetLimitExceeded(BetLimitBreach {
                amount: 300.0,
                share: 0.3
            }))
        );
        let user = get_user_by_id(user.id, &conn).unwrap();
        assert_eq!(user.bet_cooldown_until, Some(NOW + BET_COOLDOWN));
        assert_eq!(user.balance, 1000.0);
        assert!(get_transactions_by_user(user.id, &conn).unwrap().is_empty());
    }

    #[test]
    fn bets_are_refused_during_cooldown() {
        let (mut conn, user) = setup();
        set_bet_cooldown(user.id, Some(NOW + Duration::minutes(3)), &conn).unwrap();

        let result = record_transaction(form(&user, 1.0, "APOSTA"), user.id, NOW, &mut conn);

        assert_eq!(result, Err(Error::BetCooldown(4)));
    }

    #[test]
    fn other_kinds_are_allowed_during_cooldown() {
        let (mut conn, user) = setup();
        set_bet_cooldown(user.id, Some(NOW + Duration::minutes(3)), &conn).unwrap();

        let result = record_transaction(form(&user, 50.0, "INVESTIMENTO"), user.id, NOW, &mut conn);

        assert!(result.is_ok(), "got {result:?}");
    }

    #[test]
    fn expired_cooldown_is_cleared() {
        let (mut conn, user) = setup();
        set_bet_cooldown(user.id, Some(NOW - Duration::minutes(1)), &conn).unwrap();

        record_transaction(form(&user, 1.0, "APOSTA"), user.id, NOW, &mut conn).unwrap();

        let user = get_user_by_id(user.id, &conn).unwrap();
        assert_eq!(user.bet_cooldown_until, None);
    }

    #[test]
    fn seventh_day_earns_badge() {
        let (mut conn, user) = setup();

        for day in 0..7 {
            record_transaction(
                form(&user, 5.0, "RETORNO"),
                user.id,
                NOW + Duration::days(day),
                &mut conn,
            )
            .unwrap();
        }

        let badges = get_badges_by_user(user.id, &conn).unwrap();
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].name, "7 dias sem apostar");
        assert_eq!(badges[0].earned_on, (NOW + Duration::days(6)).date());
    }

    #[test]
    fn missing_user_is_rejected() {
        let (mut conn, user) = setup();

        let result = record_transaction(
            TransactionForm {
                user_id: Some(999),
                ..form(&user, 10.0, "RETORNO")
            },
            user.id,
            NOW,
            &mut conn,
        );

        assert_eq!(result, Err(Error::UserNotFound));
    }

    #[test]
    fn transaction_for_other_user_is_unauthorized() {
        let (mut conn, user) = setup();
        let other = create_test_user("bruno@example.com", 1000.0, &conn);

        let result = record_transaction(form(&other, 10.0, "RETORNO"), user.id, NOW, &mut conn);

        assert_eq!(result, Err(Error::Unauthorized));
    }

    #[test]
    fn invalid_forms_are_rejected() {
        let (mut conn, user) = setup();
        let cases = [
            (
                TransactionForm {
                    amount: None,
                    ..form(&user, 1.0, "RETORNO")
                },
                "missing amount",
            ),
            (form(&user, 0.0, "RETORNO"), "zero amount"),
            (form(&user, -5.0, "RETORNO"), "negative amount"),
            (form(&user, f64::NAN, "RETORNO"), "NaN amount"),
            (
                TransactionForm {
                    kind: None,
                    ..form(&user, 1.0, "RETORNO")
                },
                "missing kind",
            ),
            (
                TransactionForm {
                    user_id: None,
                    ..form(&user, 1.0, "RETORNO")
                },
                "missing user",
            ),
        ];

        for (case, description) in cases {
            let result = record_transaction(case, user.id, NOW, &mut conn);

            assert!(
                matches!(result, Err(Error::InvalidField(_))),
                "want invalid field error for {description}, got {result:?}"
            );
        }

        assert_eq!(
            record_transaction(form(&user, 1.0, "SAQUE"), user.id, NOW, &mut conn),
            Err(Error::InvalidTransactionKind("SAQUE".to_owned()))
        );
    }
}
