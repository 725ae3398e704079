//! How a transaction changes the user's balance, XP and streak.

use crate::{transaction::TransactionKind, user::User};

/// XP for every transaction that is not a bet.
pub const NON_BET_XP: i64 = 10;

/// Extra XP for an investment.
pub const INVESTMENT_XP: i64 = 5;

/// Apply the effects of a transaction of `kind` and `amount` to `user`.
///
/// A bet takes the amount from the balance and resets the streak. A return
/// adds the amount to the balance. Anything that is not a bet extends the
/// streak by one and earns [NON_BET_XP], and investments earn an extra
/// [INVESTMENT_XP].
pub fn apply_transaction(user: &mut User, kind: TransactionKind, amount: f64) {
    match kind {
        TransactionKind::Bet => {
            user.balance -= amount;
            user.days_without_betting = 0;
        }
        TransactionKind::Investment => {
            user.xp += INVESTMENT_XP;
        }
        TransactionKind::Return => {
            user.balance += amount;
        }
    }

    if kind != TransactionKind::Bet {
        user.days_without_betting += 1;
        user.xp += NON_BET_XP;
    }
}
