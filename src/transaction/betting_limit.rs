//! Screens bets against the user's balance and cooldown.
//!
//! A bet larger than [MAX_BET_SHARE_OF_BALANCE] of the balance is refused and
//! starts a [BET_COOLDOWN], during which every bet is refused.

use std::fmt::Display;

use time::{Duration, OffsetDateTime};

/// The largest share of the current balance a single bet may take.
pub const MAX_BET_SHARE_OF_BALANCE: f64 = 0.2;

/// How long bets are refused after an oversized bet.
pub const BET_COOLDOWN: Duration = Duration::minutes(5);

const INVESTMENT_SUGGESTIONS: &str = "Investment suggestions:\n\
    - Tesouro Selic: daily liquidity, very low risk, returns close to 100% of the CDI\n\
    - Poupança: low returns (~0.5% a month), but easy to withdraw\n\
    - CDB from a large bank: returns more than Poupança and is covered by the FGC\n\n\
    How much would you have in a few months if you invested this amount instead? \
    Try the simulator!";

/// A bet that was refused for being too large.
#[derive(Debug, Clone, PartialEq)]
pub struct BetLimitBreach {
    /// The amount the user tried to bet.
    pub amount: f64,
    /// The bet as a share of the balance, infinite if the balance is not positive.
    pub share: f64,
}

impl Display for BetLimitBreach {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.share.is_finite() {
            write!(
                f,
                "Warning: this bet ({:.2}) is {:.1}% of your current balance.",
                self.amount,
                self.share * 100.0
            )?;
        } else {
            write!(
                f,
                "Warning: you have no balance left to cover this bet ({:.2}).",
                self.amount
            )?;
        }

        write!(
            f,
            " For your safety you cannot bet for the next {} minutes.\n\n{INVESTMENT_SUGGESTIONS}",
            BET_COOLDOWN.whole_minutes()
        )
    }
}

/// The outcome of checking a bet.
#[derive(Debug, Clone, PartialEq)]
pub enum BetScreening {
    /// The bet may go ahead.
    ///
    /// `clear_cooldown` is set when the user had a cooldown that has ended and
    /// should be removed.
    Allowed {
        /// Whether an expired cooldown should be removed.
        clear_cooldown: bool,
    },
    /// The user is still on a cooldown.
    CoolingDown {
        /// Minutes left on the cooldown, rounded up.
        minutes_left: i64,
    },
    /// The bet is too large. A new cooldown should start.
    Refused(BetLimitBreach),
}

/// Check a bet of `amount` from a user with `balance` and an optional cooldown at time `now`.
pub fn screen_bet(
    amount: f64,
    balance: f64,
    cooldown_until: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> BetScreening {
    let clear_cooldown = match cooldown_until {
        Some(cooldown_until) if cooldown_until > now => {
            return BetScreening::CoolingDown {
                minutes_left: (cooldown_until - now).whole_minutes() + 1,
            };
        }
        Some(_) => true,
        None => false,
    };

    let share = if balance > 0.0 {
        amount / balance
    } else {
        f64::INFINITY
    };

    if share > MAX_BET_SHARE_OF_BALANCE {
        BetScreening::Refused(BetLimitBreach { amount, share })
    } else {
        BetScreening::Allowed { clear_cooldown }
    }
}

#[cfg(test)]
mod tests {
    use time::{Duration, macros::datetime};

    use super::{BET_COOLDOWN, BetLimitBreach, BetScreening, screen_bet};

    #[test]
    fn allows_bet_within_limit() {
        let now = datetime!(2025-03-01 10:00:00 UTC);

        assert_eq!(
            screen_bet(200.0, 1000.0, None, now),
            BetScreening::Allowed {
                clear_cooldown: false
            }
        );
    }

    #[test]
    fn refuses_bet_over_limit() {
        let now = datetime!(2025-03-01 10:00:00 UTC);

        assert_eq!(
            screen_bet(250.0, 1000.0, None, now),
            BetScreening::Refused(BetLimitBreach {
                amount: 250.0,
                share: 0.25
            })
        );
    }

    #[test]
    fn refuses_any_bet_without_balance() {
        let now = datetime!(2025-03-01 10:00:00 UTC);

        for balance in [0.0, -50.0] {
            match screen_bet(1.0, balance, None, now) {
                BetScreening::Refused(breach) => assert!(breach.share.is_infinite()),
                other => panic!("want refused bet for balance {balance}, got {other:?}"),
            }
        }
    }

    #[test]
    fn active_cooldown_reports_minutes_rounded_up() {
        let now = datetime!(2025-03-01 10:00:00 UTC);

        assert_eq!(
            screen_bet(1.0, 1000.0, Some(now + BET_COOLDOWN), now),
            BetScreening::CoolingDown { minutes_left: 6 }
        );
        assert_eq!(
            screen_bet(1.0, 1000.0, Some(now + Duration::seconds(30)), now),
            BetScreening::CoolingDown { minutes_left: 1 }
        );
    }

    #[test]
    fn expired_cooldown_is_cleared() {
        let now = datetime!(2025-03-01 10:00:00 UTC);

        assert_eq!(
            screen_bet(1.0, 1000.0, Some(now - Duration::seconds(1)), now),
            BetScreening::Allowed {
                clear_cooldown: true
            }
        );
        assert_eq!(
            screen_bet(1.0, 1000.0, Some(now), now),
            BetScreening::Allowed {
                clear_cooldown: true
            }
        );
    }

    #[test]
    fn breach_message_shows_share_and_suggestions() {
        let message = BetLimitBreach {
            amount: 300.0,
            share: 0.3,
        }
        .to_string();

        assert!(message.contains("(300.00)"), "got {message}");
        assert!(message.contains("30.0%"), "got {message}");
        assert!(message.contains("Tesouro Selic"));
        assert!(message.contains("Poupança"));
        assert!(message.contains("CDB"));
        assert!(message.contains("simulator"));
    }

    #[test]
    fn breach_message_without_balance() {
        let message = BetLimitBreach {
            amount: 10.0,
            share: f64::INFINITY,
        }
        .to_string();

        assert!(message.contains("no balance left"), "got {message}");
        assert!(!message.contains("inf"));
    }
}
