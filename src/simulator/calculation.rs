//! Compares betting an amount against investing it.

use serde::{Deserialize, Serialize};

use crate::Error;

/// The monthly return used when the client does not give one (0.8% a month).
pub const DEFAULT_MONTHLY_RATE: f64 = 0.008;

/// The share of a bet assumed to be left over after betting.
pub const BET_RETAINED_SHARE: f64 = 0.10;

/// The inputs of a simulation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// The amount to bet or invest.
    #[serde(rename = "valorInicial")]
    pub initial_amount: Option<f64>,
    /// How many months to invest for.
    #[serde(rename = "meses")]
    pub months: Option<i64>,
    /// The monthly rate of return, e.g. 0.008 for 0.8%.
    #[serde(rename = "rendimentoMensal")]
    pub monthly_rate: Option<f64>,
}

/// The outcome of betting versus investing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// What is left after betting the amount.
    #[serde(rename = "resultadoApostando")]
    pub betting_result: f64,
    /// What the amount grows to after investing with compound interest.
    #[serde(rename = "resultadoInvestindo")]
    pub investing_result: f64,
}

/// Run the simulation.
///
/// Betting assumes [BET_RETAINED_SHARE] of the amount is kept. Investing
/// compounds the monthly rate, [DEFAULT_MONTHLY_RATE] if none is given, over
/// the number of months.
///
/// # Errors
/// Returns [Error::InvalidField] if the amount is missing, negative or not
/// finite, the months are missing or negative, or the investment grows beyond
/// what a floating point number can hold.
pub fn simulate(request: &SimulationRequest) -> Result<SimulationResult, Error> {
    let initial_amount = match request.initial_amount {
        Some(amount) if amount.is_finite() && amount >= 0.0 => amount,
        Some(_) => {
            return Err(Error::InvalidField(
                "valorInicial must be a number that is zero or greater".to_owned(),
            ));
        }
        None => return Err(Error::InvalidField("valorInicial is required".to_owned())),
    };

    let months = match request.months {
        Some(months) if months >= 0 => months,
        Some(_) => {
            return Err(Error::InvalidField(
                "meses must be zero or greater".to_owned(),
            ));
        }
        None => return Err(Error::InvalidField("meses is required".to_owned())),
    };

    let monthly_rate = request.monthly_rate.unwrap_or(DEFAULT_MONTHLY_RATE);

    // `powf` since the months may not fit in an `i32`.
    let investing_result = initial_amount * (1.0 + monthly_rate).powf(months as f64);
    // JSON has no infinity or NaN, serde_json would send `null`.
    if !investing_result.is_finite() {
        return Err(Error::InvalidField(
            "the investment result is too large to represent, try fewer meses or a lower \
            rendimentoMensal"
                .to_owned(),
        ));
    }

    Ok(SimulationResult {
        betting_result: initial_amount * BET_RETAINED_SHARE,
        investing_result,
    })
}
