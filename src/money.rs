//! Money formatting
//!
//! Simulation results carry plain decimal amounts in major units. These helpers turn them into
//! currency-formatted strings for display.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};

/// Convert a major-unit decimal amount into [`Money`] in the given currency.
///
/// The amount is rounded half away from zero to the currency's minor unit. Returns `None` if the
/// amount does not fit in `i64` minor units.
pub fn to_money(amount: Decimal, currency: &'static Currency) -> Option<Money<'static, Currency>> {
    let mut rounded =
        amount.round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero);

    rounded.rescale(currency.exponent);

    let minor = rounded.mantissa().to_i64()?;

    Some(Money::from_minor(minor, currency))
}

/// Format a major-unit decimal amount in the given currency.
///
/// Amounts too large to represent as money fall back to the plain decimal followed by the ISO code.
pub fn format_amount(amount: Decimal, currency: &'static Currency) -> String {
    to_money(amount, currency).map_or_else(
        || format!("{} {}", amount.normalize(), currency.iso_alpha_code),
        |money| format!("{money}"),
    )
}

/// Format a percent-point value, e.g. `15` or `12.5`, without a trailing `%`.
pub fn format_percent_points(points: Decimal) -> String {
    points.round_dp(2).normalize().to_string()
}
