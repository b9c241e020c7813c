//! Minor-unit arithmetic.
//!
//! Both the native asset and the launchpad token use nine decimals: one
//! display unit is 10^9 minor units. Balances are summed in `u128` so that any
//! realistic number of `u64` coin balances adds up exactly.

use crate::error::ChainError;
use crate::types::CoinRecord;

/// Minor units per display unit (10^9).
pub const MINOR_UNITS_PER_UNIT: u64 = 1_000_000_000;

/// Minor units per displayed hundredth.
const MINOR_UNITS_PER_CENT: u128 = (MINOR_UNITS_PER_UNIT / 100) as u128;

/// Convert a display amount (e.g. `1.5` tokens) to minor units, rounding to
/// the nearest minor unit.
pub fn to_minor_units(display: f64) -> Result<u64, ChainError> {
    if !display.is_finite() || display < 0.0 {
        return Err(ChainError::InvalidAmount(display.to_string()));
    }
    let scaled = (display * MINOR_UNITS_PER_UNIT as f64).round();
    if scaled >= u64::MAX as f64 {
        return Err(ChainError::InvalidAmount(display.to_string()));
    }
    Ok(scaled as u64)
}

/// Lossy conversion back to display units, for previews only.
pub fn to_display_units(minor: u64) -> f64 {
    minor as f64 / MINOR_UNITS_PER_UNIT as f64
}

/// Exact total of a set of coin balances.
pub fn sum_balances(coins: &[CoinRecord]) -> u128 {
    coins.iter().map(|coin| u128::from(coin.balance)).sum()
}

/// Format a minor-unit total as display units with two decimals, rounding
/// half up: `1_234_567_890` -> `"1.23"`, `0` -> `"0.00"`.
pub fn format_display(minor: u128) -> String {
    let mut cents = minor / MINOR_UNITS_PER_CENT;
    if minor % MINOR_UNITS_PER_CENT >= MINOR_UNITS_PER_CENT / 2 {
        cents += 1;
    }
    format!("{}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(balance: u64) -> CoinRecord {
        CoinRecord {
            coin_object_id: format!("0x{balance:x}"),
            balance,
            digest: String::new(),
            version: 1,
        }
    }

    #[test]
    fn whole_units_convert_exactly() {
        assert_eq!(to_minor_units(1.0).unwrap(), 1_000_000_000);
        assert_eq!(to_minor_units(0.0).unwrap(), 0);
        assert_eq!(to_minor_units(250.0).unwrap(), 250_000_000_000);
    }

    #[test]
    fn fractional_units_round_to_nearest() {
        assert_eq!(to_minor_units(0.1).unwrap(), 100_000_000);
        assert_eq!(to_minor_units(1.15).unwrap(), 1_150_000_000);
        assert_eq!(to_minor_units(0.000_000_001).unwrap(), 1);
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        assert!(to_minor_units(-1.0).is_err());
        assert!(to_minor_units(f64::NAN).is_err());
        assert!(to_minor_units(f64::INFINITY).is_err());
        assert!(to_minor_units(1e20).is_err());
    }

    #[test]
    fn empty_balance_formats_as_zero() {
        assert_eq!(sum_balances(&[]), 0);
        assert_eq!(format_display(0), "0.00");
    }

    #[test]
    fn sum_is_exact_beyond_u64() {
        let coins = vec![coin(u64::MAX), coin(u64::MAX), coin(2)];
        assert_eq!(sum_balances(&coins), u128::from(u64::MAX) * 2 + 2);
    }

    #[test]
    fn formats_two_decimals_half_up() {
        assert_eq!(format_display(1_234_567_890), "1.23");
        assert_eq!(format_display(1_235_000_000), "1.24");
        assert_eq!(format_display(1_234_999_999), "1.23");
        assert_eq!(format_display(4_999_999), "0.00");
        assert_eq!(format_display(5_000_000), "0.01");
        assert_eq!(format_display(99_995_000_000), "100.00");
    }

    #[test]
    fn formats_sum_of_several_coins() {
        let coins = vec![coin(500_000_000), coin(750_000_000), coin(1)];
        assert_eq!(format_display(sum_balances(&coins)), "1.25");
    }
}
