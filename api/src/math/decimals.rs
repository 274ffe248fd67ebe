use crate::consts::CANONICAL_DECIMALS;
use crate::error::SaleError;

/// Power of ten separating `decimals` from the canonical precision.
pub fn decimals_factor(decimals: u8) -> Result<u128, SaleError> {
    let gap = decimals.abs_diff(CANONICAL_DECIMALS) as u32;
    10u128.checked_pow(gap).ok_or(SaleError::MathOverflow)
}

/// Scales an amount expressed with `decimals` fractional digits up (or down,
/// flooring) to canonical precision.
pub fn to_canonical(amount: u128, decimals: u8) -> Result<u128, SaleError> {
    let factor = decimals_factor(decimals)?;
    if decimals <= CANONICAL_DECIMALS {
        amount.checked_mul(factor).ok_or(SaleError::MathOverflow)
    } else {
        Ok(amount / factor)
    }
}

/// Inverse of [`to_canonical`]. Flooring happens on the side that has fewer
/// fractional digits, so a round trip never creates value.
pub fn from_canonical(amount: u128, decimals: u8) -> Result<u128, SaleError> {
    let factor = decimals_factor(decimals)?;
    if decimals <= CANONICAL_DECIMALS {
        Ok(amount / factor)
    } else {
        amount.checked_mul(factor).ok_or(SaleError::MathOverflow)
    }
}

/// Narrows a canonical-side result to an SPL amount.
pub fn to_token_amount(amount: u128) -> Result<u64, SaleError> {
    u64::try_from(amount).map_err(|_| SaleError::MathOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scales_up_short_precision() {
        assert_eq!(to_canonical(1, 6).unwrap(), 1_000_000_000_000);
        assert_eq!(to_canonical(1, 8).unwrap(), 10_000_000_000);
        assert_eq!(to_canonical(5, 18).unwrap(), 5);
        assert_eq!(from_canonical(1_999_999_999_999, 6).unwrap(), 1);
    }

    #[test]
    fn test_scales_down_long_precision() {
        // 20 decimals: two digits are dropped on the way in
        assert_eq!(to_canonical(12_345, 20).unwrap(), 123);
        assert_eq!(from_canonical(123, 20).unwrap(), 12_300);
    }

    #[test]
    fn test_round_trip_never_gains() {
        for decimals in [0u8, 6, 8, 9, 18, 20, 24] {
            for amount in [0u128, 1, 7, 999_999, 123_456_789_012] {
                let canonical = to_canonical(amount, decimals).unwrap();
                let back = from_canonical(canonical, decimals).unwrap();
                assert!(back <= amount, "decimals {} amount {}", decimals, amount);
            }
        }
    }

    #[test]
    fn test_overflow_is_reported() {
        assert_eq!(to_canonical(u128::MAX, 6), Err(SaleError::MathOverflow));
        assert_eq!(from_canonical(u128::MAX, 24), Err(SaleError::MathOverflow));
        assert_eq!(to_token_amount(u64::MAX as u128 + 1), Err(SaleError::MathOverflow));
    }
}
