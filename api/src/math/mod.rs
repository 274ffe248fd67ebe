// required for clippy
#![allow(clippy::assign_op_pattern)]
#![allow(clippy::ptr_offset_with_cast)]
#![allow(clippy::manual_range_contains)]

use uint::construct_uint;

construct_uint! {
    pub struct U256(4);
}

pub mod decimals;
pub mod rate;
pub mod issuance;
pub mod quote;
pub mod referral;

pub use decimals::*;
pub use rate::*;
pub use issuance::*;
pub use quote::*;
pub use referral::*;

use crate::error::SaleError;

/// Narrows a 256-bit intermediate back to the `u128` domain of the core.
pub fn narrow(value: U256) -> Result<u128, SaleError> {
    if value > U256::from(u128::MAX) {
        return Err(SaleError::MathOverflow);
    }
    Ok(value.as_u128())
}

/// `a * b / c` with a 256-bit intermediate, floored.
pub fn mul_div(a: u128, b: u128, c: u128) -> Result<u128, SaleError> {
    if c == 0 {
        return Err(SaleError::MathOverflow);
    }
    let product = U256::from(a)
        .checked_mul(U256::from(b))
        .ok_or(SaleError::MathOverflow)?;
    narrow(product / U256::from(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_keeps_wide_products() {
        // 2^127 * 6 / 3 overflows u128 before the division
        let big = 1u128 << 127;
        assert_eq!(mul_div(big, 6, 12).unwrap(), big / 2);
        assert_eq!(mul_div(7, 3, 2).unwrap(), 10);
    }

    #[test]
    fn test_mul_div_rejects_overflow_and_zero_divisor() {
        assert_eq!(mul_div(u128::MAX, 2, 1), Err(SaleError::MathOverflow));
        assert_eq!(mul_div(1, 1, 0), Err(SaleError::MathOverflow));
    }
}
