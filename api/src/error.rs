use num_enum::IntoPrimitive;
use steel::*;
use thiserror::Error;

#[repr(u32)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error, IntoPrimitive)]
pub enum SaleError {
    #[error("Sale:amount needed")]
    AmountRequired = 0,

    #[error("Sale:Coin not allowed")]
    CoinNotAllowed = 1,

    #[error("Sale:cap exceeded")]
    SaleCapExceeded = 2,

    #[error("Sale:0 tokens")]
    ZeroQuote = 3,

    #[error("Sale:SOL needed")]
    NativeValueRequired = 4,

    #[error("Sale:SOL value mismatch")]
    NativeValueMismatch = 5,

    #[error("CrowdSale:sign incorrect")]
    SignInvalid = 6,

    #[error("Sale:insufficient payment balance")]
    AllowanceInsufficient = 7,

    #[error("Priviledgeable: caller is not the owner")]
    NotAuthorized = 8,

    #[error("Sale:math overflow")]
    MathOverflow = 9,

    #[error("Sale:pool unavailable")]
    PoolUnavailable = 10,

    #[error("Sale:invalid rate")]
    InvalidRate = 11,

    #[error("Sale:invalid presale batch")]
    InvalidBatch = 12,

    #[error("Sale:invalid referral account")]
    InvalidReferralAccount = 13,

    #[error("Priviledgeable: admin list is full")]
    AdminListFull = 14,
}

impl From<SaleError> for ProgramError {
    fn from(e: SaleError) -> Self {
        ProgramError::Custom(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_codes_are_stable() {
        assert_eq!(ProgramError::from(SaleError::AmountRequired), ProgramError::Custom(0));
        assert_eq!(ProgramError::from(SaleError::SignInvalid), ProgramError::Custom(6));
        assert_eq!(ProgramError::from(SaleError::AdminListFull), ProgramError::Custom(14));
    }

    #[test]
    fn test_messages_match_sale_reverts() {
        assert_eq!(SaleError::CoinNotAllowed.to_string(), "Sale:Coin not allowed");
        assert_eq!(SaleError::SignInvalid.to_string(), "CrowdSale:sign incorrect");
    }
}
