use steel::*;
use super::AccountType;
use crate::consts::*;
use crate::error::SaleError;
use crate::math::{CoinQuote, PoolRef, RateSource};

/// Registered payment coin. `id` and `decimals` never change after the first
/// registration; rate mode, rate and pool may be updated.
/// PDA seeds: ["coin", sale, mint]
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CoinConfig {
    pub sale: Pubkey,
    pub mint: Pubkey,
    pub pool_coin_vault: Pubkey,        // Pool side holding this coin
    pub pool_anchor_vault: Pubkey,      // Pool side holding the anchor coin

    pub fixed_rate: u64,                // Price of one sale token over RATE_DENOMINATOR
    pub id: u16,
    pub decimals: u8,
    pub rate_mode: u8,                  // RATE_MODE_FIXED or RATE_MODE_POOL

    pub bump: u8,
    _padding: [u8; 3],
}

impl CoinConfig {
    pub fn is_native(&self) -> bool {
        self.id == NATIVE_COIN_ID
    }

    pub fn rate_source(&self) -> Result<RateSource, SaleError> {
        match self.rate_mode {
            RATE_MODE_FIXED => Ok(RateSource::Fixed { rate: self.fixed_rate }),
            RATE_MODE_POOL => Ok(RateSource::PoolDerived {
                pool: PoolRef {
                    coin_vault: self.pool_coin_vault,
                    anchor_vault: self.pool_anchor_vault,
                },
            }),
            _ => Err(SaleError::InvalidRate),
        }
    }

    pub fn quote_view(&self) -> Result<CoinQuote, SaleError> {
        Ok(CoinQuote {
            coin_id: self.id,
            decimals: self.decimals,
            source: self.rate_source()?,
        })
    }
}

account!(AccountType, CoinConfig);
