use steel::*;
use super::{to_canonical, U256};
use crate::error::SaleError;

/// Vault pair of an external AMM pool quoting a coin against the anchor coin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolRef {
    pub coin_vault: Pubkey,
    pub anchor_vault: Pubkey,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateSource {
    Fixed { rate: u64 },
    PoolDerived { pool: PoolRef },
}

/// Raw reserves of a pool at the time of the read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolReserves {
    pub coin: u64,
    pub coin_decimals: u8,
    pub anchor: u64,
    pub anchor_decimals: u8,
}

impl PoolReserves {
    /// Spot price as canonical `(coin, anchor)` reserves: `coin / anchor`
    /// coin units buy one anchor unit.
    pub fn spot_price(&self) -> Result<(u128, u128), SaleError> {
        let coin = to_canonical(self.coin as u128, self.coin_decimals)?;
        let anchor = to_canonical(self.anchor as u128, self.anchor_decimals)?;
        if coin == 0 || anchor == 0 {
            return Err(SaleError::PoolUnavailable);
        }
        Ok((coin, anchor))
    }
}

/// Live reserve lookup. Implementations must not have side effects.
pub trait PoolReader {
    fn reserves(&self, pool: &PoolRef) -> Option<PoolReserves>;
}

/// Pool reader for coins that never consult a pool.
pub struct NoPools;

impl PoolReader for NoPools {
    fn reserves(&self, _pool: &PoolRef) -> Option<PoolReserves> {
        None
    }
}

/// Price of one sale token in canonical payment units, scaled by
/// `RATE_DENOMINATOR`, kept as an unreduced fraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExchangeRate {
    pub numerator: U256,
    pub denominator: U256,
}

impl ExchangeRate {
    pub fn fixed(rate: u64) -> Self {
        Self {
            numerator: U256::from(rate),
            denominator: U256::one(),
        }
    }
}

/// Resolves the rate a coin trades at right now.
///
/// Pool-derived coins compose the anchor's fixed rate with the pool's spot
/// price: `anchor_rate * coin_reserve / anchor_reserve`. The division is
/// left to the quote so no precision is lost here.
pub fn effective_rate<P: PoolReader>(
    source: &RateSource,
    anchor_rate: u64,
    pools: &P,
) -> Result<ExchangeRate, SaleError> {
    match source {
        RateSource::Fixed { rate } => {
            if *rate == 0 {
                return Err(SaleError::InvalidRate);
            }
            Ok(ExchangeRate::fixed(*rate))
        }
        RateSource::PoolDerived { pool } => {
            if anchor_rate == 0 {
                return Err(SaleError::InvalidRate);
            }

            let reserves = pools.reserves(pool).ok_or(SaleError::PoolUnavailable)?;
            let (coin, anchor) = reserves.spot_price()?;

            let numerator = U256::from(anchor_rate)
                .checked_mul(U256::from(coin))
                .ok_or(SaleError::MathOverflow)?;

            Ok(ExchangeRate {
                numerator,
                denominator: U256::from(anchor),
            })
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct MockPools {
        pub pools: HashMap<Pubkey, PoolReserves>,
    }

    impl MockPools {
        pub fn with(mut self, pool: &PoolRef, reserves: PoolReserves) -> Self {
            self.pools.insert(pool.coin_vault, reserves);
            self
        }
    }

    impl PoolReader for MockPools {
        fn reserves(&self, pool: &PoolRef) -> Option<PoolReserves> {
            self.pools.get(&pool.coin_vault).copied()
        }
    }

    pub fn pool_ref() -> PoolRef {
        PoolRef {
            coin_vault: Pubkey::new_unique(),
            anchor_vault: Pubkey::new_unique(),
        }
    }

    #[test]
    fn test_fixed_rate_passes_through() {
        let rate = effective_rate(&RateSource::Fixed { rate: 1100 }, 0, &NoPools).unwrap();
        assert_eq!(rate.numerator, U256::from(1100u64));
        assert_eq!(rate.denominator, U256::one());
    }

    #[test]
    fn test_zero_fixed_rate_is_invalid() {
        let res = effective_rate(&RateSource::Fixed { rate: 0 }, 1100, &NoPools);
        assert_eq!(res, Err(SaleError::InvalidRate));
    }

    #[test]
    fn test_pool_rate_composes_with_anchor() {
        // 101 USDC (6 decimals) against 100 anchor (9 decimals)
        let pool = pool_ref();
        let pools = MockPools::default().with(&pool, PoolReserves {
            coin: 101_000_000,
            coin_decimals: 6,
            anchor: 100_000_000_000,
            anchor_decimals: 9,
        });

        let rate = effective_rate(&RateSource::PoolDerived { pool }, 1100, &pools).unwrap();

        // 1100 * 101 / 100 = 1111 coin units (over 10_000) per sale token
        assert_eq!(rate.numerator / rate.denominator, U256::from(1111u64));
        assert_eq!(rate.numerator % rate.denominator, U256::zero());
    }

    #[test]
    fn test_missing_or_empty_pool_fails() {
        let pool = pool_ref();
        let source = RateSource::PoolDerived { pool };

        assert_eq!(effective_rate(&source, 1100, &NoPools), Err(SaleError::PoolUnavailable));

        let empty = MockPools::default().with(&pool, PoolReserves {
            coin: 0,
            coin_decimals: 6,
            anchor: 1_000,
            anchor_decimals: 6,
        });
        assert_eq!(effective_rate(&source, 1100, &empty), Err(SaleError::PoolUnavailable));
    }
}
