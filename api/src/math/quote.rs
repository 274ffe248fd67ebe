use super::*;
use crate::consts::*;
use crate::error::SaleError;

/// Pricing view of a registered coin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoinQuote {
    pub coin_id: u16,
    pub decimals: u8,
    pub source: RateSource,
}

/// Both sides of an accepted quote. `sale_amount` is canonical, the payment
/// is in the coin's own smallest units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quote {
    pub coin_id: u16,
    pub sale_amount: u128,
    pub payment_amount: u128,
}

impl Quote {
    /// The side the caller asked for: sale tokens for an exact input,
    /// payment for an exact output.
    pub fn quoted(&self, exact_output: bool) -> u128 {
        if exact_output {
            self.payment_amount
        } else {
            self.sale_amount
        }
    }
}

/// `to_canonical(payment) * RATE_DENOMINATOR * den / num`
pub fn forward_quote(rate: &ExchangeRate, decimals: u8, payment: u128) -> Result<u128, SaleError> {
    if rate.numerator.is_zero() || rate.denominator.is_zero() {
        return Err(SaleError::InvalidRate);
    }
    let canonical = to_canonical(payment, decimals)?;
    let scaled = U256::from(canonical)
        .checked_mul(U256::from(RATE_DENOMINATOR))
        .and_then(|v| v.checked_mul(rate.denominator))
        .ok_or(SaleError::MathOverflow)?;
    narrow(scaled / rate.numerator)
}

/// `from_canonical(sale * num / (RATE_DENOMINATOR * den))`
pub fn reverse_quote(rate: &ExchangeRate, decimals: u8, sale: u128) -> Result<u128, SaleError> {
    if rate.numerator.is_zero() || rate.denominator.is_zero() {
        return Err(SaleError::InvalidRate);
    }
    let scaled = U256::from(sale)
        .checked_mul(rate.numerator)
        .ok_or(SaleError::MathOverflow)?;
    let divisor = rate
        .denominator
        .checked_mul(U256::from(RATE_DENOMINATOR))
        .ok_or(SaleError::MathOverflow)?;
    from_canonical(narrow(scaled / divisor)?, decimals)
}

/// Quotes against the live rate and the remaining cap.
pub struct QuoteEngine<'a, P: PoolReader> {
    pub ledger: &'a IssuanceLedger,
    pub anchor_rate: u64,
    pub pools: &'a P,
}

impl<'a, P: PoolReader> QuoteEngine<'a, P> {
    pub fn new(ledger: &'a IssuanceLedger, anchor_rate: u64, pools: &'a P) -> Self {
        Self { ledger, anchor_rate, pools }
    }

    /// Quote for a mutating purchase. `amount` is the payment in coin units,
    /// or the canonical sale amount when `exact_output` is set.
    pub fn execute(
        &self,
        coin: Option<&CoinQuote>,
        amount: u128,
        exact_output: bool,
    ) -> Result<Quote, SaleError> {
        if amount == 0 {
            return Err(SaleError::AmountRequired);
        }
        let coin = coin.ok_or(SaleError::CoinNotAllowed)?;
        let rate = effective_rate(&coin.source, self.anchor_rate, self.pools)?;

        let (sale_amount, payment_amount) = if exact_output {
            (amount, reverse_quote(&rate, coin.decimals, amount)?)
        } else {
            (forward_quote(&rate, coin.decimals, amount)?, amount)
        };

        if sale_amount == 0 || payment_amount == 0 {
            return Err(SaleError::ZeroQuote);
        }
        self.ledger.check(sale_amount)?;

        Ok(Quote {
            coin_id: coin.coin_id,
            sale_amount,
            payment_amount,
        })
    }

    /// Non-failing variant for front-ends: `(quote, coin_id)`, with a zero
    /// quote whenever `execute` would fail.
    pub fn preview(&self, coin: Option<&CoinQuote>, amount: u128, exact_output: bool) -> (u128, u16) {
        let coin_id = coin.map(|c| c.coin_id).unwrap_or_default();
        match self.execute(coin, amount, exact_output) {
            Ok(quote) => (quote.quoted(exact_output), coin_id),
            Err(_) => (0, coin_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::rate::tests::{pool_ref, MockPools};

    const TOKEN: u128 = 1_000_000_000_000_000_000;

    fn fixed(coin_id: u16, decimals: u8, rate: u64) -> CoinQuote {
        CoinQuote {
            coin_id,
            decimals,
            source: RateSource::Fixed { rate },
        }
    }

    fn open_ledger() -> IssuanceLedger {
        IssuanceLedger::new(0, DEFAULT_SALE_CAP, 900)
    }

    #[test]
    fn test_one_unit_at_rate_1100_buys_nine() {
        let ledger = open_ledger();
        let engine = QuoteEngine::new(&ledger, 1100, &NoPools);
        let anchor = fixed(1, 18, 1100);

        let quote = engine.execute(Some(&anchor), 1, false).unwrap();
        assert_eq!(quote.sale_amount, 9);
        assert_eq!(quote.payment_amount, 1);
        assert_eq!(engine.preview(Some(&anchor), 10, false), (90, 1));
    }

    #[test]
    fn test_reverse_quote_prices_the_sale_amount() {
        let ledger = open_ledger();
        let engine = QuoteEngine::new(&ledger, 1100, &NoPools);
        let anchor = fixed(1, 18, 1100);

        // 100 sale tokens at 0.11 each
        let quote = engine.execute(Some(&anchor), 100 * TOKEN, true).unwrap();
        assert_eq!(quote.payment_amount, 11 * TOKEN);
        assert_eq!(quote.sale_amount, 100 * TOKEN);

        // 8 decimal coin at 0.275
        let usdy = fixed(2, 8, 2750);
        let quote = engine.execute(Some(&usdy), 100 * TOKEN, true).unwrap();
        assert_eq!(quote.payment_amount, 2_750_000_000);
    }

    #[test]
    fn test_unregistered_coin() {
        let ledger = open_ledger();
        let engine = QuoteEngine::new(&ledger, 1100, &NoPools);

        assert_eq!(engine.preview(None, 1_000, false), (0, 0));
        assert_eq!(engine.execute(None, 1_000, false), Err(SaleError::CoinNotAllowed));
    }

    #[test]
    fn test_zero_amount_and_zero_quote() {
        let ledger = open_ledger();
        let engine = QuoteEngine::new(&ledger, 1100, &NoPools);
        let anchor = fixed(1, 18, 1100);

        assert_eq!(engine.execute(Some(&anchor), 0, false), Err(SaleError::AmountRequired));
        assert_eq!(engine.preview(Some(&anchor), 0, false), (0, 1));

        // 9 canonical sale units cost less than one smallest unit of a 6 decimal coin
        let usdc = fixed(3, 6, 1100);
        assert_eq!(engine.execute(Some(&usdc), 9, true), Err(SaleError::ZeroQuote));
    }

    #[test]
    fn test_cap_breach_previews_zero_and_executes_error() {
        let ledger = IssuanceLedger::new(0, 1_090 * TOKEN, 900);
        let engine = QuoteEngine::new(&ledger, 1100, &NoPools);
        let anchor = fixed(1, 18, 1100);

        // 110 anchor buys exactly 1000 sale tokens, reserving 1090
        assert_eq!(engine.preview(Some(&anchor), 110 * TOKEN, false), (1_000 * TOKEN, 1));
        assert_eq!(engine.preview(Some(&anchor), 111 * TOKEN, false), (0, 1));
        assert_eq!(
            engine.execute(Some(&anchor), 111 * TOKEN, false),
            Err(SaleError::SaleCapExceeded)
        );
    }

    #[test]
    fn test_pool_derived_quotes() {
        let pool = pool_ref();
        let pools = MockPools::default().with(&pool, PoolReserves {
            coin: 101_000_000,
            coin_decimals: 6,
            anchor: 100_000_000_000,
            anchor_decimals: 9,
        });
        let ledger = open_ledger();
        let engine = QuoteEngine::new(&ledger, 1100, &pools);
        let usdc = CoinQuote {
            coin_id: 2,
            decimals: 6,
            source: RateSource::PoolDerived { pool },
        };

        // 1 USDC unit at 0.1111 per sale token
        let quote = engine.execute(Some(&usdc), 1, false).unwrap();
        assert_eq!(quote.sale_amount, 9_000_900_090_009);

        let quote = engine.execute(Some(&usdc), 1_000 * TOKEN, true).unwrap();
        assert_eq!(quote.payment_amount, 111_100_000);
    }

    #[test]
    fn test_empty_pool_previews_zero() {
        let pool = pool_ref();
        let ledger = open_ledger();
        let engine = QuoteEngine::new(&ledger, 1100, &NoPools);
        let coin = CoinQuote {
            coin_id: 4,
            decimals: 8,
            source: RateSource::PoolDerived { pool },
        };

        assert_eq!(engine.preview(Some(&coin), 1_000, false), (0, 4));
        assert_eq!(engine.execute(Some(&coin), 1_000, false), Err(SaleError::PoolUnavailable));
    }

    #[test]
    fn test_round_trip_within_one_unit() {
        let cases = [
            (18u8, RateSource::Fixed { rate: 1100 }),
            (8, RateSource::Fixed { rate: 2750 }),
            (6, RateSource::Fixed { rate: 1100 }),
            (9, RateSource::Fixed { rate: 4 }),
        ];

        for (decimals, source) in cases {
            let rate = effective_rate(&source, 1100, &NoPools).unwrap();
            for payment in [1u128, 10, 999, 123_456_789, 10u128.pow(decimals as u32)] {
                let sale = forward_quote(&rate, decimals, payment).unwrap();
                let back = reverse_quote(&rate, decimals, sale).unwrap();
                assert!(back <= payment && payment - back <= 1, "{} {} {}", decimals, payment, back);
            }
        }
    }
}
