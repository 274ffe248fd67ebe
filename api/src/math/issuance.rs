use super::{mul_div, to_canonical};
use crate::consts::*;
use crate::error::SaleError;

/// Share of a base amount, in basis points, floored.
pub fn bps_of(amount: u128, bps: u64) -> Result<u128, SaleError> {
    mul_div(amount, bps as u128, BPS as u128)
}

/// Global sold counter and cap. `total_sold` is kept in post-overhead units,
/// so the cap check is a plain `total_sold <= cap`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IssuanceLedger {
    pub total_sold: u128,
    pub cap: u128,
    pub overhead_bps: u64,
}

impl IssuanceLedger {
    pub fn new(total_sold: u128, cap: u128, overhead_bps: u64) -> Self {
        Self { total_sold, cap, overhead_bps }
    }

    pub fn remaining(&self) -> u128 {
        self.cap.saturating_sub(self.total_sold)
    }

    /// Capacity a purchase of `base` consumes: the buyer amount plus the
    /// referral overhead reserved on top of it.
    pub fn reservation(&self, base: u128) -> Result<u128, SaleError> {
        let overhead = bps_of(base, self.overhead_bps)?;
        base.checked_add(overhead).ok_or(SaleError::MathOverflow)
    }

    /// Verifies a purchase of `base` fits under the cap without touching the
    /// counter. Returns the reservation size.
    pub fn check(&self, base: u128) -> Result<u128, SaleError> {
        let reservation = self.reservation(base)?;
        self.check_exact(reservation)?;
        Ok(reservation)
    }

    pub fn reserve(&mut self, base: u128) -> Result<u128, SaleError> {
        let reservation = self.check(base)?;
        self.total_sold = self.total_sold.checked_add(reservation).ok_or(SaleError::MathOverflow)?;
        Ok(reservation)
    }

    /// Commits an amount that already carries its overhead.
    pub fn reserve_exact(&mut self, amount: u128) -> Result<(), SaleError> {
        self.check_exact(amount)?;
        self.total_sold = self.total_sold.checked_add(amount).ok_or(SaleError::MathOverflow)?;
        Ok(())
    }

    /// Commits a settled purchase counted in sale-mint units, overhead
    /// included, so the sold counter moves by exactly what gets minted.
    /// Returns the canonical amount reserved.
    pub fn reserve_minted(&mut self, units: u128, decimals: u8) -> Result<u128, SaleError> {
        let amount = to_canonical(units, decimals)?;
        self.reserve_exact(amount)?;
        Ok(amount)
    }

    /// Reserves every entry of a presale batch or none of them.
    pub fn reserve_presale(
        &mut self,
        shares: &PresaleShares,
        amounts: &[u128],
    ) -> Result<Vec<PresaleAllocation>, SaleError> {
        let mut staged = *self;
        let mut allocations = Vec::with_capacity(amounts.len());

        for amount in amounts {
            if *amount == 0 {
                return Err(SaleError::AmountRequired);
            }
            let allocation = shares.split(*amount)?;
            staged.reserve_exact(allocation.total()?)?;
            allocations.push(allocation);
        }

        *self = staged;
        Ok(allocations)
    }

    fn check_exact(&self, amount: u128) -> Result<(), SaleError> {
        let next = self
            .total_sold
            .checked_add(amount)
            .ok_or(SaleError::MathOverflow)?;
        if next > self.cap {
            return Err(SaleError::SaleCapExceeded);
        }
        Ok(())
    }
}

/// Treasury shares loaded alongside every presale beneficiary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresaleShares {
    pub team_bps: u16,
    pub foundation_bps: u16,
}

impl Default for PresaleShares {
    fn default() -> Self {
        Self {
            team_bps: PRESALE_TEAM_BPS,
            foundation_bps: PRESALE_FOUNDATION_BPS,
        }
    }
}

impl PresaleShares {
    pub fn split(&self, amount: u128) -> Result<PresaleAllocation, SaleError> {
        Ok(PresaleAllocation {
            beneficiary: amount,
            team: bps_of(amount, self.team_bps as u64)?,
            foundation: bps_of(amount, self.foundation_bps as u64)?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresaleAllocation {
    pub beneficiary: u128,
    pub team: u128,
    pub foundation: u128,
}

impl PresaleAllocation {
    pub fn total(&self) -> Result<u128, SaleError> {
        self.beneficiary
            .checked_add(self.team)
            .and_then(|v| v.checked_add(self.foundation))
            .ok_or(SaleError::MathOverflow)
    }
}
