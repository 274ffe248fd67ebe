use steel::*;
use super::AccountType;
use crate::access::{Role, RoleRegistry};
use crate::consts::*;
use crate::error::SaleError;
use crate::math::{IssuanceLedger, PresaleShares, ReferralSchedule};
use crate::voucher::EthAddress;

/// Sale-wide configuration and issuance counter.
/// PDA seeds: ["sale", sale_mint]. The PDA is the sale mint authority and
/// signs the vesting ledger calls.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SaleConfig {
    pub authority: Pubkey,
    pub admins: [Pubkey; MAX_ADMINS],
    pub presale_loader: Pubkey,

    pub sale_mint: Pubkey,
    pub anchor_mint: Pubkey,            // First registered coin, default until then

    // Payout wallets
    pub foundation: Pubkey,             // Receives payments and the presale foundation share
    pub team: Pubkey,                   // Presale team share
    pub default_referral: Pubkey,       // Referral levels nobody claims

    // External collaborators
    pub referral_program: Pubkey,
    pub vesting_program: Pubkey,

    pub total_sold: [u8; 16],           // Canonical, overhead included
    pub cap: [u8; 16],
    pub anchor_rate: u64,               // Cached fixed rate of the anchor coin

    pub referral_bps: [u16; 3],
    pub team_bps: u16,
    pub foundation_bps: u16,
    pub coin_count: u16,                // Regular coins registered so far

    pub admin_count: u8,
    pub bump: u8,
    pub oracle: EthAddress,
    pub anchor_decimals: u8,

    _padding: [u8; 5],
}

impl SaleConfig {
    pub fn total_sold(&self) -> u128 {
        u128::from_le_bytes(self.total_sold)
    }

    pub fn cap(&self) -> u128 {
        u128::from_le_bytes(self.cap)
    }

    pub fn set_cap(&mut self, cap: u128) {
        self.cap = cap.to_le_bytes();
    }

    pub fn schedule(&self) -> ReferralSchedule {
        ReferralSchedule {
            levels_bps: self.referral_bps,
        }
    }

    pub fn presale_shares(&self) -> PresaleShares {
        PresaleShares {
            team_bps: self.team_bps,
            foundation_bps: self.foundation_bps,
        }
    }

    pub fn ledger(&self) -> IssuanceLedger {
        IssuanceLedger::new(self.total_sold(), self.cap(), self.schedule().overhead_bps())
    }

    /// Stores the counter of a ledger obtained from [`SaleConfig::ledger`].
    /// The counter never moves backwards.
    pub fn commit(&mut self, ledger: &IssuanceLedger) -> Result<(), SaleError> {
        if ledger.total_sold < self.total_sold() || ledger.total_sold > self.cap() {
            return Err(SaleError::SaleCapExceeded);
        }
        self.total_sold = ledger.total_sold.to_le_bytes();
        Ok(())
    }

    pub fn has_anchor(&self) -> bool {
        self.anchor_mint != Pubkey::default()
    }

    pub fn admins(&self) -> &[Pubkey] {
        &self.admins[..(self.admin_count as usize).min(MAX_ADMINS)]
    }

    pub fn add_admin(&mut self, admin: Pubkey) -> Result<(), SaleError> {
        if admin == self.authority || self.admins().contains(&admin) {
            return Ok(());
        }
        let count = self.admin_count as usize;
        if count >= MAX_ADMINS {
            return Err(SaleError::AdminListFull);
        }
        self.admins[count] = admin;
        self.admin_count += 1;
        Ok(())
    }
}

impl RoleRegistry for SaleConfig {
    fn has_role(&self, who: &Pubkey, role: Role) -> bool {
        let admin = *who == self.authority || self.admins().contains(who);
        match role {
            Role::Admin => admin,
            Role::PresaleLoader => admin || (*who == self.presale_loader && *who != Pubkey::default()),
        }
    }
}

account!(AccountType, SaleConfig);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::require_role;

    fn sale() -> SaleConfig {
        let mut sale = SaleConfig::zeroed();
        sale.authority = Pubkey::new_unique();
        sale.presale_loader = Pubkey::new_unique();
        sale.referral_bps = [REFERRAL_L1_BPS, REFERRAL_L2_BPS, REFERRAL_L3_BPS];
        sale.team_bps = PRESALE_TEAM_BPS;
        sale.foundation_bps = PRESALE_FOUNDATION_BPS;
        sale.set_cap(DEFAULT_SALE_CAP);
        sale
    }

    #[test]
    fn test_layout_has_no_padding_surprises() {
        assert_eq!(std::mem::size_of::<SaleConfig>() % 8, 0);
        assert_eq!(std::mem::size_of::<SaleConfig>(), 496);
    }

    #[test]
    fn test_ledger_round_trip() {
        let mut sale = sale();
        let mut ledger = sale.ledger();
        assert_eq!(ledger.overhead_bps, 900);

        ledger.reserve(1_000).unwrap();
        sale.commit(&ledger).unwrap();
        assert_eq!(sale.total_sold(), 1_090);

        let stale = IssuanceLedger::new(0, sale.cap(), 900);
        assert_eq!(sale.commit(&stale), Err(SaleError::SaleCapExceeded));
    }

    #[test]
    fn test_admin_list() {
        let mut sale = sale();
        let admin = Pubkey::new_unique();
        let stranger = Pubkey::new_unique();

        assert_eq!(require_role(&sale, &admin, Role::Admin), Err(SaleError::NotAuthorized));

        sale.add_admin(admin).unwrap();
        sale.add_admin(admin).unwrap();
        assert_eq!(sale.admins(), &[admin]);
        assert!(require_role(&sale, &admin, Role::Admin).is_ok());
        assert!(require_role(&sale, &sale.authority, Role::Admin).is_ok());
        assert_eq!(require_role(&sale, &stranger, Role::Admin), Err(SaleError::NotAuthorized));

        for _ in 1..MAX_ADMINS {
            sale.add_admin(Pubkey::new_unique()).unwrap();
        }
        assert_eq!(sale.add_admin(stranger), Err(SaleError::AdminListFull));
    }

    #[test]
    fn test_presale_loader_role() {
        let sale = sale();
        let loader = sale.presale_loader;

        assert!(require_role(&sale, &loader, Role::PresaleLoader).is_ok());
        assert_eq!(require_role(&sale, &loader, Role::Admin), Err(SaleError::NotAuthorized));
        assert!(require_role(&sale, &sale.authority, Role::PresaleLoader).is_ok());
        assert_eq!(
            require_role(&sale, &Pubkey::default(), Role::PresaleLoader),
            Err(SaleError::NotAuthorized)
        );
    }
}
