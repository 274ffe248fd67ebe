use steel::*;
use crate::error::SaleError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Registers coins, sets the oracle, manages admins.
    Admin,
    /// Loads presale allocations.
    PresaleLoader,
}

pub trait RoleRegistry {
    fn has_role(&self, who: &Pubkey, role: Role) -> bool;
}

pub fn require_role<R: RoleRegistry>(registry: &R, caller: &Pubkey, role: Role) -> Result<(), SaleError> {
    if !registry.has_role(caller, role) {
        return Err(SaleError::NotAuthorized);
    }
    Ok(())
}
