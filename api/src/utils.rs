use steel::*;
use solana_program::msg;
use crate::state::SaleConfig;

/// Logs `message` and fails with `InvalidArgument` unless `condition` holds.
pub fn check_condition(condition: bool, message: &str) -> ProgramResult {
    if condition {
        return Ok(());
    }
    msg!("Failed condition: {}", message);
    Err(ProgramError::InvalidArgument)
}

/// Writable signer paying for the instruction.
pub fn check_signer(account: &AccountInfo) -> ProgramResult {
    account.is_signer()?.is_writable()?;
    Ok(())
}

pub fn check_mut(account: &AccountInfo) -> ProgramResult {
    account.is_writable().map(|_| ())
}

pub fn check_program(account: &AccountInfo, program_id: &Pubkey) -> ProgramResult {
    account.is_program(program_id).map(|_| ())
}

pub fn check_seeds(account: &AccountInfo, seeds: &[&[u8]], program_id: &Pubkey) -> ProgramResult {
    account.has_seeds(seeds, program_id).map(|_| ())
}

/// PDA about to be created: still owned by the system program, empty and
/// derived from `seeds`.
pub fn check_uninitialized_pda(account: &AccountInfo, seeds: &[&[u8]], program_id: &Pubkey) -> ProgramResult {
    check_condition(account.owner.eq(&system_program::ID), "Account already owned by a program")?;
    account.is_empty()?.is_writable()?.has_seeds(seeds, program_id)?;
    Ok(())
}

/// True once the account holds data owned by `owner`.
pub fn is_initialized(account: &AccountInfo, owner: &Pubkey) -> bool {
    account.owner.eq(owner) && !account.data_is_empty()
}

/// Checks `sale_mint_info` is the mint `sale` issues and returns its
/// decimals.
pub fn sale_mint_decimals(sale: &SaleConfig, sale_mint_info: &AccountInfo) -> Result<u8, ProgramError> {
    check_condition(sale.sale_mint.eq(sale_mint_info.key), "Invalid sale mint")?;
    Ok(sale_mint_info.as_mint()?.decimals())
}
