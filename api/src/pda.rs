use steel::*;
use crate::consts::*;

pub fn find_sale_pda(sale_mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[SALE, sale_mint.as_ref()],
        &crate::id(),
    )
}

pub fn find_coin_pda(sale: &Pubkey, mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[COIN, sale.as_ref(), mint.as_ref()],
        &crate::id(),
    )
}

pub fn find_nonce_pda(sale: &Pubkey, wallet: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[NONCE, sale.as_ref(), wallet.as_ref()],
        &crate::id(),
    )
}

/// Parent record of `child` in the external referral program.
pub fn find_referral_pda(child: &Pubkey, referral_program: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[REFERRAL, child.as_ref()],
        referral_program,
    )
}
