#![cfg(test)]
use litesvm::{types::{FailedTransactionMetadata, TransactionResult}, LiteSVM};
use litesvm_token::{CreateAssociatedTokenAccount, CreateMint, MintTo};
use solana_program::program_pack::Pack;
use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};
use super::send_ix;

pub fn create_mint(svm: &mut LiteSVM, payer: &Keypair, authority: &Pubkey, decimals: u8) -> Pubkey {
    CreateMint::new(svm, payer)
        .authority(authority)
        .decimals(decimals)
        .send()
        .unwrap()
}

pub fn create_ata(svm: &mut LiteSVM, payer: &Keypair, mint: &Pubkey, owner: &Pubkey) -> Pubkey {
    CreateAssociatedTokenAccount::new(svm, payer, mint)
        .owner(owner)
        .send()
        .unwrap()
}

pub fn mint_to(
    svm: &mut LiteSVM,
    payer: &Keypair,
    mint: &Pubkey,
    authority: &Keypair,
    destination: &Pubkey,
    amount: u64,
) -> Result<(), FailedTransactionMetadata> {
    MintTo::new(svm, payer, mint, destination, amount)
        .owner(authority)
        .send()
}

/// Hands mint authority over to `new_authority`, e.g. the sale PDA.
pub fn set_mint_authority(
    svm: &mut LiteSVM,
    authority: &Keypair,
    mint: &Pubkey,
    new_authority: &Pubkey,
) -> TransactionResult {
    let ix = spl_token::instruction::set_authority(
        &spl_token::id(),
        mint,
        Some(new_authority),
        spl_token::instruction::AuthorityType::MintTokens,
        &authority.pubkey(),
        &[],
    ).unwrap();
    send_ix(svm, ix, authority)
}

pub fn token_balance(svm: &LiteSVM, ata: &Pubkey) -> u64 {
    let account = svm.get_account(ata).unwrap();
    spl_token::state::Account::unpack(&account.data).unwrap().amount
}

pub fn mint_supply(svm: &LiteSVM, mint: &Pubkey) -> u64 {
    let account = svm.get_account(mint).unwrap();
    spl_token::state::Mint::unpack(&account.data).unwrap().supply
}
