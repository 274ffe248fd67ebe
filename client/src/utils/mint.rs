use anyhow::{Result, anyhow};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    program_pack::Pack,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    system_instruction,
    transaction::Transaction,
};
use spl_token::instruction as token_instruction;
use spl_token::ID as TOKEN_PROGRAM_ID;

use crate::utils::{deserialize, get_latest_blockhash, send_and_confirm_transaction};

async fn send(client: &RpcClient, tx: &Transaction, what: &str) -> Result<Signature> {
    let signature_bytes = send_and_confirm_transaction(client, tx)
        .await
        .map_err(|e| anyhow!("Failed to {}: {}", what, e))?;
    deserialize(&signature_bytes)
}

/// Creates an SPL mint with `payer` as mint authority.
pub async fn create_mint(
    client: &RpcClient,
    payer: &Keypair,
    decimals: u8,
) -> Result<(Pubkey, Signature)> {
    let mint = Keypair::new();
    let mint_pk = mint.pubkey();
    let payer_pk = payer.pubkey();

    let rent = client
        .get_minimum_balance_for_rent_exemption(spl_token::state::Mint::LEN)
        .await?;

    let ixs = [
        system_instruction::create_account(
            &payer_pk,
            &mint_pk,
            rent,
            spl_token::state::Mint::LEN as u64,
            &TOKEN_PROGRAM_ID,
        ),
        token_instruction::initialize_mint(&TOKEN_PROGRAM_ID, &mint_pk, &payer_pk, None, decimals)?,
    ];

    let recent_blockhash = deserialize(&get_latest_blockhash(client).await?)?;
    let tx = Transaction::new_signed_with_payer(&ixs, Some(&payer_pk), &[payer, &mint], recent_blockhash);

    let signature = send(client, &tx, "create mint").await?;
    Ok((mint_pk, signature))
}

/// Mints `amount` smallest units; `payer` must be the mint authority.
pub async fn mint_to(
    client: &RpcClient,
    payer: &Keypair,
    mint: &Pubkey,
    ata: &Pubkey,
    amount: u64,
) -> Result<Signature> {
    let payer_pk = payer.pubkey();
    let ix = token_instruction::mint_to(&TOKEN_PROGRAM_ID, mint, ata, &payer_pk, &[], amount)?;

    let recent_blockhash = deserialize(&get_latest_blockhash(client).await?)?;
    let tx = Transaction::new_signed_with_payer(&[ix], Some(&payer_pk), &[payer], recent_blockhash);

    send(client, &tx, "mint tokens").await
}

/// Set-authority instruction handing minting over to `new_authority`.
pub fn build_set_mint_authority_ix(
    mint: &Pubkey,
    current_authority: &Pubkey,
    new_authority: &Pubkey,
) -> Result<solana_sdk::instruction::Instruction> {
    token_instruction::set_authority(
        &TOKEN_PROGRAM_ID,
        mint,
        Some(new_authority),
        token_instruction::AuthorityType::MintTokens,
        current_authority,
        &[],
    ).map_err(|e| anyhow!("Failed to build set_authority: {}", e))
}
