use anyhow::{Result, anyhow};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use spl_associated_token_account::{
    get_associated_token_address,
    instruction::create_associated_token_account_idempotent,
};

use crate::utils::{deserialize, get_account_optional, get_latest_blockhash, send_and_confirm_transaction};

/// Creates the associated token account of `owner` for `mint` when missing.
/// Returns `Signature::default()` if the account already existed.
pub async fn create_ata(
    client: &RpcClient,
    payer: &Keypair,
    mint: &Pubkey,
    owner: &Pubkey,
) -> Result<(Pubkey, Signature)> {
    let ata = get_associated_token_address(owner, mint);
    if get_account_optional(client, &ata).await?.is_some() {
        return Ok((ata, Signature::default()));
    }

    let payer_pk = payer.pubkey();
    let ix = create_associated_token_account_idempotent(&payer_pk, owner, mint, &spl_token::ID);

    let blockhash_bytes = get_latest_blockhash(client).await?;
    let recent_blockhash = deserialize(&blockhash_bytes)?;
    let tx = Transaction::new_signed_with_payer(&[ix], Some(&payer_pk), &[payer], recent_blockhash);

    let signature_bytes = send_and_confirm_transaction(client, &tx)
        .await
        .map_err(|e| anyhow!("Failed to create ATA for {}: {}", owner, e))?;
    let signature: Signature = deserialize(&signature_bytes)?;

    Ok((ata, signature))
}
