use anyhow::{Result, anyhow};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use crowdsale_api::prelude::*;

use crate::utils::*;
use super::send_instructions;

/// Checks a whole presale list against the sale's remaining capacity, the
/// way the program reserves each batch, so a list that breaches the cap is
/// refused before any batch is sent.
pub fn check_presale_fits(sale: &SaleConfig, amounts: &[u64], decimals: u8) -> Result<()> {
    let canonical = amounts
        .iter()
        .map(|a| to_canonical(*a as u128, decimals))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow!("Invalid presale amount: {}", e))?;

    let mut ledger = sale.ledger();
    ledger
        .reserve_presale(&sale.presale_shares(), &canonical)
        .map_err(|e| anyhow!("Presale list refused: {} (remaining: {})", e, sale.ledger().remaining()))?;
    Ok(())
}

/// Loads presale allocations in batches of `MAX_PRESALE_BATCH`. The full
/// list is checked against the cap first; each batch is then its own
/// transaction and a failing batch stops the run, reporting how many
/// entries were loaded before it.
pub async fn presale_bulk_load(
    client: &RpcClient,
    signer: &Keypair,
    sale_mint: Pubkey,
    vesting_ledger: Pubkey,
    beneficiaries: Vec<Pubkey>,
    amounts: Vec<u64>,
    since_dates: Vec<i64>,
) -> Result<Vec<Signature>> {
    if beneficiaries.len() != amounts.len() || beneficiaries.len() != since_dates.len() {
        return Err(anyhow!(
            "Presale lists differ in length: {} beneficiaries, {} amounts, {} dates",
            beneficiaries.len(),
            amounts.len(),
            since_dates.len()
        ));
    }

    let (sale, _) = get_sale_account(client, &sale_mint).await?;
    let decimals = get_mint_account(client, &sale_mint).await?.decimals;
    check_presale_fits(&sale, &amounts, decimals)?;

    let mut signatures = Vec::new();

    for (i, chunk) in beneficiaries.chunks(MAX_PRESALE_BATCH).enumerate() {
        let start = i * MAX_PRESALE_BATCH;
        let end = start + chunk.len();

        let ix = build_presale_bulk_load_ix(
            signer.pubkey(),
            sale_mint,
            sale.vesting_program,
            vesting_ledger,
            chunk.to_vec(),
            amounts[start..end].to_vec(),
            since_dates[start..end].to_vec(),
        )?;

        let signature = send_instructions(client, signer, vec![ix], "load presale batch")
            .await
            .map_err(|e| anyhow!("{} (entries loaded so far: {})", e, start))?;
        println!("Loaded presale entries {}..{}. Signature: {}", start, end, signature);
        signatures.push(signature);
    }

    Ok(signatures)
}
