use anyhow::{Result, anyhow};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use crowdsale_api::prelude::*;

use crate::utils::*;
use super::send_instructions;

pub async fn add_admin(
    client: &RpcClient,
    signer: &Keypair,
    sale_mint: Pubkey,
    admin: Pubkey,
) -> Result<Signature> {
    let ix = build_add_admin_ix(signer.pubkey(), sale_mint, admin);
    send_instructions(client, signer, vec![ix], "add admin").await
}

/// Sets the oracle from its `0x`-prefixed or bare hex address.
pub async fn set_oracle(
    client: &RpcClient,
    signer: &Keypair,
    sale_mint: Pubkey,
    oracle: &str,
) -> Result<Signature> {
    let oracle = parse_eth_address(oracle)?;
    let ix = build_set_oracle_ix(signer.pubkey(), sale_mint, oracle);
    send_instructions(client, signer, vec![ix], "set oracle").await
}

pub fn parse_eth_address(value: &str) -> Result<EthAddress> {
    let raw = hex::decode(value.trim_start_matches("0x"))
        .map_err(|e| anyhow!("Invalid oracle address {}: {}", value, e))?;
    raw.try_into()
        .map_err(|_| anyhow!("Oracle address must be 20 bytes"))
}

/// Registers `mint` as a payment coin or updates its rate. Pool-derived
/// coins need the vault pair their rate is read from. Also creates the
/// foundation's ATA for the coin so purchases can settle.
pub async fn fetch_coin(
    client: &RpcClient,
    signer: &Keypair,
    sale_mint: Pubkey,
    mint: Pubkey,
    rate: u64,
    rate_mode: u8,
    pool: Option<PoolRef>,
) -> Result<Signature> {
    if rate_mode == RATE_MODE_POOL && pool.is_none() {
        return Err(anyhow!("Pool-derived coins need --coin-vault and --anchor-vault"));
    }

    let ix = build_fetch_coin_ix(signer.pubkey(), sale_mint, mint, rate, rate_mode, pool);
    let signature = send_instructions(client, signer, vec![ix], "register coin").await?;

    if mint != NATIVE_MINT {
        let (sale, _) = get_sale_account(client, &sale_mint).await?;
        let (ata, sig) = create_ata(client, signer, &mint, &sale.foundation).await?;
        if sig != Signature::default() {
            println!("Created foundation ATA {}. Signature: {}", ata, sig);
        }
    }

    Ok(signature)
}
