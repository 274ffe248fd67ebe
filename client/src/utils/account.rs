use anyhow::{Result, anyhow};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{account::Account, program_pack::Pack, pubkey::Pubkey};
use crowdsale_api::prelude::*;

use crate::utils::{deserialize, get_account, get_account_optional, unpack_account};

pub async fn get_sale_account(client: &RpcClient, sale_mint: &Pubkey) -> Result<(SaleConfig, Pubkey)> {
    let (sale_pda, _) = find_sale_pda(sale_mint);
    let account_bytes = get_account(client, &sale_pda).await?;
    let account: Account = deserialize(&account_bytes)?;
    let sale = unpack_account::<SaleConfig>(&account.data, "sale config")?;
    Ok((sale, sale_pda))
}

/// Coin config for `mint`, or `None` when the coin was never registered.
pub async fn get_coin_account(client: &RpcClient, sale: &Pubkey, mint: &Pubkey) -> Result<Option<CoinConfig>> {
    let (coin_pda, _) = find_coin_pda(sale, mint);
    match get_account_optional(client, &coin_pda).await? {
        Some(account) if account.owner == crowdsale_api::ID => {
            Ok(Some(unpack_account::<CoinConfig>(&account.data, "coin config")?))
        }
        _ => Ok(None),
    }
}

pub async fn get_nonce_account(client: &RpcClient, sale: &Pubkey, wallet: &Pubkey) -> Result<Option<WalletNonce>> {
    let (nonce_pda, _) = find_nonce_pda(sale, wallet);
    match get_account_optional(client, &nonce_pda).await? {
        Some(account) if account.owner == crowdsale_api::ID => {
            Ok(Some(unpack_account::<WalletNonce>(&account.data, "wallet nonce")?))
        }
        _ => Ok(None),
    }
}

/// Parent recorded for `child` in the referral program, if any.
pub async fn get_referral_parent(
    client: &RpcClient,
    referral_program: &Pubkey,
    child: &Pubkey,
) -> Result<Option<Pubkey>> {
    let (record_pda, _) = find_referral_pda(child, referral_program);
    let Some(account) = get_account_optional(client, &record_pda).await? else {
        return Ok(None);
    };
    if account.owner != *referral_program || account.data.is_empty() {
        return Ok(None);
    }

    let record = ReferralRecord::try_from_bytes(&account.data)
        .ok_or_else(|| anyhow!("Malformed referral record {}", record_pda))?;
    Ok((record.child == *child).then_some(record.parent))
}

pub async fn get_token_account(client: &RpcClient, address: &Pubkey) -> Result<spl_token::state::Account> {
    let account_bytes = get_account(client, address).await?;
    let account: Account = deserialize(&account_bytes)?;
    spl_token::state::Account::unpack(&account.data)
        .map_err(|e| anyhow!("Failed to unpack token account {}: {}", address, e))
}

pub async fn get_mint_account(client: &RpcClient, address: &Pubkey) -> Result<spl_token::state::Mint> {
    let account_bytes = get_account(client, address).await?;
    let account: Account = deserialize(&account_bytes)?;
    spl_token::state::Mint::unpack(&account.data)
        .map_err(|e| anyhow!("Failed to unpack mint {}: {}", address, e))
}
