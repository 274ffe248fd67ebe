use anyhow::{Result, anyhow};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSimulateTransactionConfig;
use solana_sdk::{account::Account, pubkey::Pubkey, transaction::Transaction};

use crate::utils::{serialize, with_retries};

/// Bincode-encoded account at `address`; fails when it does not exist.
pub async fn get_account(client: &RpcClient, address: &Pubkey) -> Result<Vec<u8>> {
    let account = with_retries("get_account", || client.get_account(address))
        .await
        .map_err(|e| anyhow!("Account {} unavailable: {}", address, e))?;
    serialize(&account)
}

/// Same as [`get_account`], but a missing account is `None`.
pub async fn get_account_optional(client: &RpcClient, address: &Pubkey) -> Result<Option<Account>> {
    let response = with_retries("get_account_with_commitment", || {
        client.get_account_with_commitment(address, client.commitment())
    }).await?;
    Ok(response.value)
}

pub async fn get_latest_blockhash(client: &RpcClient) -> Result<Vec<u8>> {
    let blockhash = with_retries("get_latest_blockhash", || client.get_latest_blockhash()).await?;
    serialize(&blockhash)
}

pub async fn send_and_confirm_transaction(client: &RpcClient, tx: &Transaction) -> Result<Vec<u8>> {
    let signature = with_retries("send_and_confirm_transaction", || {
        client.send_and_confirm_transaction(tx)
    }).await?;
    serialize(&signature)
}

/// Simulates `tx` and returns the program's return data. The blockhash is
/// replaced by the node and signatures are not checked.
pub async fn simulate_return_data(client: &RpcClient, tx: &Transaction) -> Result<Vec<u8>> {
    let config = RpcSimulateTransactionConfig {
        sig_verify: false,
        replace_recent_blockhash: true,
        ..RpcSimulateTransactionConfig::default()
    };

    let result = with_retries("simulate_transaction", || {
        client.simulate_transaction_with_config(tx, config.clone())
    }).await?.value;

    if let Some(err) = result.err {
        return Err(anyhow!("Simulation failed: {}. Logs: {:?}", err, result.logs.unwrap_or_default()));
    }

    let return_data = result.return_data
        .ok_or_else(|| anyhow!("Simulation produced no return data"))?;
    base64::decode(&return_data.data.0)
        .map_err(|e| anyhow!("Invalid return data encoding: {}", e))
}
