pub mod init;
pub mod admin;
pub mod buy;
pub mod preview;
pub mod presale;

pub use init::*;
pub use admin::*;
pub use buy::*;
pub use preview::*;
pub use presale::*;

use anyhow::{Result, anyhow};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    compute_budget::ComputeBudgetInstruction,
    instruction::Instruction,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};

use crate::consts::*;
use crate::utils::*;

/// Signs `ixs` with `signer` as fee payer and waits for confirmation.
pub(crate) async fn send_instructions(
    client: &RpcClient,
    signer: &Keypair,
    ixs: Vec<Instruction>,
    what: &str,
) -> Result<Signature> {
    let mut all = vec![ComputeBudgetInstruction::set_compute_unit_limit(COMPUTE_UNIT_LIMIT)];
    all.extend(ixs);

    let blockhash_bytes = get_latest_blockhash(client).await?;
    let recent_blockhash = deserialize(&blockhash_bytes)?;
    let tx = Transaction::new_signed_with_payer(
        &all,
        Some(&signer.pubkey()),
        &[signer],
        recent_blockhash,
    );

    let signature_bytes = send_and_confirm_transaction(client, &tx)
        .await
        .map_err(|e| anyhow!("Failed to {}: {}", what, e))?;
    deserialize(&signature_bytes)
}
