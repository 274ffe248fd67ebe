use anyhow::{Result, anyhow};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{message::Message, pubkey::Pubkey, transaction::Transaction};
use crowdsale_api::prelude::*;

use crate::utils::*;
use crate::views::purchase_pool;
use super::PurchaseRequest;

/// Quotes a purchase without executing it: sale tokens for an exact input,
/// payment for an exact output. Rejected purchases quote 0.
pub async fn preview_buy(
    client: &RpcClient,
    payer: &Pubkey,
    request: &PurchaseRequest,
) -> Result<BuyPreview> {
    let (sale_pda, _) = find_sale_pda(&request.sale_mint);
    let payment_mint = request.payment_mint.unwrap_or(NATIVE_MINT);
    let coin = get_coin_account(client, &sale_pda, &payment_mint).await?;
    let pool = purchase_pool(coin.as_ref());

    let ix = match request.payment_mint {
        Some(mint) => build_preview_buy_ix(request.sale_mint, mint, pool, request.amount, request.exact_output),
        None => build_preview_buy_native_ix(request.sale_mint, pool, request.amount, request.exact_output),
    };

    let tx = Transaction::new_unsigned(Message::new(&[ix], Some(payer)));
    let data = simulate_return_data(client, &tx).await?;

    BuyPreview::try_from_bytes(&data)
        .ok_or_else(|| anyhow!("Unexpected preview return data: {:?}", data))
}
