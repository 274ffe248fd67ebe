use anyhow::{Result, anyhow};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use spl_associated_token_account::get_associated_token_address;
use crowdsale_api::prelude::*;

use crate::utils::*;
use crate::views::{purchase_pool, resolve_recipients};
use super::{preview_buy, send_instructions};

/// What the buyer asks for. `payment_mint` of `None` pays in lamports.
#[derive(Clone, Copy, Debug)]
pub struct PurchaseRequest {
    pub sale_mint: Pubkey,
    pub payment_mint: Option<Pubkey>,
    pub amount: u64,
    pub referral: Pubkey,
    pub exact_output: bool,
}

/// Oracle authorization attached to a signed purchase.
#[derive(Clone, Copy, Debug)]
pub struct Voucher {
    pub nonce: u64,
    pub signature: [u8; SIGNATURE_LEN],
}

/// Resolves every account the purchase touches and makes sure the sale token
/// accounts of the buyer and the referral recipients exist.
async fn prepare(
    client: &RpcClient,
    signer: &Keypair,
    request: &PurchaseRequest,
) -> Result<PurchaseAccounts> {
    let buyer = signer.pubkey();
    let (sale, sale_pda) = get_sale_account(client, &request.sale_mint).await?;
    let payment_mint = request.payment_mint.unwrap_or(NATIVE_MINT);

    let coin = get_coin_account(client, &sale_pda, &payment_mint).await?;
    if coin.is_none() {
        println!("Warning: {} is not a registered coin, the purchase will be rejected", payment_mint);
    }

    let recipients = resolve_recipients(client, &sale, &buyer, &request.referral).await?;

    let mut owners = vec![buyer];
    for recipient in recipients {
        if !owners.contains(&recipient) {
            owners.push(recipient);
        }
    }
    for owner in owners {
        let (ata, sig) = create_ata(client, signer, &request.sale_mint, &owner).await?;
        if sig != Signature::default() {
            println!("Created sale token ATA {} for {}. Signature: {}", ata, owner, sig);
        }
    }

    if request.payment_mint.is_some() {
        let buyer_ata = get_associated_token_address(&buyer, &payment_mint);
        if get_account_optional(client, &buyer_ata).await?.is_none() {
            return Err(anyhow!("Buyer has no token account {} for {}", buyer_ata, payment_mint));
        }
    }

    Ok(PurchaseAccounts {
        buyer,
        sale_mint: request.sale_mint,
        payment_mint,
        foundation: sale.foundation,
        referral_program: sale.referral_program,
        recipients,
        pool: purchase_pool(coin.as_ref()),
    })
}

/// Lamports a native purchase must attach: the amount itself for an exact
/// input, the previewed price for an exact output.
async fn native_value(client: &RpcClient, signer: &Keypair, request: &PurchaseRequest) -> Result<u64> {
    if !request.exact_output {
        return Ok(request.amount);
    }

    let preview = preview_buy(client, &signer.pubkey(), request).await?;
    if preview.quote == 0 {
        return Err(anyhow!("Purchase would be rejected: preview quoted 0"));
    }
    Ok(preview.quote)
}

pub async fn buy(
    client: &RpcClient,
    signer: &Keypair,
    request: PurchaseRequest,
) -> Result<Signature> {
    let accounts = prepare(client, signer, &request).await?;

    let ix = match request.payment_mint {
        Some(_) => build_buy_ix(&accounts, request.amount, request.referral, request.exact_output),
        None => {
            let value = native_value(client, signer, &request).await?;
            build_buy_native_ix(&accounts, request.amount, value, request.referral, request.exact_output)
        }
    };

    send_instructions(client, signer, vec![ix], "buy tokens").await
}

pub async fn buy_signed(
    client: &RpcClient,
    signer: &Keypair,
    request: PurchaseRequest,
    voucher: Voucher,
) -> Result<Signature> {
    let accounts = prepare(client, signer, &request).await?;

    let ix = match request.payment_mint {
        Some(_) => build_buy_signed_ix(
            &accounts,
            request.amount,
            request.referral,
            request.exact_output,
            voucher.nonce,
            voucher.signature,
        ),
        None => {
            let value = native_value(client, signer, &request).await?;
            build_buy_native_signed_ix(
                &accounts,
                request.amount,
                value,
                request.referral,
                request.exact_output,
                voucher.nonce,
                voucher.signature,
            )
        }
    };

    send_instructions(client, signer, vec![ix], "buy tokens with voucher").await
}
