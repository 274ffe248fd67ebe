use anyhow::Result;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use crowdsale_api::prelude::*;

use crate::utils::*;
use super::send_instructions;

/// Wallets and collaborators a sale is created with.
#[derive(Clone, Copy, Debug)]
pub struct SaleSetup {
    pub cap: u128,
    pub presale_loader: Pubkey,
    pub foundation: Pubkey,
    pub team: Pubkey,
    pub default_referral: Pubkey,
    pub referral_program: Pubkey,
    pub vesting_program: Pubkey,
}

/// Creates the sale for `sale_mint` and hands its mint authority to the sale
/// PDA. `signer` must currently hold the mint authority.
pub async fn initialize(
    client: &RpcClient,
    signer: &Keypair,
    sale_mint: Pubkey,
    setup: SaleSetup,
) -> Result<(Signature, Pubkey)> {
    let authority = signer.pubkey();
    let (sale_pda, _) = find_sale_pda(&sale_mint);

    println!("Initializing sale with PDA: {}", sale_pda);

    let init_ix = build_initialize_sale_ix(
        authority,
        sale_mint,
        setup.cap,
        setup.presale_loader,
        setup.foundation,
        setup.team,
        setup.default_referral,
        setup.referral_program,
        setup.vesting_program,
    );
    let authority_ix = build_set_mint_authority_ix(&sale_mint, &authority, &sale_pda)?;

    let signature = send_instructions(client, signer, vec![init_ix, authority_ix], "initialize sale").await?;

    // Unclaimed referral shares are minted here
    let (ata, sig) = create_ata(client, signer, &sale_mint, &setup.default_referral).await?;
    if sig != Signature::default() {
        println!("Created default referral ATA {}. Signature: {}", ata, sig);
    }

    Ok((signature, sale_pda))
}
