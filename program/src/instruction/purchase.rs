use steel::*;
use crowdsale_api::prelude::*;

/// Reads pool reserves from the vault accounts passed with the instruction.
pub struct VaultPools<'a, 'info> {
    pub coin_vault: &'a AccountInfo<'info>,
    pub anchor_vault: &'a AccountInfo<'info>,
    pub coin_mint: Pubkey,
    pub coin_decimals: u8,
    pub anchor_mint: Pubkey,
    pub anchor_decimals: u8,
}

impl PoolReader for VaultPools<'_, '_> {
    fn reserves(&self, pool: &PoolRef) -> Option<PoolReserves> {
        if pool.coin_vault != *self.coin_vault.key || pool.anchor_vault != *self.anchor_vault.key {
            return None;
        }

        let coin = self.coin_vault.as_token_account().ok()?;
        let anchor = self.anchor_vault.as_token_account().ok()?;
        if coin.mint() != self.coin_mint || anchor.mint() != self.anchor_mint {
            return None;
        }

        Some(PoolReserves {
            coin: coin.amount(),
            coin_decimals: self.coin_decimals,
            anchor: anchor.amount(),
            anchor_decimals: self.anchor_decimals,
        })
    }
}

/// Parent lookups against referral records passed with the instruction.
pub struct RecordGraph<'a, 'info> {
    pub referral_program: Pubkey,
    pub records: [&'a AccountInfo<'info>; 2],
}

impl ReferralGraph for RecordGraph<'_, '_> {
    fn parent_of(&self, child: &Pubkey) -> Result<Option<Pubkey>, SaleError> {
        let (address, _) = find_referral_pda(child, &self.referral_program);
        let record = self.records
            .iter()
            .find(|r| *r.key == address)
            .ok_or(SaleError::InvalidReferralAccount)?;

        if !is_initialized(record, &self.referral_program) {
            return Ok(None);
        }

        let data = record
            .try_borrow_data()
            .map_err(|_| SaleError::InvalidReferralAccount)?;
        match ReferralRecord::try_from_bytes(&data) {
            Some(r) if r.child == *child => Ok(Some(r.parent)),
            _ => Err(SaleError::InvalidReferralAccount),
        }
    }
}

/// Loads the coin config behind `coin_info`, or `None` when `mint` was never
/// registered for this sale.
pub fn load_coin(
    coin_info: &AccountInfo,
    sale_info: &AccountInfo,
    mint: &Pubkey,
) -> Result<Option<CoinConfig>, ProgramError> {
    check_seeds(
        coin_info,
        &[COIN, sale_info.key.as_ref(), mint.as_ref()],
        &crowdsale_api::ID
    )?;

    if !is_initialized(coin_info, &crowdsale_api::ID) {
        return Ok(None);
    }

    let coin = coin_info.as_account::<CoinConfig>(&crowdsale_api::ID)?;
    Ok(Some(*coin))
}

/// Accepted purchase in the units the program moves around.
#[derive(Debug)]
pub struct PricedPurchase {
    pub coin_id: u16,
    pub buyer_tokens: u64,
    pub payment: u64,
}

/// Runs the quote engine for a purchase and snaps the result to the sale
/// mint's precision.
pub fn price_purchase<'info>(
    sale: &SaleConfig,
    coin: Option<&CoinConfig>,
    coin_vault: &AccountInfo<'info>,
    anchor_vault: &AccountInfo<'info>,
    sale_decimals: u8,
    amount: u64,
    exact_output: bool,
) -> Result<PricedPurchase, ProgramError> {
    let coin_quote = coin.map(|c| c.quote_view()).transpose()?;
    let pools = VaultPools {
        coin_vault,
        anchor_vault,
        coin_mint: coin.map(|c| c.mint).unwrap_or_default(),
        coin_decimals: coin.map(|c| c.decimals).unwrap_or_default(),
        anchor_mint: sale.anchor_mint,
        anchor_decimals: sale.anchor_decimals,
    };

    let amount_in = if exact_output {
        to_canonical(amount as u128, sale_decimals)?
    } else {
        amount as u128
    };

    let ledger = sale.ledger();
    let engine = QuoteEngine::new(&ledger, sale.anchor_rate, &pools);
    let quote = engine.execute(coin_quote.as_ref(), amount_in, exact_output)?;

    let buyer_tokens = from_canonical(quote.sale_amount, sale_decimals)?;
    if buyer_tokens == 0 {
        return Err(SaleError::ZeroQuote.into());
    }

    Ok(PricedPurchase {
        coin_id: quote.coin_id,
        buyer_tokens: to_token_amount(buyer_tokens)?,
        payment: to_token_amount(quote.payment_amount)?,
    })
}

/// Consumes a voucher: verifies it against the oracle and stores the new
/// wallet nonce, creating the nonce account on first use.
#[allow(clippy::too_many_arguments)]
pub fn redeem_voucher<'info>(
    buyer_info: &AccountInfo<'info>,
    sale_info: &AccountInfo<'info>,
    nonce_info: &AccountInfo<'info>,
    system_program_info: &AccountInfo<'info>,
    oracle: &EthAddress,
    intent: &PurchaseIntent,
    signature: &[u8],
    nonce_bump: u8,
) -> ProgramResult {
    check_mut(nonce_info)?;
    check_program(system_program_info, &system_program::id())?;

    let seeds: &[&[u8]] = &[NONCE, sale_info.key.as_ref(), buyer_info.key.as_ref()];

    let exists = is_initialized(nonce_info, &crowdsale_api::ID);
    let last_nonce = if exists {
        check_seeds(nonce_info, seeds, &crowdsale_api::ID)?;
        let record = nonce_info.as_account::<WalletNonce>(&crowdsale_api::ID)?;
        check_condition(record.wallet.eq(buyer_info.key), "Nonce account does not match wallet")?;
        record.last_nonce
    } else {
        check_uninitialized_pda(nonce_info, seeds, &crowdsale_api::ID)?;
        0
    };

    let next = verify_voucher(intent, signature, oracle, last_nonce)?;

    solana_program::msg!("voucher nonce: {}", next);

    if !exists {
        create_program_account_with_bump::<WalletNonce>(
            nonce_info,
            system_program_info,
            buyer_info,
            &crowdsale_api::ID,
            seeds,
            nonce_bump,
        )?;

        let record = nonce_info.as_account_mut::<WalletNonce>(&crowdsale_api::ID)?;
        record.sale = *sale_info.key;
        record.wallet = *buyer_info.key;
        record.bump = nonce_bump;
    }

    let record = nonce_info.as_account_mut::<WalletNonce>(&crowdsale_api::ID)?;
    record.last_nonce = next;

    Ok(())
}

/// Accounts that receive sale tokens.
pub struct Payees<'a, 'info> {
    pub buyer_sale_ata: &'a AccountInfo<'info>,
    pub referral_atas: [&'a AccountInfo<'info>; 3],
    pub referral_records: [&'a AccountInfo<'info>; 2],
}

/// Reserves issuance for a priced purchase, mints the buyer and referral
/// shares and logs the purchase. The sold counter grows by exactly the
/// minted units.
#[allow(clippy::too_many_arguments)]
pub fn settle_purchase<'info>(
    buyer_info: &AccountInfo<'info>,
    sale_info: &AccountInfo<'info>,
    sale_mint_info: &AccountInfo<'info>,
    token_program_info: &AccountInfo<'info>,
    payees: &Payees<'_, 'info>,
    purchase: &PricedPurchase,
    referral: &Pubkey,
    sale_decimals: u8,
) -> ProgramResult {
    let sale = sale_info.as_account_mut::<SaleConfig>(&crowdsale_api::ID)?;

    // Shares are split in sale-mint units; the last level takes the remainder
    let graph = RecordGraph {
        referral_program: sale.referral_program,
        records: payees.referral_records,
    };
    let buyer_units = purchase.buyer_tokens as u128;
    let payouts = cascade(
        &sale.schedule(),
        &graph,
        buyer_info.key,
        referral,
        &sale.default_referral,
        buyer_units,
    )?;

    let mut ledger = sale.ledger();
    ledger.reserve_minted(payouts.minted_with(buyer_units)?, sale_decimals)?;
    sale.commit(&ledger)?;

    solana_program::msg!("total sold: {}", sale.total_sold());

    let sale_mint_key = *sale_mint_info.key;
    let bump = sale.bump;
    let seeds: &[&[u8]] = &[SALE, sale_mint_key.as_ref()];

    payees.buyer_sale_ata.as_token_account()?
        .assert(|t| t.owner().eq(buyer_info.key))?
        .assert(|t| t.mint().eq(&sale_mint_key))?;

    mint_to_signed_with_bump(
        sale_mint_info,
        payees.buyer_sale_ata,
        sale_info,
        token_program_info,
        purchase.buyer_tokens,
        seeds,
        bump,
    )?;

    for (payout, ata) in payouts.levels.iter().zip(payees.referral_atas) {
        ata.as_token_account()?
            .assert(|t| t.owner().eq(&payout.recipient))?
            .assert(|t| t.mint().eq(&sale_mint_key))?;

        let amount = to_token_amount(payout.amount)?;
        if amount == 0 {
            continue;
        }

        solana_program::msg!("referral {}: {}", payout.recipient, amount);

        mint_to_signed_with_bump(
            sale_mint_info,
            ata,
            sale_info,
            token_program_info,
            amount,
            seeds,
            bump,
        )?;
    }

    BuyEvent::new(
        *buyer_info.key,
        purchase.buyer_tokens,
        purchase.coin_id,
        purchase.payment,
        *referral,
    ).log();

    Ok(())
}
