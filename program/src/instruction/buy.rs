use steel::*;
use crowdsale_api::prelude::*;
use super::purchase::*;

pub fn process_buy(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let raw_args = BuyIx::try_from_bytes(data)?;
    let args = raw_args.to_struct();

    solana_program::msg!("Args: {:?}", args);

    buy_with_token(accounts, args.amount, &args.referral, args.exact_output)
}

pub fn process_buy_signed(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let raw_args = BuySignedIx::try_from_bytes(data)?;
    let args = raw_args.to_struct();

    let [
        token_accounts @ ..,
        nonce_info,
        system_program_info,
    ] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    let [
        buyer_info,
        sale_info,
        _sale_mint_info,
        _coin_info,
        payment_mint_info,
        ..
    ] = token_accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    solana_program::msg!("Args: {:?}", args);

    check_signer(buyer_info)?;

    let sale = sale_info.as_account::<SaleConfig>(&crowdsale_api::ID)?;
    let oracle = sale.oracle;

    let intent = PurchaseIntent {
        buyer: *buyer_info.key,
        payment_mint: Some(*payment_mint_info.key),
        amount: args.amount,
        referral: args.referral,
        exact_output: args.exact_output,
        nonce: args.nonce,
        program_id: crowdsale_api::ID,
        sale: *sale_info.key,
    };

    redeem_voucher(
        buyer_info,
        sale_info,
        nonce_info,
        system_program_info,
        &oracle,
        &intent,
        &args.signature,
        args.nonce_bump,
    )?;

    buy_with_token(token_accounts, args.amount, &args.referral, args.exact_output)
}

fn buy_with_token(
    accounts: &[AccountInfo],
    amount: u64,
    referral: &Pubkey,
    exact_output: bool,
) -> ProgramResult {
    let [
        buyer_info,
        sale_info,
        sale_mint_info,
        coin_info,
        payment_mint_info,
        buyer_payment_ata_info,
        foundation_payment_ata_info,
        buyer_sale_ata_info,
        referral_l1_info,
        referral_l2_info,
        referral_l3_info,
        record_l1_info,
        record_l2_info,
        pool_coin_vault_info,
        pool_anchor_vault_info,
        token_program_info,
    ] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    // Basic checks
    check_signer(buyer_info)?;
    check_mut(sale_info)?;
    check_mut(sale_mint_info)?;
    check_mut(buyer_payment_ata_info)?;
    check_mut(foundation_payment_ata_info)?;
    check_mut(buyer_sale_ata_info)?;
    check_mut(referral_l1_info)?;
    check_mut(referral_l2_info)?;
    check_mut(referral_l3_info)?;
    check_program(token_program_info, &spl_token::id())?;

    let sale = *sale_info.as_account::<SaleConfig>(&crowdsale_api::ID)?;

    let sale_decimals = sale_mint_decimals(&sale, sale_mint_info)?;

    if payment_mint_info.key.eq(&NATIVE_MINT) {
        return Err(SaleError::CoinNotAllowed.into());
    }

    let coin = load_coin(coin_info, sale_info, payment_mint_info.key)?;

    let purchase = price_purchase(
        &sale,
        coin.as_ref(),
        pool_coin_vault_info,
        pool_anchor_vault_info,
        sale_decimals,
        amount,
        exact_output,
    )?;

    solana_program::msg!("paying: {}", purchase.payment);
    solana_program::msg!("for: {}", purchase.buyer_tokens);

    let balance = buyer_payment_ata_info.as_token_account()?
        .assert(|t| t.owner().eq(buyer_info.key))?
        .assert(|t| t.mint().eq(payment_mint_info.key))?
        .amount();
    if balance < purchase.payment {
        return Err(SaleError::AllowanceInsufficient.into());
    }

    foundation_payment_ata_info.as_token_account()?
        .assert(|t| t.owner().eq(&sale.foundation))?
        .assert(|t| t.mint().eq(payment_mint_info.key))?;

    transfer(
        buyer_info,
        buyer_payment_ata_info,
        foundation_payment_ata_info,
        token_program_info,
        purchase.payment,
    )?;

    settle_purchase(
        buyer_info,
        sale_info,
        sale_mint_info,
        token_program_info,
        &Payees {
            buyer_sale_ata: buyer_sale_ata_info,
            referral_atas: [referral_l1_info, referral_l2_info, referral_l3_info],
            referral_records: [record_l1_info, record_l2_info],
        },
        &purchase,
        referral,
        sale_decimals,
    )
}
