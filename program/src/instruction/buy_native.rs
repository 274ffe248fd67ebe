use steel::*;
use crowdsale_api::prelude::*;
use super::purchase::*;

pub fn process_buy_native(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let raw_args = BuyNativeIx::try_from_bytes(data)?;
    let args = raw_args.to_struct();

    solana_program::msg!("Args: {:?}", args);

    buy_with_native(accounts, args.amount, args.value, &args.referral, args.exact_output)
}

pub fn process_buy_native_signed(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let raw_args = BuyNativeSignedIx::try_from_bytes(data)?;
    let args = raw_args.to_struct();

    let [
        native_accounts @ ..,
        nonce_info,
    ] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    let [
        buyer_info,
        sale_info,
        ..,
        system_program_info,
    ] = native_accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    solana_program::msg!("Args: {:?}", args);

    check_signer(buyer_info)?;

    let oracle = sale_info.as_account::<SaleConfig>(&crowdsale_api::ID)?.oracle;

    // The native voucher carries no mint; the value itself is not signed
    let intent = PurchaseIntent {
        buyer: *buyer_info.key,
        payment_mint: None,
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

    buy_with_native(native_accounts, args.amount, args.value, &args.referral, args.exact_output)
}

fn buy_with_native(
    accounts: &[AccountInfo],
    amount: u64,
    value: u64,
    referral: &Pubkey,
    exact_output: bool,
) -> ProgramResult {
    let [
        buyer_info,
        sale_info,
        sale_mint_info,
        coin_info,
        foundation_info,
        buyer_sale_ata_info,
        referral_l1_info,
        referral_l2_info,
        referral_l3_info,
        record_l1_info,
        record_l2_info,
        pool_coin_vault_info,
        pool_anchor_vault_info,
        token_program_info,
        system_program_info,
    ] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    // Basic checks
    check_signer(buyer_info)?;
    check_mut(sale_info)?;
    check_mut(sale_mint_info)?;
    check_mut(foundation_info)?;
    check_mut(buyer_sale_ata_info)?;
    check_mut(referral_l1_info)?;
    check_mut(referral_l2_info)?;
    check_mut(referral_l3_info)?;
    check_program(token_program_info, &spl_token::id())?;
    check_program(system_program_info, &system_program::id())?;

    let sale = *sale_info.as_account::<SaleConfig>(&crowdsale_api::ID)?;

    let sale_decimals = sale_mint_decimals(&sale, sale_mint_info)?;
    check_condition(
        sale.foundation.eq(foundation_info.key),
        "Foundation account does not match"
    )?;

    if amount == 0 {
        return Err(SaleError::AmountRequired.into());
    }
    if value == 0 {
        return Err(SaleError::NativeValueRequired.into());
    }
    if !exact_output && amount != value {
        return Err(SaleError::NativeValueMismatch.into());
    }

    let coin = load_coin(coin_info, sale_info, &NATIVE_MINT)?;

    let purchase = price_purchase(
        &sale,
        coin.as_ref(),
        pool_coin_vault_info,
        pool_anchor_vault_info,
        sale_decimals,
        amount,
        exact_output,
    )?;

    if purchase.payment != value {
        return Err(SaleError::NativeValueMismatch.into());
    }

    solana_program::msg!("paying: {} lamports", purchase.payment);
    solana_program::msg!("for: {}", purchase.buyer_tokens);

    transfer_lamports(
        buyer_info,
        foundation_info,
        system_program_info,
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
