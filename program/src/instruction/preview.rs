use steel::*;
use solana_program::program::set_return_data;
use crowdsale_api::prelude::*;
use super::purchase::*;

pub fn process_preview_buy(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let raw_args = PreviewBuyIx::try_from_bytes(data)?;
    let args = raw_args.to_struct();

    solana_program::msg!("Args: {:?}", args);

    preview(accounts, None, args)
}

pub fn process_preview_buy_native(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let raw_args = PreviewBuyNativeIx::try_from_bytes(data)?;
    let args = raw_args.to_struct();

    solana_program::msg!("Args: {:?}", args);

    preview(accounts, Some(NATIVE_MINT), args)
}

/// Writes `(quote, coin_id)` as return data. Quote failures are reported as
/// a zero quote; only malformed accounts fail the instruction.
fn preview(accounts: &[AccountInfo], mint: Option<Pubkey>, args: ParsedPreviewBuyIx) -> ProgramResult {
    let [
        sale_info,
        sale_mint_info,
        coin_info,
        pool_coin_vault_info,
        pool_anchor_vault_info,
    ] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    let sale = sale_info.as_account::<SaleConfig>(&crowdsale_api::ID)?;

    let sale_decimals = sale_mint_decimals(&sale, sale_mint_info)?;

    // Token previews name the coin through the account itself
    let coin = match mint {
        Some(mint) => load_coin(coin_info, sale_info, &mint)?,
        None if is_initialized(coin_info, &crowdsale_api::ID) => {
            let coin = *coin_info.as_account::<CoinConfig>(&crowdsale_api::ID)?;
            load_coin(coin_info, sale_info, &coin.mint)?
        }
        None => None,
    };

    let preview = match price_purchase(
        sale,
        coin.as_ref(),
        pool_coin_vault_info,
        pool_anchor_vault_info,
        sale_decimals,
        args.amount,
        args.exact_output,
    ) {
        Ok(purchase) if args.exact_output => BuyPreview {
            quote: purchase.payment,
            coin_id: purchase.coin_id,
        },
        Ok(purchase) => BuyPreview {
            quote: purchase.buyer_tokens,
            coin_id: purchase.coin_id,
        },
        Err(err) => {
            solana_program::msg!("preview rejected: {:?}", err);
            BuyPreview::default()
        }
    };

    solana_program::msg!("quote: {}, coin: {}", preview.quote, preview.coin_id);

    set_return_data(&preview.to_bytes());

    Ok(())
}
