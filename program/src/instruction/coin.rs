use steel::*;
use crowdsale_api::prelude::*;

/// Registers a payment coin or updates its rate. The first regular coin
/// becomes the anchor every pool-derived rate is expressed against.
pub fn process_fetch_coin(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let raw_args = FetchCoinIx::try_from_bytes(data)?;
    let args = raw_args.to_struct();

    let [
        signer_info,
        sale_info,
        mint_info,
        coin_info,
        system_program_info,
        pool_infos @ ..
    ] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    solana_program::msg!("Args: {:?}", args);

    check_signer(signer_info)?;
    check_mut(sale_info)?;
    check_mut(coin_info)?;
    check_program(system_program_info, &system_program::id())?;

    let sale = sale_info.as_account_mut::<SaleConfig>(&crowdsale_api::ID)?;
    require_role(&*sale, signer_info.key, Role::Admin)?;

    match args.rate_mode {
        RATE_MODE_FIXED if args.rate > 0 => {}
        RATE_MODE_POOL => {}
        _ => return Err(SaleError::InvalidRate.into()),
    }

    let native = mint_info.key.eq(&NATIVE_MINT);
    let is_anchor = !native && (!sale.has_anchor() || sale.anchor_mint.eq(mint_info.key));
    if is_anchor && args.rate_mode != RATE_MODE_FIXED {
        return Err(SaleError::InvalidRate.into());
    }

    let seeds: &[&[u8]] = &[COIN, sale_info.key.as_ref(), mint_info.key.as_ref()];

    if !is_initialized(coin_info, &crowdsale_api::ID) {
        check_uninitialized_pda(coin_info, seeds, &crowdsale_api::id())?;

        let decimals = if native {
            NATIVE_DECIMALS
        } else {
            mint_info.as_mint()?.decimals()
        };

        let id = if native {
            NATIVE_COIN_ID
        } else {
            sale.coin_count = sale.coin_count
                .checked_add(1)
                .ok_or(SaleError::MathOverflow)?;
            check_condition(sale.coin_count != NATIVE_COIN_ID, "Coin id space exhausted")?;
            sale.coin_count
        };

        create_program_account_with_bump::<CoinConfig>(
            coin_info,
            system_program_info,
            signer_info,
            &crowdsale_api::ID,
            seeds,
            args.bump,
        )?;

        let coin = coin_info.as_account_mut::<CoinConfig>(&crowdsale_api::ID)?;
        coin.sale = *sale_info.key;
        coin.mint = *mint_info.key;
        coin.id = id;
        coin.decimals = decimals;
        coin.bump = args.bump;

        solana_program::msg!("registered coin {} with id {}", mint_info.key, id);
    } else {
        check_seeds(coin_info, seeds, &crowdsale_api::ID)?;
    }

    let coin = coin_info.as_account_mut::<CoinConfig>(&crowdsale_api::ID)?;

    if is_anchor {
        sale.anchor_mint = *mint_info.key;
        sale.anchor_rate = args.rate;
        sale.anchor_decimals = coin.decimals;
    }

    if args.rate_mode == RATE_MODE_POOL {
        let [coin_vault_info, anchor_vault_info, ..] = pool_infos else {
            return Err(SaleError::PoolUnavailable.into());
        };
        check_condition(sale.has_anchor(), "Anchor coin not registered")?;

        coin_vault_info.as_token_account()?
            .assert(|t| t.mint().eq(mint_info.key))?;
        anchor_vault_info.as_token_account()?
            .assert(|t| t.mint().eq(&sale.anchor_mint))?;

        coin.pool_coin_vault = *coin_vault_info.key;
        coin.pool_anchor_vault = *anchor_vault_info.key;
        coin.fixed_rate = 0;
    } else {
        coin.pool_coin_vault = Pubkey::default();
        coin.pool_anchor_vault = Pubkey::default();
        coin.fixed_rate = args.rate;
    }

    coin.rate_mode = args.rate_mode;

    Ok(())
}
