use steel::*;
use crowdsale_api::prelude::*;

pub fn process_initialize_sale(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let raw_args = InitializeSaleIx::try_from_bytes(data)?;
    let args = raw_args.to_struct();

    let [
        authority_info,
        sale_mint_info,
        sale_info,
        system_program_info,
    ] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    solana_program::msg!("Args: {:?}", args);

    check_signer(authority_info)?;
    check_mut(sale_info)?;
    check_program(system_program_info, &system_program::id())?;

    sale_mint_info.as_mint()?;

    check_condition(args.cap > 0, "Sale cap must be positive")?;
    check_condition(
        args.foundation != Pubkey::default() && args.default_referral != Pubkey::default(),
        "Payout wallets must be set"
    )?;

    let seeds: &[&[u8]] = &[SALE, sale_mint_info.key.as_ref()];
    check_uninitialized_pda(sale_info, seeds, &crowdsale_api::id())?;

    create_program_account_with_bump::<SaleConfig>(
        sale_info,
        system_program_info,
        authority_info,
        &crowdsale_api::ID,
        seeds,
        args.bump,
    )?;

    let sale = sale_info.as_account_mut::<SaleConfig>(&crowdsale_api::ID)?;

    sale.authority = *authority_info.key;
    sale.presale_loader = args.presale_loader;
    sale.sale_mint = *sale_mint_info.key;
    sale.foundation = args.foundation;
    sale.team = args.team;
    sale.default_referral = args.default_referral;
    sale.referral_program = args.referral_program;
    sale.vesting_program = args.vesting_program;
    sale.set_cap(args.cap);
    sale.referral_bps = [REFERRAL_L1_BPS, REFERRAL_L2_BPS, REFERRAL_L3_BPS];
    sale.team_bps = PRESALE_TEAM_BPS;
    sale.foundation_bps = PRESALE_FOUNDATION_BPS;
    sale.bump = args.bump;

    Ok(())
}

pub fn process_add_admin(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let args = AddAdminIx::try_from_bytes(data)?;

    let [
        signer_info,
        sale_info,
    ] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    solana_program::msg!("Args: {:?}", args);

    check_signer(signer_info)?;
    check_mut(sale_info)?;

    let sale = sale_info.as_account_mut::<SaleConfig>(&crowdsale_api::ID)?;
    require_role(&*sale, signer_info.key, Role::Admin)?;

    sale.add_admin(args.admin)?;

    Ok(())
}

pub fn process_set_oracle(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let args = SetOracleIx::try_from_bytes(data)?;

    let [
        signer_info,
        sale_info,
    ] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    solana_program::msg!("Args: {:?}", args);

    check_signer(signer_info)?;
    check_mut(sale_info)?;

    let sale = sale_info.as_account_mut::<SaleConfig>(&crowdsale_api::ID)?;
    require_role(&*sale, signer_info.key, Role::Admin)?;

    sale.oracle = args.oracle;

    Ok(())
}
