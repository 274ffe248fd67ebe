use steel::*;
use crowdsale_api::prelude::*;

/// Reserves a batch of presale allocations and forwards each share to the
/// vesting ledger. The batch is reserved as a whole before any call goes out.
pub fn process_presale_bulk_load(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let raw_args = PresaleBulkLoadIx::try_from_bytes(data)?;
    let args = raw_args.to_struct()?;

    let [
        signer_info,
        sale_info,
        sale_mint_info,
        vesting_program_info,
        vesting_ledger_info,
    ] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    solana_program::msg!("Args: {:?}", args);

    check_signer(signer_info)?;
    check_mut(sale_info)?;
    check_mut(vesting_ledger_info)?;

    let sale = sale_info.as_account_mut::<SaleConfig>(&crowdsale_api::ID)?;
    require_role(&*sale, signer_info.key, Role::PresaleLoader)?;

    let decimals = sale_mint_decimals(&sale, sale_mint_info)?;
    check_program(vesting_program_info, &sale.vesting_program)?;

    let amounts = args.amounts
        .iter()
        .map(|a| to_canonical(*a as u128, decimals))
        .collect::<Result<Vec<_>, _>>()?;

    let mut ledger = sale.ledger();
    let allocations = ledger.reserve_presale(&sale.presale_shares(), &amounts)?;
    sale.commit(&ledger)?;

    solana_program::msg!("total sold: {}", sale.total_sold());

    let team = sale.team;
    let foundation = sale.foundation;
    let bump = sale.bump;
    let seeds: &[&[u8]] = &[SALE, sale.sale_mint.as_ref()];

    for (i, allocation) in allocations.iter().enumerate() {
        let beneficiary = args.beneficiaries[i];
        let since = args.since_dates[i];

        let shares = [
            (beneficiary, args.amounts[i]),
            (team, to_token_amount(from_canonical(allocation.team, decimals)?)?),
            (foundation, to_token_amount(from_canonical(allocation.foundation, decimals)?)?),
        ];

        for (holder, amount) in shares {
            if amount == 0 {
                continue;
            }

            load_presale_signed_with_bump(
                vesting_program_info,
                vesting_ledger_info,
                sale_info,
                &holder,
                amount,
                since,
                seeds,
                bump,
            )?;
        }

        PresaleEvent::new(beneficiary, args.amounts[i], since).log();
    }

    Ok(())
}
