use solana_program::{
    instruction::{AccountMeta, Instruction},
    program::{invoke, invoke_signed},
    system_instruction,
};
use steel::*;
use crate::consts::*;

/// Moves lamports attached to a native purchase from the buyer.
pub fn transfer_lamports<'info>(
    from: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    lamports: u64,
) -> ProgramResult {
    invoke(
        &system_instruction::transfer(from.key, to.key, lamports),
        &[
            from.clone(),
            to.clone(),
            system_program.clone(),
        ],
    )
}

/// `LoadPresale { beneficiary, amount, since }` of the vesting ledger.
/// Accounts: [sale authority (signer), vesting ledger (writable)].
pub fn load_presale_ix(
    vesting_program: Pubkey,
    vesting_ledger: Pubkey,
    sale: Pubkey,
    beneficiary: Pubkey,
    amount: u64,
    since: i64,
) -> Instruction {
    let mut data = Vec::with_capacity(1 + 32 + 8 + 8);
    data.push(VESTING_LOAD_PRESALE);
    data.extend_from_slice(beneficiary.as_ref());
    data.extend_from_slice(&amount.to_le_bytes());
    data.extend_from_slice(&since.to_le_bytes());

    Instruction {
        program_id: vesting_program,
        accounts: vec![
            AccountMeta::new_readonly(sale, true),
            AccountMeta::new(vesting_ledger, false),
        ],
        data,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn load_presale_signed_with_bump<'info>(
    vesting_program: &AccountInfo<'info>,
    vesting_ledger: &AccountInfo<'info>,
    sale: &AccountInfo<'info>,
    beneficiary: &Pubkey,
    amount: u64,
    since: i64,
    seeds: &[&[u8]],
    bump: u8,
) -> ProgramResult {
    let bump = [bump];
    let mut signer_seeds = seeds.to_vec();
    signer_seeds.push(&bump);

    invoke_signed(
        &load_presale_ix(
            *vesting_program.key,
            *vesting_ledger.key,
            *sale.key,
            *beneficiary,
            amount,
            since,
        ),
        &[
            sale.clone(),
            vesting_ledger.clone(),
            vesting_program.clone(),
        ],
        &[&signer_seeds],
    )
}
