#![allow(unexpected_cfgs)]
use steel::*;
use crowdsale_api::prelude::*;

pub mod instruction;
mod security;

use instruction::*;

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    data: &[u8],
) -> ProgramResult {
    let (ix, data) = parse_instruction(&crowdsale_api::ID, program_id, data)?;

    match ix {
        InstructionType::Unknown => return Err(ProgramError::InvalidInstructionData),

        InstructionType::InitializeSaleIx => process_initialize_sale(accounts, data)?,
        InstructionType::AddAdminIx => process_add_admin(accounts, data)?,
        InstructionType::SetOracleIx => process_set_oracle(accounts, data)?,
        InstructionType::FetchCoinIx => process_fetch_coin(accounts, data)?,

        InstructionType::BuyIx => process_buy(accounts, data)?,
        InstructionType::BuyNativeIx => process_buy_native(accounts, data)?,
        InstructionType::BuySignedIx => process_buy_signed(accounts, data)?,
        InstructionType::BuyNativeSignedIx => process_buy_native_signed(accounts, data)?,

        InstructionType::PreviewBuyIx => process_preview_buy(accounts, data)?,
        InstructionType::PreviewBuyNativeIx => process_preview_buy_native(accounts, data)?,

        InstructionType::PresaleBulkLoadIx => process_presale_bulk_load(accounts, data)?,
    }

    Ok(())
}

entrypoint!(process_instruction);
