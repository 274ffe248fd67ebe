#![cfg(test)]
use crowdsale_api::prelude::InstructionType;
use litesvm::types::TransactionMetadata;
use solana_sdk::transaction::Transaction;
use pretty_hex::*;

fn instruction_name(data: &[u8]) -> String {
    match data.first().map(|d| InstructionType::try_from(*d)) {
        Some(Ok(ix)) => format!("{:?}", ix),
        Some(Err(_)) => format!("foreign ({})", data[0]),
        None => "empty".to_string(),
    }
}

/// Dumps a processed transaction: instructions with their accounts and data,
/// compute used, return data and program logs.
pub fn print_tx(meta: TransactionMetadata, tx: Transaction) {
    let message = &tx.message;

    println!("\n================================================================================");
    println!("signature:\t{}", meta.signature);
    println!("size:\t\t{} bytes", message.serialize().len());

    for (i, ix) in message.instructions.iter().enumerate() {
        println!("\n[{}] {}", i, instruction_name(&ix.data));
        for index in &ix.accounts {
            println!("\t#{:<2} {}", index, message.account_keys[*index as usize]);
        }
        println!("{}", pretty_hex(&ix.data));
    }

    println!("\ncompute units:\t{}", meta.compute_units_consumed);
    if !meta.return_data.data.is_empty() {
        println!("return data:\t{:?}", meta.return_data.data);
    }

    println!("logs:");
    for log in &meta.logs {
        println!("\t{}", log);
    }
}
