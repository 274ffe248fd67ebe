#![cfg(test)]
use std::path::PathBuf;
use solana_sdk::{instruction::Instruction, signature::Keypair, signer::Signer, transaction::Transaction};
use litesvm::{types::TransactionResult, LiteSVM};
use super::print_tx;

pub fn program_bytes() -> Vec<u8> {
    let mut so_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    so_path.push("../target/deploy/crowdsale.so");
    std::fs::read(so_path).unwrap()
}

pub fn setup_svm() -> LiteSVM {
    let mut svm = LiteSVM::new();
    svm.add_program(crowdsale_api::ID, &program_bytes());
    svm
}

pub fn send_tx(svm: &mut LiteSVM, tx: Transaction) -> TransactionResult {
    let res = svm.send_transaction(tx.clone());

    let meta = match res.as_ref() {
        Ok(v) => v.clone(),
        Err(v) => v.meta.clone()
    };

    print_tx(meta, tx);

    if res.is_err() {
        println!("error:\t{:?}", res.as_ref().err().unwrap().err);
    }

    res
}

pub fn create_payer(svm: &mut LiteSVM) -> Keypair {
    let payer_kp = Keypair::new();
    let payer_pk = payer_kp.pubkey();
    svm.airdrop(&payer_pk, 10_000_000_000).unwrap();
    payer_kp
}

pub fn send_ix(svm: &mut LiteSVM, ix: Instruction, signer: &Keypair) -> TransactionResult {
    svm.expire_blockhash();
    let blockhash = svm.latest_blockhash();
    let tx = Transaction::new_signed_with_payer(&[ix], Some(&signer.pubkey()), &[signer], blockhash);
    send_tx(svm, tx)
}

pub fn create_keypair() -> Keypair {
    Keypair::new()
}
