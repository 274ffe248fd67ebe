#![cfg(test)]
use crowdsale_api::prelude::*;
use libsecp256k1::{Message, PublicKey, SecretKey};

/// Off-chain signer standing in for the sale oracle.
pub struct TestOracle {
    secret: SecretKey,
}

impl TestOracle {
    pub fn new(seed: u8) -> Self {
        let secret = SecretKey::parse(&[seed; 32]).unwrap();
        Self { secret }
    }

    pub fn address(&self) -> EthAddress {
        let pubkey = PublicKey::from_secret_key(&self.secret).serialize();
        let mut raw = [0u8; 64];
        raw.copy_from_slice(&pubkey[1..]);
        eth_address(&raw)
    }

    pub fn sign(&self, intent: &PurchaseIntent) -> [u8; SIGNATURE_LEN] {
        let (signature, recovery_id) = libsecp256k1::sign(&Message::parse(&intent.digest()), &self.secret);
        let mut out = [0u8; SIGNATURE_LEN];
        out[..64].copy_from_slice(&signature.serialize());
        out[64] = recovery_id.serialize() + 27;
        out
    }
}
