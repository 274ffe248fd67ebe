use anyhow::{Result, anyhow};
use libsecp256k1::{Message, PublicKey, SecretKey};
use solana_sdk::pubkey::Pubkey;
use crowdsale_api::prelude::*;

/// Oracle key that authorizes signed purchases off-chain.
pub struct VoucherSigner {
    secret: SecretKey,
}

impl VoucherSigner {
    pub fn from_hex(secret: &str) -> Result<Self> {
        let raw = hex::decode(secret.trim_start_matches("0x"))
            .map_err(|e| anyhow!("Invalid oracle secret: {}", e))?;
        let secret = SecretKey::parse_slice(&raw)
            .map_err(|e| anyhow!("Invalid oracle secret: {:?}", e))?;
        Ok(Self { secret })
    }

    pub fn address(&self) -> EthAddress {
        let pubkey = PublicKey::from_secret_key(&self.secret).serialize();
        let mut raw = [0u8; 64];
        raw.copy_from_slice(&pubkey[1..]);
        eth_address(&raw)
    }

    /// `r || s || v` signature over the intent's digest, `v` in {27, 28}.
    pub fn sign(&self, intent: &PurchaseIntent) -> [u8; SIGNATURE_LEN] {
        let message = Message::parse(&intent.digest());
        let (signature, recovery_id) = libsecp256k1::sign(&message, &self.secret);

        let mut out = [0u8; SIGNATURE_LEN];
        out[..64].copy_from_slice(&signature.serialize());
        out[64] = recovery_id.serialize() + 27;
        out
    }
}

/// Intent for a purchase on the sale of `sale_mint`: a token purchase, or a
/// native one when `payment_mint` is `None`.
pub fn purchase_intent(
    sale_mint: &Pubkey,
    buyer: Pubkey,
    payment_mint: Option<Pubkey>,
    amount: u64,
    referral: Pubkey,
    exact_output: bool,
    nonce: u64,
) -> PurchaseIntent {
    PurchaseIntent {
        buyer,
        payment_mint,
        amount,
        referral,
        exact_output,
        nonce,
        program_id: crowdsale_api::ID,
        sale: find_sale_pda(sale_mint).0,
    }
}

pub fn parse_signature(value: &str) -> Result<[u8; SIGNATURE_LEN]> {
    let raw = hex::decode(value.trim_start_matches("0x"))
        .map_err(|e| anyhow!("Invalid voucher signature: {}", e))?;
    raw.try_into()
        .map_err(|_| anyhow!("Voucher signature must be {} bytes", SIGNATURE_LEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn test_signed_intent_recovers_oracle() {
        let signer = VoucherSigner::from_hex(SECRET).unwrap();
        let intent = purchase_intent(
            &Pubkey::new_unique(),
            Pubkey::new_unique(),
            Some(Pubkey::new_unique()),
            1_000_000,
            Pubkey::default(),
            false,
            1,
        );

        let signature = signer.sign(&intent);
        let next = verify_voucher(&intent, &signature, &signer.address(), 0).unwrap();
        assert_eq!(next, 1);

        let hex_signature = hex::encode(signature);
        assert_eq!(parse_signature(&hex_signature).unwrap(), signature);
    }

    #[test]
    fn test_known_address() {
        let signer = VoucherSigner::from_hex(SECRET).unwrap();
        assert_eq!(
            hex::encode(signer.address()),
            "2c7536e3605d9c16a7a3d7b1898e529396a65c23"
        );
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(VoucherSigner::from_hex("zz").is_err());
        assert!(parse_signature("00").is_err());
    }
}
