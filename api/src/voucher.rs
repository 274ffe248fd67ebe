use steel::*;
use solana_program::keccak;
use solana_program::secp256k1_recover::secp256k1_recover;
use crate::consts::*;
use crate::error::SaleError;

pub type EthAddress = [u8; 20];

pub const SIGNATURE_LEN: usize = 65;

/// Purchase authorized off-chain by the oracle. Never stored; only its
/// digest is signed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PurchaseIntent {
    pub buyer: Pubkey,
    /// `None` for the native path.
    pub payment_mint: Option<Pubkey>,
    pub amount: u64,
    pub referral: Pubkey,
    pub exact_output: bool,
    pub nonce: u64,
    pub program_id: Pubkey,
    /// Sale the voucher is redeemed against; nonces are tracked per sale.
    pub sale: Pubkey,
}

impl PurchaseIntent {
    /// Packed fields in signing order.
    pub fn message(&self) -> Vec<u8> {
        let mut message = Vec::with_capacity(32 * 5 + 8 + 1 + 8);
        message.extend_from_slice(self.buyer.as_ref());
        if let Some(mint) = self.payment_mint {
            message.extend_from_slice(mint.as_ref());
        }
        message.extend_from_slice(&self.amount.to_le_bytes());
        message.extend_from_slice(self.referral.as_ref());
        message.push(self.exact_output as u8);
        message.extend_from_slice(&self.nonce.to_le_bytes());
        message.extend_from_slice(self.program_id.as_ref());
        message.extend_from_slice(self.sale.as_ref());
        message
    }

    /// Personal-sign digest of the message hash.
    pub fn digest(&self) -> [u8; 32] {
        let inner = keccak::hash(&self.message());
        keccak::hashv(&[SIGNED_MESSAGE_PREFIX, inner.as_ref()]).to_bytes()
    }
}

/// Address of an uncompressed secp256k1 key (without the 0x04 tag).
pub fn eth_address(pubkey: &[u8; 64]) -> EthAddress {
    let hash = keccak::hash(pubkey).to_bytes();
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Recovers the signer of `digest` from an `r || s || v` signature.
pub fn recover_signer(digest: &[u8; 32], signature: &[u8]) -> Result<EthAddress, SaleError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(SaleError::SignInvalid);
    }

    let recovery_id = match signature[64] {
        v @ 0..=1 => v,
        v @ 27..=28 => v - 27,
        _ => return Err(SaleError::SignInvalid),
    };

    let pubkey = secp256k1_recover(digest, recovery_id, &signature[..64])
        .map_err(|_| SaleError::SignInvalid)?;

    Ok(eth_address(&pubkey.to_bytes()))
}

/// Checks a voucher against the oracle and the wallet's last redeemed nonce,
/// returning the nonce to store on success.
///
/// Every failure is reported as [`SaleError::SignInvalid`] so a caller
/// cannot learn which field was rejected.
pub fn verify_voucher(
    intent: &PurchaseIntent,
    signature: &[u8],
    oracle: &EthAddress,
    last_nonce: u64,
) -> Result<u64, SaleError> {
    if *oracle == EthAddress::default() {
        return Err(SaleError::SignInvalid);
    }

    let expected = last_nonce.checked_add(1).ok_or(SaleError::SignInvalid)?;
    if intent.nonce != expected {
        return Err(SaleError::SignInvalid);
    }

    let signer = recover_signer(&intent.digest(), signature)?;
    if signer != *oracle {
        return Err(SaleError::SignInvalid);
    }

    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Oracle {
        secret: libsecp256k1::SecretKey,
    }

    impl Oracle {
        fn new(seed: u8) -> Self {
            Self {
                secret: libsecp256k1::SecretKey::parse(&[seed; 32]).unwrap(),
            }
        }

        fn address(&self) -> EthAddress {
            let pubkey = libsecp256k1::PublicKey::from_secret_key(&self.secret).serialize();
            eth_address(pubkey[1..].try_into().unwrap())
        }

        fn sign(&self, intent: &PurchaseIntent) -> [u8; SIGNATURE_LEN] {
            let message = libsecp256k1::Message::parse(&intent.digest());
            let (sig, recovery_id) = libsecp256k1::sign(&message, &self.secret);
            let mut out = [0u8; SIGNATURE_LEN];
            out[..64].copy_from_slice(&sig.serialize());
            out[64] = recovery_id.serialize() + 27;
            out
        }
    }

    fn intent(nonce: u64) -> PurchaseIntent {
        PurchaseIntent {
            buyer: Pubkey::new_from_array([1; 32]),
            payment_mint: Some(Pubkey::new_from_array([2; 32])),
            amount: 1_000_000,
            referral: Pubkey::new_from_array([3; 32]),
            exact_output: false,
            nonce,
            program_id: crate::ID,
            sale: Pubkey::new_from_array([4; 32]),
        }
    }

    #[test]
    fn test_valid_voucher_advances_nonce() {
        let oracle = Oracle::new(7);
        let voucher = intent(1);
        let sig = oracle.sign(&voucher);

        assert_eq!(verify_voucher(&voucher, &sig, &oracle.address(), 0), Ok(1));
    }

    #[test]
    fn test_raw_recovery_id_is_accepted() {
        let oracle = Oracle::new(7);
        let voucher = intent(1);
        let mut sig = oracle.sign(&voucher);
        sig[64] -= 27;

        assert_eq!(verify_voucher(&voucher, &sig, &oracle.address(), 0), Ok(1));

        sig[64] = 5;
        assert_eq!(verify_voucher(&voucher, &sig, &oracle.address(), 0), Err(SaleError::SignInvalid));
    }

    #[test]
    fn test_replay_and_skipped_nonces_fail() {
        let oracle = Oracle::new(7);
        let first = intent(1);
        let sig = oracle.sign(&first);

        let last = verify_voucher(&first, &sig, &oracle.address(), 0).unwrap();
        assert_eq!(verify_voucher(&first, &sig, &oracle.address(), last), Err(SaleError::SignInvalid));

        let skipped = intent(3);
        let sig = oracle.sign(&skipped);
        assert_eq!(verify_voucher(&skipped, &sig, &oracle.address(), last), Err(SaleError::SignInvalid));

        let next = intent(2);
        let sig = oracle.sign(&next);
        assert_eq!(verify_voucher(&next, &sig, &oracle.address(), last), Ok(2));
    }

    #[test]
    fn test_any_tampered_field_fails() {
        let oracle = Oracle::new(7);
        let signed = intent(1);
        let sig = oracle.sign(&signed);

        let tampered = [
            PurchaseIntent { buyer: Pubkey::new_from_array([9; 32]), ..signed },
            PurchaseIntent { payment_mint: Some(Pubkey::new_from_array([9; 32])), ..signed },
            PurchaseIntent { payment_mint: None, ..signed },
            PurchaseIntent { amount: signed.amount + 1, ..signed },
            PurchaseIntent { referral: Pubkey::default(), ..signed },
            PurchaseIntent { exact_output: true, ..signed },
            PurchaseIntent { program_id: Pubkey::new_from_array([9; 32]), ..signed },
            PurchaseIntent { sale: Pubkey::new_from_array([9; 32]), ..signed },
        ];

        for voucher in tampered {
            assert_eq!(
                verify_voucher(&voucher, &sig, &oracle.address(), 0),
                Err(SaleError::SignInvalid),
                "{:?}",
                voucher
            );
        }

        // a nonce bump is rejected even when the stored nonce is moved along with it
        let bumped = PurchaseIntent { nonce: 2, ..signed };
        assert_eq!(verify_voucher(&bumped, &sig, &oracle.address(), 1), Err(SaleError::SignInvalid));
    }

    #[test]
    fn test_wrong_or_unset_oracle_fails() {
        let oracle = Oracle::new(7);
        let impostor = Oracle::new(8);
        let voucher = intent(1);

        let sig = impostor.sign(&voucher);
        assert_eq!(verify_voucher(&voucher, &sig, &oracle.address(), 0), Err(SaleError::SignInvalid));

        let sig = oracle.sign(&voucher);
        assert_eq!(verify_voucher(&voucher, &sig, &EthAddress::default(), 0), Err(SaleError::SignInvalid));
        assert_eq!(verify_voucher(&voucher, &sig[..64], &oracle.address(), 0), Err(SaleError::SignInvalid));
    }

    #[test]
    fn test_voucher_is_bound_to_one_sale() {
        let oracle = Oracle::new(7);
        let voucher = intent(1);
        let sig = oracle.sign(&voucher);
        assert_eq!(verify_voucher(&voucher, &sig, &oracle.address(), 0), Ok(1));

        // same oracle, same wallet, fresh nonce on another sale
        let other_sale = PurchaseIntent { sale: Pubkey::new_from_array([5; 32]), ..voucher };
        assert_eq!(verify_voucher(&other_sale, &sig, &oracle.address(), 0), Err(SaleError::SignInvalid));
    }

    #[test]
    fn test_native_message_omits_the_mint() {
        let token = intent(1);
        let native = PurchaseIntent { payment_mint: None, ..token };
        assert_eq!(token.message().len(), native.message().len() + 32);
    }
}
