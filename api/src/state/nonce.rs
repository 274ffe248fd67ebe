use steel::*;
use super::AccountType;

/// Last redeemed voucher nonce of a wallet.
/// PDA seeds: ["nonce", sale, wallet]
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct WalletNonce {
    pub sale: Pubkey,
    pub wallet: Pubkey,
    pub last_nonce: u64,

    pub bump: u8,
    _padding: [u8; 7],
}

account!(AccountType, WalletNonce);
