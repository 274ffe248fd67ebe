mod coin;
mod nonce;
mod referral;
mod sale;

pub use coin::*;
pub use nonce::*;
pub use referral::*;
pub use sale::*;

use steel::*;

/// Discriminator for crowdsale program accounts.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
pub enum AccountType {
    Unknown = 0,
    SaleConfig,
    CoinConfig,
    WalletNonce,
}
