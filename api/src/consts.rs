use steel::*;

pub const SALE: &[u8]               = b"sale";
pub const COIN: &[u8]               = b"coin";
pub const NONCE: &[u8]              = b"nonce";
pub const REFERRAL: &[u8]           = b"referral";

pub const CODE_VERSION: u64         = 2;

pub const MAX_ADMINS: usize         = 4;
pub const MAX_PRESALE_BATCH: usize  = 8;

// Sale token and payment amounts are normalized to 18 decimals inside the core
pub const CANONICAL_DECIMALS: u8    = 18;
pub const NATIVE_DECIMALS: u8       = 9;

// Fixed rates are the price of one sale token in payment units over 10_000
// (1100 => 1 sale token = 0.11 anchor coin)
pub const RATE_DENOMINATOR: u64     = 10_000;

pub const RATE_MODE_FIXED: u8       = 1;
pub const RATE_MODE_POOL: u8        = 3;

pub const NATIVE_COIN_ID: u16       = 999;
pub const NATIVE_MINT: Pubkey       = spl_token::native_mint::ID;

pub const BPS: u64                  = 10_000;

// Referral cascade, basis points of the buyer amount
pub const REFERRAL_L1_BPS: u16      = 500;
pub const REFERRAL_L2_BPS: u16      = 300;
pub const REFERRAL_L3_BPS: u16      = 100;

// Presale treasury shares, basis points of the beneficiary amount
pub const PRESALE_TEAM_BPS: u16       = 10_500;
pub const PRESALE_FOUNDATION_BPS: u16 = 500;

// 40_000_000 sale tokens
pub const DEFAULT_SALE_CAP: u128    = 40_000_000 * 1_000_000_000_000_000_000;

// Vesting ledger interface
pub const VESTING_LOAD_PRESALE: u8  = 1;

// "\x19Ethereum Signed Message:\n32"
pub const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";
