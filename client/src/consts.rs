pub const MAX_RETRIES: u32          = 30;
pub const RETRY_DELAY_MS: u64       = 500;

pub const COMPUTE_UNIT_LIMIT: u32   = 400_000;
