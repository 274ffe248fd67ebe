#![allow(unexpected_cfgs)]

pub mod access;
pub mod consts;
pub mod cpis;
pub mod error;
pub mod event;
pub mod instruction;
pub mod math;
pub mod pda;
pub mod state;
pub mod utils;
pub mod voucher;
mod macros;

#[cfg(not(target_os = "solana"))]
pub mod sdk;

pub mod prelude {
    pub use crate::access::*;
    pub use crate::consts::*;
    pub use crate::cpis::*;
    pub use crate::error::*;
    pub use crate::event::*;
    pub use crate::instruction::*;
    pub use crate::math::*;
    pub use crate::pda::*;
    pub use crate::state::*;
    pub use crate::utils::*;
    pub use crate::voucher::*;

    #[cfg(not(target_os = "solana"))]
    pub use crate::sdk::*;
}

use steel::*;

declare_id!("qgsq3HhfQUViyFN39JbEMPBZEPpyHTU6ZPB3Kid751C");
