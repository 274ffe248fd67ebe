pub mod consts;
pub mod program;
pub mod views;
pub mod voucher;
mod utils;

pub use utils::*;
