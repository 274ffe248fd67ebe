mod account;
mod ata;
mod codec;
mod mint;
mod retry;
mod rpc;

pub use account::*;
pub use ata::*;
pub use codec::*;
pub use mint::*;
pub use retry::*;
pub use rpc::*;
