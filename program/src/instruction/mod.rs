pub mod purchase;
pub mod sale;
pub mod coin;
pub mod buy;
pub mod buy_native;
pub mod preview;
pub mod presale;

pub use sale::*;
pub use coin::*;
pub use buy::*;
pub use buy_native::*;
pub use preview::*;
pub use presale::*;
