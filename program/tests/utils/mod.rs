mod svm;
mod token;
mod print;
mod voucher;

pub use svm::*;
pub use token::*;
pub use print::*;
pub use voucher::*;
