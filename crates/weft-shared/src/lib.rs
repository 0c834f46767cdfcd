#[macro_use]
pub mod macros;

pub mod logger;
pub mod ty;
pub mod utils;
