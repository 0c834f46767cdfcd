mod dtype;
mod idx;
mod ty;
mod var;

pub use dtype::*;
pub use idx::*;
pub use ty::*;
pub use var::*;
