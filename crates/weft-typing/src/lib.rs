//! Type inference engine for the weft tensor IR.
//!
//! The solver collects equality and relation constraints over IR types and
//! drives a worklist to a fixed point, unifying as it goes. See
//! [`solver::TypeSolver`] for the entry points.

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate weft_shared;

pub mod error;
pub mod mocks;
pub mod registry;
pub mod relations;
pub mod reporter;
pub mod solver;
pub mod subst;

mod unify;

pub use error::{TypeError, TypeErrorKind};
pub use reporter::TypeReporter;
pub use solver::TypeSolver;
