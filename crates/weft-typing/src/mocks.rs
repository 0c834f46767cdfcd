//! Test support: named handles over the solver operations, mirroring the
//! harness the external test-suites drive.

use weft_shared::ty::{Attrs, Ty, TypeRelation};

use crate::{error::TypeError, solver::TypeSolver};

/// Build a relation constraint. `num_inputs` defaults to all arguments but
/// the last, matching the usual inputs-then-output layout.
pub fn make_rel(
    name: &str,
    args: Vec<Ty>,
    num_inputs: Option<usize>,
    attrs: Option<Attrs>,
) -> Ty {
    let num_inputs = num_inputs.unwrap_or_else(|| args.len().saturating_sub(1));
    Ty::Relation(TypeRelation::new(
        name,
        args,
        num_inputs,
        attrs.unwrap_or_default(),
    ))
}

/// A solver plus the debug handles external harnesses drive.
#[derive(Default)]
pub struct TestSolver {
    pub solver: TypeSolver,
}

impl TestSolver {
    pub fn new() -> TestSolver {
        TestSolver {
            solver: TypeSolver::new(),
        }
    }

    /// Like `new`, but with solver tracing dispatched to stderr. Safe to
    /// call from multiple harnesses; only the first installs the logger.
    pub fn with_tracing() -> TestSolver {
        let _ = weft_shared::logger::try_init(log::LevelFilter::Trace);
        TestSolver::new()
    }

    pub fn solve(&mut self) -> Result<bool, TypeError> {
        self.solver.solve()
    }

    pub fn unify(&mut self, dst: &Ty, src: &Ty) -> Result<Ty, TypeError> {
        self.solver.unify(dst, src)
    }

    pub fn resolve(&mut self, t: &Ty) -> Ty {
        self.solver.resolve(t)
    }

    pub fn add_constraint(&mut self, c: Ty) -> Result<(), TypeError> {
        self.solver.add_constraint(c)
    }

    /// Register `name(args.., out)` and hand back `out`, a fresh hole
    /// unless one is supplied.
    pub fn gen_type(&mut self, name: &str, args: Vec<Ty>, out: Option<Ty>) -> Result<Ty, TypeError> {
        let out = out.unwrap_or_else(Ty::hole);
        let mut args = args;
        args.push(out.clone());
        self.add_constraint(make_rel(name, args, None, None))?;
        Ok(out)
    }
}
