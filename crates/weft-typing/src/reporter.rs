//! The callback surface handed to a firing relation function.

use weft_shared::ty::{IndexExpr, Ty};

use crate::{error::TypeError, solver::TypeSolver};

/// What a relation function may tell the solver while it fires.
///
/// `assert`/`assert_eq` are authoring hints: they never record a
/// constraint, they only let a relation bail out of its own firing when a
/// shape provably contradicts. A condition that does not fold to a
/// constant cannot be falsified and reports `true`.
pub trait TypeReporter {
    /// Record the equality `dst = src`.
    fn assign(&mut self, dst: &Ty, src: &Ty) -> Result<(), TypeError>;

    /// Truthiness of `cond` if it folds to an unsigned constant.
    fn assert(&self, cond: &IndexExpr) -> bool;

    /// Whether `lhs - rhs` folds to zero; signed fold, unlike `assert`.
    fn assert_eq(&self, lhs: &IndexExpr, rhs: &IndexExpr) -> bool;
}

pub(crate) struct SolverReporter<'a> {
    pub(crate) solver: &'a mut TypeSolver,
}

impl TypeReporter for SolverReporter<'_> {
    fn assign(&mut self, dst: &Ty, src: &Ty) -> Result<(), TypeError> {
        self.solver.unify(dst, src).map(|_| ())
    }

    fn assert(&self, cond: &IndexExpr) -> bool {
        match cond.as_const_uint() {
            Some(v) => v != 0,
            None => true,
        }
    }

    fn assert_eq(&self, lhs: &IndexExpr, rhs: &IndexExpr) -> bool {
        match (lhs.clone() - rhs.clone()).as_const_int() {
            Some(diff) => diff == 0,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SolverReporter, TypeReporter};
    use crate::solver::TypeSolver;
    use weft_shared::ty::IndexExpr;

    #[test]
    fn asserts_fold_constants_and_default_to_true() {
        let mut solver = TypeSolver::new();
        let reporter = SolverReporter { solver: &mut solver };

        assert!(reporter.assert(&IndexExpr::from(7)));
        assert!(!reporter.assert(&IndexExpr::from(0)));
        // Negative constants do not fold as unsigned, so they cannot be
        // falsified.
        assert!(reporter.assert(&(IndexExpr::from(0) - IndexExpr::from(1))));
        assert!(reporter.assert(&IndexExpr::var("n")));

        assert!(reporter.assert_eq(&IndexExpr::from(10), &IndexExpr::from(10)));
        assert!(!reporter.assert_eq(&IndexExpr::from(10), &IndexExpr::from(20)));
        assert!(reporter.assert_eq(&IndexExpr::var("n"), &IndexExpr::from(10)));
    }
}
