//! Unification over the interned type store.
//!
//! Holes absorb whatever they are unified with (guarded by the occurs
//! check), tuples and function types unify structurally, and everything
//! else must already be equal. Quantified function types are instantiated
//! on contact: each bound variable is alpha-renamed to a fresh hole, memoised
//! for the lifetime of the solver so that repeated occurrences of the same
//! variable collapse into one hole.

use weft_shared::ty::{FuncTy, Ty};

use crate::{
    error::TypeError,
    solver::{TypeNodeId, TypeSolver},
    subst::Substitutable,
};

impl TypeSolver {
    /// Add the equality `dst = src`, returning the merged type. Structural
    /// disagreement and cyclic equalities are fatal.
    pub fn unify(&mut self, dst: &Ty, src: &Ty) -> Result<Ty, TypeError> {
        log::debug!("unify {} = {}", dst, src);
        let dst = self.instantiate_var(dst);
        let src = self.instantiate_var(src);
        let lhs = self.get_type_node(&dst);
        let rhs = self.get_type_node(&src);
        let lroot = self.find_root(lhs);
        let rroot = self.find_root(rhs);

        // A reflexive equality is legal and must short-circuit before the
        // occurs check sees it.
        if lroot == rroot {
            return Ok(self.resolved_type(lroot).clone());
        }

        let lty = self.resolved_type(lroot).clone();
        let rty = self.resolved_type(rroot).clone();
        if lty.is_incomplete() {
            if self.occurs(lroot, &rty) {
                return Err(TypeError::recursive_unify(lty, rty));
            }
            self.merge_from_to(lroot, rroot);
            return Ok(rty);
        }
        if rty.is_incomplete() {
            if self.occurs(rroot, &lty) {
                return Err(TypeError::recursive_unify(rty, lty));
            }
            self.merge_from_to(rroot, lroot);
            return Ok(lty);
        }

        // Both sides are concrete: recurse on the pair of shapes, then fold
        // both classes into the class of the freshly built result so later
        // queries see what we return here.
        let resolved = self.unify_shapes(lty, rty)?;
        let top = self.get_type_node(&resolved);
        self.merge_from_to(lroot, top);
        self.merge_from_to(rroot, top);
        Ok(resolved)
    }

    /// A bound type variable is replaced by a fresh hole of the same kind
    /// the first time it is seen; afterwards the memoised hole is reused.
    fn instantiate_var(&mut self, t: &Ty) -> Ty {
        let Ty::Var(tv) = t else {
            return t.clone();
        };
        if let Some(hole) = self.tv_map.get(tv) {
            return hole.clone();
        }
        let hole = Ty::hole_with_kind(tv.kind);
        self.tv_map.insert(tv.clone(), hole.clone());
        hole
    }

    /// Alpha-rename a function type's parameters to fresh holes and drop
    /// the parameter list; the result is monomorphic.
    fn instantiate_func(&mut self, ft: FuncTy) -> FuncTy {
        for tp in &ft.ty_params {
            self.instantiate_var(&Ty::Var(tp.clone()));
        }
        let mut ft = FuncTy {
            ty_params: vec![],
            ..ft
        };
        ft.apply_subst(&self.tv_map);
        ft
    }

    fn unify_shapes(&mut self, lhs: Ty, rhs: Ty) -> Result<Ty, TypeError> {
        match (lhs, rhs) {
            (Ty::Tuple(a), Ty::Tuple(b)) => {
                if a.len() != b.len() {
                    return Err(TypeError::mismatch(Ty::Tuple(a), Ty::Tuple(b)));
                }
                let mut fields = Vec::with_capacity(a.len());
                for (x, y) in a.into_iter().zip(b) {
                    fields.push(self.unify(&x, &y)?);
                }
                Ok(Ty::Tuple(fields))
            }
            (Ty::Func(a), Ty::Func(b)) => {
                if a.args.len() != b.args.len() || a.constraints.len() != b.constraints.len() {
                    return Err(TypeError::mismatch(Ty::Func(a), Ty::Func(b)));
                }
                let a = self.instantiate_func(a);
                let b = self.instantiate_func(b);
                let ret = self.unify(&a.ret, &b.ret)?;
                let mut args = Vec::with_capacity(a.args.len());
                for (x, y) in a.args.iter().zip(b.args.iter()) {
                    args.push(self.unify(x, y)?);
                }
                let mut constraints = Vec::with_capacity(a.constraints.len());
                for (x, y) in a.constraints.iter().zip(b.constraints.iter()) {
                    let merged = self.unify(x, y)?;
                    if !merged.is_constraint() {
                        return Err(TypeError::non_constraint(x.clone(), y.clone()));
                    }
                    constraints.push(merged);
                }
                Ok(Ty::Func(FuncTy::new(args, ret).with_constraints(constraints)))
            }
            // Leaf types (and relations) unify only if they are already
            // equal.
            (lhs, rhs) => {
                if lhs == rhs {
                    Ok(lhs)
                } else {
                    Err(TypeError::mismatch(lhs, rhs))
                }
            }
        }
    }

    /// True iff a hole whose class root is `var` occurs anywhere in `t`.
    /// Callers must have ruled out the reflexive case first.
    pub(crate) fn occurs(&mut self, var: TypeNodeId, t: &Ty) -> bool {
        match t {
            Ty::Incomplete(_) => {
                let id = self.get_type_node(t);
                self.find_root(id) == var
            }
            Ty::Var(_) | Ty::Tensor(_) | Ty::Prim(_) => false,
            Ty::Tuple(fields) => {
                for field in fields {
                    if self.occurs(var, field) {
                        return true;
                    }
                }
                false
            }
            Ty::Func(f) => {
                if self.occurs(var, &f.ret) {
                    return true;
                }
                for arg in &f.args {
                    if self.occurs(var, arg) {
                        return true;
                    }
                }
                for c in &f.constraints {
                    if self.occurs(var, c) {
                        return true;
                    }
                }
                false
            }
            Ty::Relation(rel) => {
                for arg in &rel.args {
                    if self.occurs(var, arg) {
                        return true;
                    }
                }
                false
            }
        }
    }
}
