use std::{
    collections::HashMap,
    ops::{Deref, DerefMut},
};

use weft_shared::ty::{FuncTy, Ty, TyVar};

/// A mapping from type variables to types.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Subst(HashMap<TyVar, Ty>);

impl Subst {
    pub fn new() -> Subst {
        Subst(HashMap::new())
    }
}

impl Deref for Subst {
    type Target = HashMap<TyVar, Ty>;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Subst {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl std::fmt::Display for Subst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(k, v)| (k.to_string(), v.to_string())))
            .finish()
    }
}

pub trait Substitutable {
    fn apply_subst(&mut self, subst: &Subst);
}

impl Substitutable for Ty {
    fn apply_subst(&mut self, subst: &Subst) {
        match self {
            Ty::Var(v) => {
                if let Some(ty) = subst.get(v) {
                    *self = ty.clone();
                }
            }
            Ty::Tuple(fields) => {
                for field in fields {
                    field.apply_subst(subst);
                }
            }
            Ty::Func(f) => f.apply_subst(subst),
            Ty::Relation(rel) => {
                for arg in rel.args.iter_mut() {
                    arg.apply_subst(subst);
                }
            }
            Ty::Incomplete(_) | Ty::Tensor(_) | Ty::Prim(_) => {}
        }
    }
}

impl Substitutable for FuncTy {
    fn apply_subst(&mut self, subst: &Subst) {
        // ty_params shadow any outer binding of the same variable.
        let narrowed;
        let subst = if self.ty_params.is_empty() {
            subst
        } else {
            let mut s = subst.clone();
            for tp in &self.ty_params {
                s.remove(tp);
            }
            narrowed = s;
            &narrowed
        };

        for arg in self.args.iter_mut() {
            arg.apply_subst(subst);
        }
        self.ret.apply_subst(subst);
        for c in self.constraints.iter_mut() {
            c.apply_subst(subst);
        }
    }
}

impl Substitutable for Vec<Ty> {
    fn apply_subst(&mut self, subst: &Subst) {
        for ty in self {
            ty.apply_subst(subst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Subst, Substitutable};
    use weft_shared::ty::{FuncTy, Ty, TyVar};

    #[test]
    fn replaces_free_vars_only() {
        let a = TyVar::new("a");
        let mut subst = Subst::new();
        subst.insert(a.clone(), Ty::int32());

        let mut free = Ty::Tuple(vec![Ty::Var(a.clone()), Ty::float32()]);
        free.apply_subst(&subst);
        assert_eq!(free, Ty::Tuple(vec![Ty::int32(), Ty::float32()]));

        // `a` is bound by the function's own parameter list here.
        let mut bound = Ty::Func(FuncTy::quantified(
            vec![Ty::Var(a.clone())],
            Ty::Var(a.clone()),
            vec![a.clone()],
        ));
        let expected = bound.clone();
        bound.apply_subst(&subst);
        assert_eq!(bound, expected);
    }
}
