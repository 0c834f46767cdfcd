use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::utils::join;

use super::{DataType, IncompleteTy, IndexExpr, Kind, TyVar};

/// Core type representation for the tensor IR.
///
/// `Tensor` and `Prim` are leaves as far as the solver is concerned: it
/// only ever compares them for structural equality. `Relation` is a
/// constraint embedded in the type language so that function types can
/// carry constraints and constraints can be unified against each other.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ty {
    // An unresolved hole; stands for a type yet to be inferred.
    Incomplete(IncompleteTy),

    // A bound polymorphic variable, owned by some `FuncTy::ty_params`.
    Var(TyVar),

    // Product types.
    Tuple(Vec<Ty>),

    // Function types, possibly quantified over `ty_params`.
    Func(FuncTy),

    // Tensor types: shape and element type.
    Tensor(TensorTy),

    // Scalar primitive types.
    Prim(DataType),

    // A type relation over a tuple of argument types.
    Relation(TypeRelation),
}

impl Ty {
    /// A fresh hole of kind `Type`.
    #[inline(always)]
    pub fn hole() -> Self {
        Ty::Incomplete(IncompleteTy::fresh(Kind::Type))
    }

    #[inline(always)]
    pub fn hole_with_kind(kind: Kind) -> Self {
        Ty::Incomplete(IncompleteTy::fresh(kind))
    }

    #[inline(always)]
    pub fn var<S: Into<String>>(name: S) -> Self {
        Ty::Var(TyVar::new(name))
    }

    /// Unit type `()`, represented as an empty tuple.
    #[inline(always)]
    pub fn unit() -> Self {
        Ty::Tuple(vec![])
    }

    #[inline(always)]
    pub fn int32() -> Self {
        Ty::Prim(DataType::int32())
    }

    #[inline(always)]
    pub fn float32() -> Self {
        Ty::Prim(DataType::float32())
    }

    /// A tensor type with constant dimensions.
    pub fn tensor(shape: &[i64], dtype: DataType) -> Self {
        Ty::Tensor(TensorTy::new(
            shape.iter().map(|&d| IndexExpr::Int(d)),
            dtype,
        ))
    }

    pub fn is_incomplete(&self) -> bool {
        matches!(self, Ty::Incomplete(_))
    }

    pub fn is_constraint(&self) -> bool {
        matches!(self, Ty::Relation(_))
    }

    /// True if no hole occurs anywhere in this type.
    pub fn is_concrete(&self) -> bool {
        match self {
            Ty::Incomplete(_) => false,
            Ty::Var(_) | Ty::Tensor(_) | Ty::Prim(_) => true,
            Ty::Tuple(fields) => fields.iter().all(Ty::is_concrete),
            Ty::Func(f) => {
                f.ret.is_concrete()
                    && f.args.iter().all(Ty::is_concrete)
                    && f.constraints.iter().all(Ty::is_concrete)
            }
            Ty::Relation(rel) => rel.args.iter().all(Ty::is_concrete),
        }
    }
}

impl std::fmt::Display for Ty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ty::Incomplete(hole) => write!(f, "{}", hole),
            Ty::Var(v) => write!(f, "{}", v),
            Ty::Tuple(fields) => write!(f, "({})", join(fields, ", ")),
            Ty::Func(func) => write!(f, "{}", func),
            Ty::Tensor(t) => write!(f, "{}", t),
            Ty::Prim(dt) => write!(f, "{}", dt),
            Ty::Relation(rel) => write!(f, "{}", rel),
        }
    }
}

/// A function type `[a..](args..) -> ret where constraints..`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FuncTy {
    pub args: Vec<Ty>,
    pub ret: Box<Ty>,
    pub ty_params: Vec<TyVar>,
    pub constraints: Vec<Ty>,
}

impl FuncTy {
    pub fn new(args: Vec<Ty>, ret: Ty) -> FuncTy {
        FuncTy {
            args,
            ret: Box::new(ret),
            ty_params: vec![],
            constraints: vec![],
        }
    }

    pub fn quantified(args: Vec<Ty>, ret: Ty, ty_params: Vec<TyVar>) -> FuncTy {
        FuncTy {
            args,
            ret: Box::new(ret),
            ty_params,
            constraints: vec![],
        }
    }

    pub fn with_constraints(mut self, constraints: Vec<Ty>) -> FuncTy {
        self.constraints = constraints;
        self
    }
}

impl std::fmt::Display for FuncTy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.ty_params.is_empty() {
            write!(f, "[{}]", join(&self.ty_params, ", "))?;
        }
        write!(f, "({}) -> {}", join(&self.args, ", "), self.ret)?;
        if !self.constraints.is_empty() {
            write!(f, " where {}", join(&self.constraints, ", "))?;
        }
        Ok(())
    }
}

/// A tensor type: an ordered list of dimensions and an element type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TensorTy {
    pub shape: Vec<IndexExpr>,
    pub dtype: DataType,
}

impl TensorTy {
    pub fn new<I: IntoIterator<Item = IndexExpr>>(shape: I, dtype: DataType) -> TensorTy {
        TensorTy {
            shape: shape.into_iter().collect(),
            dtype,
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }
}

impl std::fmt::Display for TensorTy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tensor[({}), {}]", join(&self.shape, ", "), self.dtype)
    }
}

/// A relation over argument types, e.g. `Broadcast(lhs, rhs, out)`.
///
/// `func` names a relation function in the registry; keeping the function
/// itself out of the type keeps the whole type language plain data.
/// The first `num_inputs` arguments are the relation's inputs by
/// convention; the solver itself does not interpret the split.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeRelation {
    pub func: String,
    pub args: Vec<Ty>,
    pub num_inputs: usize,
    pub attrs: Attrs,
}

impl TypeRelation {
    pub fn new<S: Into<String>>(
        func: S,
        args: Vec<Ty>,
        num_inputs: usize,
        attrs: Attrs,
    ) -> TypeRelation {
        TypeRelation {
            func: func.into(),
            args,
            num_inputs,
            attrs,
        }
    }
}

impl std::fmt::Display for TypeRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.func, join(&self.args, ", "))
    }
}

/// Attributes attached to a relation. Opaque to the solver; relation
/// functions are free to interpret them.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Attrs(BTreeMap<String, AttrValue>);

impl Attrs {
    pub fn new() -> Attrs {
        Attrs::default()
    }
}

impl Deref for Attrs {
    type Target = BTreeMap<String, AttrValue>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Attrs {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_holes_are_distinct() {
        assert_ne!(Ty::hole(), Ty::hole());
        let h = Ty::hole();
        assert_eq!(h, h.clone());
    }

    #[test]
    fn display_func_ty() {
        let f = FuncTy::quantified(
            vec![Ty::var("a"), Ty::tensor(&[10, 20], DataType::float32())],
            Ty::var("a"),
            vec![TyVar::new("a")],
        );
        assert_eq!(
            f.to_string(),
            "[a](a, tensor[(10, 20), float32]) -> a"
        );
    }
}
