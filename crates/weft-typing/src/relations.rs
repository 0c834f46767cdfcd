//! Builtin type relations.

use itertools::{EitherOrBoth, Itertools};

use weft_shared::ty::{Attrs, IndexExpr, TensorTy, Ty};

use crate::{error::TypeError, reporter::TypeReporter};

/// `Identity(a, b, ..)`: every argument equals the first.
pub fn identity(
    args: &[Ty],
    _num_inputs: usize,
    _attrs: &Attrs,
    reporter: &mut dyn TypeReporter,
) -> Result<bool, TypeError> {
    for arg in &args[1..] {
        reporter.assign(arg, &args[0])?;
    }
    Ok(true)
}

/// `Broadcast(lhs, rhs, out)`: once both inputs are concrete tensors of
/// one element type, `out` is the numpy-style broadcast of their shapes.
pub fn broadcast(
    args: &[Ty],
    _num_inputs: usize,
    _attrs: &Attrs,
    reporter: &mut dyn TypeReporter,
) -> Result<bool, TypeError> {
    debug_assert_eq!(args.len(), 3);
    let (Ty::Tensor(lhs), Ty::Tensor(rhs)) = (&args[0], &args[1]) else {
        return Ok(false);
    };
    if lhs.dtype != rhs.dtype {
        return Err(TypeError::new(format!(
            "broadcast requires matching element types: `{}` and `{}`",
            lhs, rhs
        )));
    }
    let out = broadcast_shapes(lhs, rhs)?;
    reporter.assign(&args[2], &Ty::Tensor(out))?;
    Ok(true)
}

fn broadcast_dim(a: &IndexExpr, b: &IndexExpr) -> Result<IndexExpr, TypeError> {
    match (a.as_const_int(), b.as_const_int()) {
        (Some(1), _) => Ok(b.clone()),
        (_, Some(1)) => Ok(a.clone()),
        (Some(x), Some(y)) if x == y => Ok(a.clone()),
        // Symbolic dims pass only when they are the same expression.
        (None, _) | (_, None) if a == b => Ok(a.clone()),
        _ => Err(TypeError::new(format!(
            "incompatible broadcast dimensions `{}` and `{}`",
            a, b
        ))),
    }
}

/// Combine two shapes right-aligned; the longer shape's leading dimensions
/// carry over unchanged.
fn broadcast_shapes(lhs: &TensorTy, rhs: &TensorTy) -> Result<TensorTy, TypeError> {
    let mut shape = Vec::with_capacity(lhs.ndim().max(rhs.ndim()));
    for pair in lhs.shape.iter().rev().zip_longest(rhs.shape.iter().rev()) {
        let dim = match pair {
            EitherOrBoth::Both(a, b) => broadcast_dim(a, b)?,
            EitherOrBoth::Left(a) => a.clone(),
            EitherOrBoth::Right(b) => b.clone(),
        };
        shape.push(dim);
    }
    shape.reverse();
    Ok(TensorTy::new(shape, lhs.dtype))
}

#[cfg(test)]
mod tests {
    use super::broadcast_shapes;
    use weft_shared::ty::{DataType, IndexExpr, TensorTy};

    fn tensor(shape: &[i64]) -> TensorTy {
        TensorTy::new(
            shape.iter().map(|&d| IndexExpr::Int(d)),
            DataType::float32(),
        )
    }

    #[test]
    fn broadcasts_ones_and_carries_leading_dims() {
        let out = broadcast_shapes(&tensor(&[10, 20]), &tensor(&[10, 1])).unwrap();
        assert_eq!(out, tensor(&[10, 20]));

        let out = broadcast_shapes(&tensor(&[10, 20]), &tensor(&[10, 1, 1])).unwrap();
        assert_eq!(out, tensor(&[10, 10, 20]));

        let out = broadcast_shapes(&tensor(&[]), &tensor(&[4, 3])).unwrap();
        assert_eq!(out, tensor(&[4, 3]));
    }

    #[test]
    fn equal_symbolic_dims_pass_through() {
        let n = || IndexExpr::var("n");
        let lhs = TensorTy::new(vec![n(), IndexExpr::Int(3)], DataType::float32());
        let rhs = TensorTy::new(vec![n(), IndexExpr::Int(1)], DataType::float32());
        let out = broadcast_shapes(&lhs, &rhs).unwrap();
        assert_eq!(
            out,
            TensorTy::new(vec![n(), IndexExpr::Int(3)], DataType::float32())
        );
    }

    #[test]
    fn incompatible_dims_are_fatal() {
        let err = broadcast_shapes(&tensor(&[10, 20]), &tensor(&[10, 30])).unwrap_err();
        assert_eq!(
            err.message(),
            "incompatible broadcast dimensions `20` and `30`"
        );
    }
}
