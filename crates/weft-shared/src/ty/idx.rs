use serde::{Deserialize, Serialize};

/// A symbolic integer index expression, used for tensor shape dimensions.
///
/// The solver never reasons about these symbolically; relations fold them
/// to constants where possible (`as_const_int`/`as_const_uint`) and fall
/// back to structural comparison otherwise.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IndexExpr {
    Int(i64),
    Var(String),
    Add(Box<IndexExpr>, Box<IndexExpr>),
    Sub(Box<IndexExpr>, Box<IndexExpr>),
    Mul(Box<IndexExpr>, Box<IndexExpr>),
}

impl IndexExpr {
    pub fn var<S: Into<String>>(name: S) -> IndexExpr {
        IndexExpr::Var(name.into())
    }

    /// Fold to a signed constant, if every leaf is constant.
    pub fn as_const_int(&self) -> Option<i64> {
        match self {
            IndexExpr::Int(v) => Some(*v),
            IndexExpr::Var(_) => None,
            IndexExpr::Add(a, b) => a.as_const_int()?.checked_add(b.as_const_int()?),
            IndexExpr::Sub(a, b) => a.as_const_int()?.checked_sub(b.as_const_int()?),
            IndexExpr::Mul(a, b) => a.as_const_int()?.checked_mul(b.as_const_int()?),
        }
    }

    /// Fold to an unsigned constant. Negative constants do not count as
    /// unsigned; callers treating `None` as "unknown" will treat them as
    /// such.
    pub fn as_const_uint(&self) -> Option<u64> {
        u64::try_from(self.as_const_int()?).ok()
    }
}

impl From<i64> for IndexExpr {
    fn from(v: i64) -> Self {
        IndexExpr::Int(v)
    }
}

impl std::ops::Add for IndexExpr {
    type Output = IndexExpr;

    fn add(self, rhs: IndexExpr) -> IndexExpr {
        IndexExpr::Add(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Sub for IndexExpr {
    type Output = IndexExpr;

    fn sub(self, rhs: IndexExpr) -> IndexExpr {
        IndexExpr::Sub(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Mul for IndexExpr {
    type Output = IndexExpr;

    fn mul(self, rhs: IndexExpr) -> IndexExpr {
        IndexExpr::Mul(Box::new(self), Box::new(rhs))
    }
}

impl std::fmt::Display for IndexExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexExpr::Int(v) => write!(f, "{}", v),
            IndexExpr::Var(n) => write!(f, "{}", n),
            IndexExpr::Add(a, b) => write!(f, "({} + {})", a, b),
            IndexExpr::Sub(a, b) => write!(f, "({} - {})", a, b),
            IndexExpr::Mul(a, b) => write!(f, "({} * {})", a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IndexExpr;

    #[test]
    fn folds_constant_arithmetic() {
        let e = (IndexExpr::from(10) * IndexExpr::from(4)) - IndexExpr::from(8);
        assert_eq!(e.as_const_int(), Some(32));
        assert_eq!(e.as_const_uint(), Some(32));
    }

    #[test]
    fn symbolic_terms_do_not_fold() {
        let e = IndexExpr::var("n") - IndexExpr::from(1);
        assert_eq!(e.as_const_int(), None);
        assert_eq!(e.as_const_uint(), None);
    }

    #[test]
    fn negative_constants_are_not_unsigned() {
        let e = IndexExpr::from(3) - IndexExpr::from(5);
        assert_eq!(e.as_const_int(), Some(-2));
        assert_eq!(e.as_const_uint(), None);
    }
}
