use weft_shared::ty::Ty;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeErrorKind {
    Message(String),
    Mismatch(Ty, Ty),
    RecursiveUnification(Ty, Ty),
    NonConstraint(Ty, Ty),
    UnknownConstraint(Ty),
    UnknownRelation(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeError {
    pub kind: TypeErrorKind,
}

impl TypeError {
    pub fn new(msg: String) -> Self {
        Self {
            kind: TypeErrorKind::Message(msg),
        }
    }

    pub fn mismatch(a: Ty, b: Ty) -> Self {
        Self {
            kind: TypeErrorKind::Mismatch(a, b),
        }
    }

    pub fn recursive_unify(hole: Ty, ty: Ty) -> Self {
        Self {
            kind: TypeErrorKind::RecursiveUnification(hole, ty),
        }
    }

    pub fn non_constraint(a: Ty, b: Ty) -> Self {
        Self {
            kind: TypeErrorKind::NonConstraint(a, b),
        }
    }

    pub fn unknown_constraint(c: Ty) -> Self {
        Self {
            kind: TypeErrorKind::UnknownConstraint(c),
        }
    }

    pub fn unknown_relation<S: Into<String>>(name: S) -> Self {
        Self {
            kind: TypeErrorKind::UnknownRelation(name.into()),
        }
    }

    pub fn message(&self) -> String {
        match &self.kind {
            TypeErrorKind::Message(msg) => msg.clone(),
            TypeErrorKind::Mismatch(a, b) => {
                format!("unable to unify types: `{}` and `{}`", a, b)
            }
            TypeErrorKind::RecursiveUnification(hole, ty) => {
                format!("incomplete type `{}` occurs in `{}`, cannot unify", hole, ty)
            }
            TypeErrorKind::NonConstraint(a, b) => {
                format!(
                    "type constraints `{}` and `{}` unified into a non-constraint",
                    a, b
                )
            }
            TypeErrorKind::UnknownConstraint(c) => {
                format!("do not know how to handle constraint `{}`", c)
            }
            TypeErrorKind::UnknownRelation(name) => {
                format!("no relation function registered under `{}`", name)
            }
        }
    }
}

impl std::fmt::Display for TypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for TypeError {}

#[cfg(test)]
mod tests {
    use super::TypeError;
    use weft_shared::ty::Ty;

    #[test]
    fn mismatch_names_both_sides() {
        let err = TypeError::mismatch(Ty::int32(), Ty::float32());
        assert_eq!(err.message(), "unable to unify types: `int32` and `float32`");
    }
}
