use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// The kind of a type term. Most types are of kind `Type`; shape variables
/// and base types only show up inside quantified tensor signatures.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Kind {
    #[default]
    Type,
    ShapeVar,
    BaseType,
    Shape,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Type => write!(f, "type"),
            Kind::ShapeVar => write!(f, "shapevar"),
            Kind::BaseType => write!(f, "basetype"),
            Kind::Shape => write!(f, "shape"),
        }
    }
}

/// A bound polymorphic type variable, e.g. the `a` in `fn[a](a) -> a`.
///
/// Variables are compared by name and kind; every binder is expected to
/// mint a distinct name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TyVar {
    pub name: String,
    pub kind: Kind,
}

impl TyVar {
    pub fn new<S: Into<String>>(name: S) -> TyVar {
        TyVar {
            name: name.into(),
            kind: Kind::Type,
        }
    }

    pub fn with_kind<S: Into<String>>(name: S, kind: Kind) -> TyVar {
        TyVar {
            name: name.into(),
            kind,
        }
    }
}

impl std::fmt::Display for TyVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for TyVar {
    fn from(value: &str) -> Self {
        TyVar::new(value)
    }
}

static NEXT_HOLE_ID: AtomicU32 = AtomicU32::new(0);

/// An unresolved hole in the type program; the unification variable.
///
/// Two separately created holes are distinct terms even though both are
/// "incomplete": identity is the process-unique `id`, minted by `fresh`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IncompleteTy {
    pub id: u32,
    pub kind: Kind,
}

impl IncompleteTy {
    pub fn fresh(kind: Kind) -> IncompleteTy {
        IncompleteTy {
            id: NEXT_HOLE_ID.fetch_add(1, Ordering::Relaxed),
            kind,
        }
    }
}

impl std::fmt::Display for IncompleteTy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "?{}", self.id)
    }
}
