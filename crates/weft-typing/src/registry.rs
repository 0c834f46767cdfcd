//! Process-global registry of relation functions, keyed by name.
//!
//! `TypeRelation` carries only the *name* of its function; the function
//! itself is registered here. The builtin relations are pre-seeded.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use weft_shared::ty::{Attrs, Ty};

use crate::{error::TypeError, relations, reporter::TypeReporter};

/// Signature of a user relation function: the resolved argument views, the
/// input/output split, the relation's attributes, and a reporter routing
/// assignments back into the solver. Returns whether the relation has
/// extracted all the information it can from the current state.
pub type RelationFn = Arc<
    dyn Fn(&[Ty], usize, &Attrs, &mut dyn TypeReporter) -> Result<bool, TypeError> + Send + Sync,
>;

lazy_static! {
    static ref REGISTRY: RwLock<HashMap<String, RelationFn>> = {
        let mut map: HashMap<String, RelationFn> = HashMap::new();
        map.insert(str!("Identity"), Arc::new(relations::identity));
        map.insert(str!("Broadcast"), Arc::new(relations::broadcast));
        RwLock::new(map)
    };
}

pub fn register<S, F>(name: S, func: F)
where
    S: Into<String>,
    F: Fn(&[Ty], usize, &Attrs, &mut dyn TypeReporter) -> Result<bool, TypeError>
        + Send
        + Sync
        + 'static,
{
    REGISTRY.write().unwrap().insert(name.into(), Arc::new(func));
}

pub fn lookup(name: &str) -> Option<RelationFn> {
    REGISTRY.read().unwrap().get(name).cloned()
}

#[cfg(test)]
mod tests {
    use super::{lookup, register};

    #[test]
    fn builtins_are_preseeded() {
        assert!(lookup("Identity").is_some());
        assert!(lookup("Broadcast").is_some());
        assert!(lookup("NotARelation").is_none());
    }

    #[test]
    fn registered_functions_are_found() {
        register("AlwaysResolved", |_, _, _, _| Ok(true));
        assert!(lookup("AlwaysResolved").is_some());
    }
}
