//! The constraint solver.
//!
//! Every type the solver observes is interned into an append-only arena of
//! [`TypeNode`]s forming a union–find over equivalence classes; relations
//! attach to every node they mention and are re-fired through a FIFO
//! worklist whenever one of those classes is merged. `solve` drives the
//! worklist to a fixed point and reports whether every relation resolved.

use std::collections::{HashMap, VecDeque};

use weft_shared::ty::{Ty, TypeRelation};

use crate::{error::TypeError, registry, reporter::SolverReporter, subst::Subst};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TypeNodeId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct RelNodeId(usize);

/// Per-class bookkeeping. Only the root of a class carries an up-to-date
/// `resolved_type`; non-root nodes are stale and never consulted directly.
pub(crate) struct TypeNode {
    pub(crate) resolved_type: Ty,
    parent: TypeNodeId,
    /// Relations depending on any type in this class. May contain
    /// duplicates; the `resolved`/`inqueue` flags filter them.
    rel_list: Vec<RelNodeId>,
}

struct RelationNode {
    rel: TypeRelation,
    /// One node per relation argument, in argument order.
    type_list: Vec<TypeNodeId>,
    resolved: bool,
    inqueue: bool,
}

pub struct TypeSolver {
    type_nodes: Vec<TypeNode>,
    rel_nodes: Vec<RelationNode>,
    tmap: HashMap<Ty, TypeNodeId>,
    queue: VecDeque<RelNodeId>,
    /// Solver-lifetime memo of instantiated type variables.
    pub(crate) tv_map: Subst,
    num_resolved_rels: usize,
}

impl Default for TypeSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeSolver {
    pub fn new() -> TypeSolver {
        TypeSolver {
            type_nodes: vec![],
            rel_nodes: vec![],
            tmap: HashMap::new(),
            queue: VecDeque::new(),
            tv_map: Subst::new(),
            num_resolved_rels: 0,
        }
    }

    /// Intern `t`, allocating a fresh node on first sight.
    pub(crate) fn get_type_node(&mut self, t: &Ty) -> TypeNodeId {
        if let Some(&id) = self.tmap.get(t) {
            return id;
        }
        let id = TypeNodeId(self.type_nodes.len());
        self.type_nodes.push(TypeNode {
            resolved_type: t.clone(),
            parent: id,
            rel_list: vec![],
        });
        self.tmap.insert(t.clone(), id);
        id
    }

    /// Class representative, with full path compression.
    pub(crate) fn find_root(&mut self, id: TypeNodeId) -> TypeNodeId {
        let mut root = id;
        while self.type_nodes[root.0].parent != root {
            root = self.type_nodes[root.0].parent;
        }
        let mut cur = id;
        while cur != root {
            let next = self.type_nodes[cur.0].parent;
            self.type_nodes[cur.0].parent = root;
            cur = next;
        }
        root
    }

    pub(crate) fn resolved_type(&self, id: TypeNodeId) -> &Ty {
        &self.type_nodes[id.0].resolved_type
    }

    /// Merge the class of `from` into the class of `to`; `to` keeps its
    /// `resolved_type`. Relations riding along on `from` are woken up.
    pub(crate) fn merge_from_to(&mut self, from: TypeNodeId, to: TypeNodeId) {
        let from = self.find_root(from);
        let to = self.find_root(to);
        if from == to {
            return;
        }
        log::trace!(
            "merge {} into {}",
            self.type_nodes[from.0].resolved_type,
            self.type_nodes[to.0].resolved_type
        );
        self.type_nodes[from.0].parent = to;
        let moved = std::mem::take(&mut self.type_nodes[from.0].rel_list);
        for &rid in &moved {
            let (resolved, inqueue) = {
                let rnode = &self.rel_nodes[rid.0];
                (rnode.resolved, rnode.inqueue)
            };
            if !resolved && !inqueue {
                self.add_to_queue(rid);
            }
        }
        self.type_nodes[to.0].rel_list.extend(moved);
    }

    fn add_to_queue(&mut self, rid: RelNodeId) {
        let rnode = &mut self.rel_nodes[rid.0];
        if rnode.inqueue {
            return;
        }
        rnode.inqueue = true;
        self.queue.push_back(rid);
    }

    /// Register a constraint. The only constraint shape currently defined
    /// is a type relation; anything else is a fatal error.
    pub fn add_constraint(&mut self, constraint: Ty) -> Result<(), TypeError> {
        let Ty::Relation(rel) = constraint else {
            return Err(TypeError::unknown_constraint(constraint));
        };
        log::debug!("add constraint {}", rel);
        let rid = RelNodeId(self.rel_nodes.len());
        self.rel_nodes.push(RelationNode {
            rel,
            type_list: vec![],
            resolved: false,
            inqueue: false,
        });
        let args = self.rel_nodes[rid.0].rel.args.clone();
        for arg in &args {
            let tid = self.get_type_node(arg);
            self.rel_nodes[rid.0].type_list.push(tid);
            let resolved = self.type_nodes[tid.0].resolved_type.clone();
            self.propagate(rid, &resolved);
        }
        self.add_to_queue(rid);
        Ok(())
    }

    /// Attach `rid` to `t` and every sub-term of `t`. Tuples and function
    /// types are the only shapes with sub-terms; everything else
    /// (including embedded relations) is a leaf here.
    fn propagate(&mut self, rid: RelNodeId, t: &Ty) {
        let id = self.get_type_node(t);
        self.type_nodes[id.0].rel_list.push(rid);
        match t {
            Ty::Tuple(fields) => {
                for field in fields {
                    self.propagate(rid, field);
                }
            }
            Ty::Func(f) => {
                self.propagate(rid, &f.ret);
                for arg in &f.args {
                    self.propagate(rid, arg);
                }
                for tp in &f.ty_params {
                    self.propagate(rid, &Ty::Var(tp.clone()));
                }
                for c in &f.constraints {
                    self.propagate(rid, c);
                }
            }
            _ => {}
        }
    }

    /// Rewrite `t` with the current best knowledge: every hole is replaced
    /// by its class root's `resolved_type`. Safe to call at any time.
    pub fn resolve(&mut self, t: &Ty) -> Ty {
        let start = match self.tmap.get(t).copied() {
            Some(id) => {
                let root = self.find_root(id);
                self.type_nodes[root.0].resolved_type.clone()
            }
            None => t.clone(),
        };
        self.rewrite_holes(start)
    }

    /// One-step rewrite: replacements are not descended into, since the
    /// unifier keeps class roots in canonical form.
    fn rewrite_holes(&mut self, t: Ty) -> Ty {
        match t {
            Ty::Incomplete(_) => {
                let id = self.get_type_node(&t);
                let root = self.find_root(id);
                self.type_nodes[root.0].resolved_type.clone()
            }
            Ty::Tuple(fields) => {
                let mut out = Vec::with_capacity(fields.len());
                for field in fields {
                    out.push(self.rewrite_holes(field));
                }
                Ty::Tuple(out)
            }
            Ty::Func(mut f) => {
                let mut args = Vec::with_capacity(f.args.len());
                for arg in f.args {
                    args.push(self.rewrite_holes(arg));
                }
                f.args = args;
                f.ret = Box::new(self.rewrite_holes(*f.ret));
                let mut constraints = Vec::with_capacity(f.constraints.len());
                for c in f.constraints {
                    constraints.push(self.rewrite_holes(c));
                }
                f.constraints = constraints;
                Ty::Func(f)
            }
            Ty::Relation(mut rel) => {
                let mut args = Vec::with_capacity(rel.args.len());
                for arg in rel.args {
                    args.push(self.rewrite_holes(arg));
                }
                rel.args = args;
                Ty::Relation(rel)
            }
            other => other,
        }
    }

    /// Drain the worklist to a fixed point. Returns whether every
    /// registered relation has reported itself resolved; unresolved
    /// relations are not an error, but a relation function failing (or a
    /// unification it triggers failing) is.
    pub fn solve(&mut self) -> Result<bool, TypeError> {
        while let Some(rid) = self.queue.pop_front() {
            if self.rel_nodes[rid.0].resolved {
                // A relation can re-enqueue itself through its own
                // assignments and then report resolved; drop the stale
                // entry.
                self.rel_nodes[rid.0].inqueue = false;
                continue;
            }

            let type_list = self.rel_nodes[rid.0].type_list.clone();
            let mut args = Vec::with_capacity(type_list.len());
            for tid in type_list {
                let root = self.find_root(tid);
                let ty = self.type_nodes[root.0].resolved_type.clone();
                args.push(self.resolve(&ty));
            }
            let rel = self.rel_nodes[rid.0].rel.clone();
            debug_assert!(args.len() <= rel.args.len());

            // Clear the flag before invoking so that assignments made by
            // the relation itself can re-enqueue it.
            self.rel_nodes[rid.0].inqueue = false;

            let func = registry::lookup(&rel.func)
                .ok_or_else(|| TypeError::unknown_relation(rel.func.as_str()))?;
            log::debug!("fire {}", rel);
            let resolved = {
                let mut reporter = SolverReporter { solver: &mut *self };
                func(&args, rel.num_inputs, &rel.attrs, &mut reporter)?
            };

            let rnode = &mut self.rel_nodes[rid.0];
            if resolved && !rnode.resolved {
                self.num_resolved_rels += 1;
            }
            rnode.resolved = resolved;
        }
        Ok(self.num_resolved_rels == self.rel_nodes.len())
    }
}

#[cfg(test)]
mod tests {
    use weft_shared::ty::{DataType, Ty};

    use crate::mocks::{make_rel, TestSolver};
    use crate::registry;

    #[test]
    fn solve_without_constraints_succeeds() {
        let mut s = TestSolver::new();
        assert_eq!(s.solve(), Ok(true));
    }

    #[test]
    fn add_constraint_rejects_non_relations() {
        let mut s = TestSolver::new();
        let err = s.add_constraint(Ty::int32()).unwrap_err();
        assert_eq!(err.message(), "do not know how to handle constraint `int32`");
    }

    #[test]
    fn solve_fails_on_unregistered_relation() {
        let mut s = TestSolver::new();
        s.add_constraint(make_rel("NoSuchRelation", vec![Ty::hole(), Ty::hole()], None, None))
            .unwrap();
        let err = s.solve().unwrap_err();
        assert_eq!(
            err.message(),
            "no relation function registered under `NoSuchRelation`"
        );
    }

    #[test]
    fn bcast_chain_resolves_forward() {
        let mut s = TestSolver::with_tracing();
        let t0 = Ty::tensor(&[10, 20], DataType::float32());
        let t1 = Ty::tensor(&[10, 1], DataType::float32());
        let tc = Ty::tensor(&[10, 1, 1], DataType::float32());
        let t2 = s.gen_type("Broadcast", vec![t0, t1], None).unwrap();
        let t3 = s.gen_type("Identity", vec![t2.clone()], None).unwrap();
        let t4 = s.gen_type("Broadcast", vec![t3, tc], None).unwrap();
        assert_eq!(s.solve(), Ok(true));
        assert_eq!(s.resolve(&t2), Ty::tensor(&[10, 20], DataType::float32()));
        assert_eq!(s.resolve(&t4), Ty::tensor(&[10, 10, 20], DataType::float32()));
    }

    #[test]
    fn backward_solving_flows_through_identity() {
        let mut s = TestSolver::new();
        let t0 = Ty::tensor(&[10, 20], DataType::float32());
        let tc = Ty::tensor(&[10, 1, 1], DataType::float32());
        let t1 = Ty::hole();
        let t3 = s.gen_type("Broadcast", vec![t0, t1.clone()], None).unwrap();
        s.gen_type("Identity", vec![t1], Some(tc)).unwrap();
        assert_eq!(s.solve(), Ok(true));
        assert_eq!(s.resolve(&t3), Ty::tensor(&[10, 10, 20], DataType::float32()));
    }

    #[test]
    fn recursive_backward_solving() {
        let mut s = TestSolver::new();
        let tensor1 = Ty::tensor(&[10, 20], DataType::float32());
        let tensor2 = Ty::tensor(&[10, 1, 1], DataType::float32());
        let tensor3 = Ty::tensor(&[10], DataType::float32());

        let tup1 = Ty::Tuple(vec![
            Ty::Tuple(vec![tensor1, tensor2]),
            tensor3,
        ]);
        let tup2 = Ty::Tuple(vec![
            Ty::Tuple(vec![Ty::hole(), Ty::hole()]),
            Ty::hole(),
        ]);
        s.gen_type("Identity", vec![tup1.clone()], Some(tup2.clone()))
            .unwrap();

        assert_eq!(s.solve(), Ok(true));
        assert_eq!(s.resolve(&tup2), tup1);
    }

    #[test]
    fn relation_driven_propagation_links_holes() {
        registry::register("LinkArgs", |args, _, _, reporter| {
            reporter.assign(&args[0], &args[1])?;
            Ok(true)
        });

        let mut s = TestSolver::new();
        let x = Ty::hole();
        let y = Ty::hole();
        s.add_constraint(make_rel("LinkArgs", vec![x.clone(), y.clone()], Some(1), None))
            .unwrap();

        assert_ne!(s.resolve(&x), s.resolve(&y));
        assert_eq!(s.solve(), Ok(true));
        let rx = s.resolve(&x);
        assert_eq!(rx, s.resolve(&y));
        assert!(rx.is_incomplete());
    }

    #[test]
    fn monotone_refinement_leaves_unresolved_relation() {
        registry::register("RefineFirst", |args, _, _, reporter| {
            reporter.assign(&args[0], &Ty::int32())?;
            Ok(args.iter().all(Ty::is_concrete))
        });

        let mut s = TestSolver::new();
        let x = Ty::hole();
        let y = Ty::hole();
        s.add_constraint(make_rel("RefineFirst", vec![x.clone(), y.clone()], Some(1), None))
            .unwrap();

        assert_eq!(s.solve(), Ok(false));
        assert_eq!(s.resolve(&x), Ty::int32());
        assert!(s.resolve(&y).is_incomplete());
    }

    #[test]
    fn resolve_is_idempotent() {
        let mut s = TestSolver::new();
        let h = Ty::hole();
        let t = Ty::Tuple(vec![h.clone(), Ty::int32()]);
        s.unify(&h, &Ty::float32()).unwrap();
        let once = s.resolve(&t);
        assert_eq!(once, Ty::Tuple(vec![Ty::float32(), Ty::int32()]));
        assert_eq!(s.resolve(&once), once);
    }
}
