//! Dependency graph between states and computes.
//!
//! Nodes are `TypeId`s. An edge `dep -> node` is recorded for every
//! dependency a compute declares; states only ever appear as dependencies.
//! The graph answers two questions for the context:
//!
//! - which computes become dirty when a given node changes
//!   ([`DependencyGraph::dependents_of`], transitive), and
//! - in which order a dirty set must run so every compute sees its compute
//!   dependencies refreshed first ([`DependencyGraph::order`]).
//!
//! Cycles and duplicate edges are rejected at registration time; both are
//! programming errors in a `deps()` declaration.

use std::any::TypeId;
use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

/// Registration-time graph errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("dependency cycle detected at {node}")]
    CycleDetected { node: &'static str },
    #[error("duplicate dependency edge {from} -> {to}")]
    DuplicateEdge {
        from: &'static str,
        to: &'static str,
    },
}

/// Forward edges (`dependency -> dependents`) plus, for ordering, each
/// compute's own compute dependencies.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    dependents: BTreeMap<TypeId, BTreeSet<TypeId>>,
    compute_deps: BTreeMap<TypeId, BTreeSet<TypeId>>,
    names: BTreeMap<TypeId, &'static str>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a compute node and its declared dependencies.
    ///
    /// `state_deps` and `compute_deps` come straight from
    /// [`Compute::deps`](crate::Compute::deps). Fails on a duplicate edge or
    /// if the new edges close a cycle; registration errors are terminal.
    pub fn record(
        &mut self,
        node: TypeId,
        name: &'static str,
        state_deps: &[TypeId],
        compute_deps: &[TypeId],
    ) -> Result<(), TopologyError> {
        self.names.insert(node, name);
        for dep in state_deps.iter().chain(compute_deps) {
            let inserted = self.dependents.entry(*dep).or_default().insert(node);
            if !inserted {
                return Err(TopologyError::DuplicateEdge {
                    from: self.name_of(dep),
                    to: name,
                });
            }
        }
        self.compute_deps
            .entry(node)
            .or_default()
            .extend(compute_deps.iter().copied());

        if self.reaches(node, node) {
            return Err(TopologyError::CycleDetected { node: name });
        }
        Ok(())
    }

    /// All computes that must be re-derived when `changed` changes,
    /// transitively.
    pub fn dependents_of(&self, changed: &TypeId) -> BTreeSet<TypeId> {
        let mut found = BTreeSet::new();
        let mut pending = vec![*changed];
        while let Some(node) = pending.pop() {
            if let Some(direct) = self.dependents.get(&node) {
                for dependent in direct {
                    if found.insert(*dependent) {
                        pending.push(*dependent);
                    }
                }
            }
        }
        found
    }

    /// Topological order over `dirty`: a compute runs only after every one of
    /// its compute dependencies that is also dirty.
    ///
    /// The dirty sets here are tiny (a handful of computes per frame), so the
    /// quadratic selection loop is not worth improving on.
    pub fn order(&self, dirty: &BTreeSet<TypeId>) -> Vec<TypeId> {
        let mut remaining = dirty.clone();
        let mut ordered = Vec::with_capacity(remaining.len());
        while !remaining.is_empty() {
            let ready: Vec<TypeId> = remaining
                .iter()
                .filter(|node| {
                    self.compute_deps
                        .get(node)
                        .is_none_or(|deps| deps.iter().all(|dep| !remaining.contains(dep)))
                })
                .copied()
                .collect();
            // Unreachable with cycle-checked registration; bail rather than spin.
            if ready.is_empty() {
                log::error!("dependency order stalled; running remaining computes as-is");
                ordered.extend(remaining.iter().copied());
                break;
            }
            for node in ready {
                remaining.remove(&node);
                ordered.push(node);
            }
        }
        ordered
    }

    fn name_of(&self, node: &TypeId) -> &'static str {
        self.names.get(node).copied().unwrap_or("<unregistered>")
    }

    /// Depth-first search along dependent edges.
    fn reaches(&self, from: TypeId, target: TypeId) -> bool {
        let mut visited = BTreeSet::new();
        let mut pending: Vec<TypeId> = self
            .dependents
            .get(&from)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        while let Some(node) = pending.pop() {
            if node == target {
                return true;
            }
            if visited.insert(node)
                && let Some(next) = self.dependents.get(&node)
            {
                pending.extend(next.iter().copied());
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SourceA;
    struct SourceB;
    struct Derived;
    struct DerivedTwice;

    fn id<T: 'static>() -> TypeId {
        TypeId::of::<T>()
    }

    #[test]
    fn dependents_are_transitive() {
        let mut graph = DependencyGraph::new();
        graph
            .record(id::<Derived>(), "Derived", &[id::<SourceA>()], &[])
            .expect("first registration");
        graph
            .record(id::<DerivedTwice>(), "DerivedTwice", &[], &[id::<Derived>()])
            .expect("second registration");

        let dependents = graph.dependents_of(&id::<SourceA>());
        assert!(dependents.contains(&id::<Derived>()), "direct dependent tracked");
        assert!(
            dependents.contains(&id::<DerivedTwice>()),
            "transitive dependent tracked"
        );
    }

    #[test]
    fn unrelated_nodes_have_no_dependents() {
        let mut graph = DependencyGraph::new();
        graph
            .record(id::<Derived>(), "Derived", &[id::<SourceA>()], &[])
            .expect("registration");
        assert!(
            graph.dependents_of(&id::<SourceB>()).is_empty(),
            "SourceB feeds nothing"
        );
    }

    #[test]
    fn order_puts_compute_deps_first() {
        let mut graph = DependencyGraph::new();
        graph
            .record(id::<Derived>(), "Derived", &[id::<SourceA>()], &[])
            .expect("registration");
        graph
            .record(id::<DerivedTwice>(), "DerivedTwice", &[], &[id::<Derived>()])
            .expect("registration");

        let dirty: BTreeSet<TypeId> = [id::<DerivedTwice>(), id::<Derived>()].into_iter().collect();
        let order = graph.order(&dirty);
        let first = order.iter().position(|node| *node == id::<Derived>());
        let second = order.iter().position(|node| *node == id::<DerivedTwice>());
        assert!(first < second, "Derived must run before DerivedTwice");
    }

    #[test]
    fn duplicate_edge_is_rejected() {
        let mut graph = DependencyGraph::new();
        let result = graph.record(
            id::<Derived>(),
            "Derived",
            &[id::<SourceA>(), id::<SourceA>()],
            &[],
        );
        assert!(
            matches!(result, Err(TopologyError::DuplicateEdge { .. })),
            "declaring the same dependency twice is an error"
        );
    }

    #[test]
    fn cycle_is_rejected() {
        let mut graph = DependencyGraph::new();
        graph
            .record(id::<Derived>(), "Derived", &[], &[id::<DerivedTwice>()])
            .expect("forward edge alone is fine");
        let result = graph.record(id::<DerivedTwice>(), "DerivedTwice", &[], &[id::<Derived>()]);
        assert!(
            matches!(result, Err(TopologyError::CycleDetected { .. })),
            "closing the loop must fail"
        );
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let mut graph = DependencyGraph::new();
        let result = graph.record(id::<Derived>(), "Derived", &[], &[id::<Derived>()]);
        assert!(
            matches!(result, Err(TopologyError::CycleDetected { node: "Derived" })),
            "a compute cannot depend on itself"
        );
    }
}
