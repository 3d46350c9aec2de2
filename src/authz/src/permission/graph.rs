//! Inclusion graph between permissions
//!
//! Each permission may directly imply other permissions. This module computes the
//! transitive closure of those edges and reports cycles for diagnostics.
//!
//! Closure expansion is iterative (explicit work queue plus seen set), so it always
//! terminates even when a misconfigured catalog contains cycles. Cycles are therefore
//! tolerated rather than rejected: in `A -> B -> A`, the closure of `A` is `{A, B}`.

use super::types::PermissionName;
use std::collections::{BTreeSet, VecDeque};

/// DFS node state used by cycle detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    Visiting,
    Visited,
}

/// Directed "directly implies" graph over the closed permission enumeration
///
/// Adjacency lists are indexed by enum discriminant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionGraph {
    edges: Vec<Vec<PermissionName>>,
}

impl InclusionGraph {
    /// Create a graph with no edges
    pub fn new() -> Self {
        Self {
            edges: vec![Vec::new(); PermissionName::ALL.len()],
        }
    }

    /// Add a `from -> to` edge; duplicate edges are ignored
    pub fn add_edge(&mut self, from: PermissionName, to: PermissionName) {
        let targets = &mut self.edges[from.index()];
        if !targets.contains(&to) {
            targets.push(to);
        }
    }

    /// Permissions directly implied by `name`
    pub fn direct(&self, name: PermissionName) -> &[PermissionName] {
        &self.edges[name.index()]
    }

    /// Number of edges in the graph
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Transitive closure of `name`'s direct inclusions
    ///
    /// `name` itself is only part of the result when it is reachable from itself
    /// through a cycle.
    pub fn closure(&self, name: PermissionName) -> BTreeSet<PermissionName> {
        self.expand(self.direct(name).iter().copied())
    }

    /// Closure of a set of starting permissions, including the starting permissions
    pub fn closure_of<I>(&self, names: I) -> BTreeSet<PermissionName>
    where
        I: IntoIterator<Item = PermissionName>,
    {
        self.expand(names)
    }

    /// Work-queue fixpoint: every seed and every name reachable from a seed
    fn expand<I>(&self, seeds: I) -> BTreeSet<PermissionName>
    where
        I: IntoIterator<Item = PermissionName>,
    {
        let mut seen: BTreeSet<PermissionName> = BTreeSet::new();
        let mut queue: VecDeque<PermissionName> = VecDeque::new();

        for seed in seeds {
            if seen.insert(seed) {
                queue.push_back(seed);
            }
        }

        while let Some(current) = queue.pop_front() {
            for next in self.direct(current) {
                if seen.insert(*next) {
                    queue.push_back(*next);
                }
            }
        }

        seen
    }

    /// Detect every cycle reachable in the graph
    ///
    /// Uses depth-first search with three node states; reaching a node that is still
    /// on the DFS stack closes a cycle. Each returned path starts and ends with the
    /// same permission, e.g. `[a, b, a]`.
    pub fn detect_cycles(&self) -> Vec<Vec<PermissionName>> {
        let mut state = vec![VisitState::Unvisited; PermissionName::ALL.len()];
        let mut cycles = Vec::new();

        for start in PermissionName::ALL {
            if state[start.index()] == VisitState::Unvisited {
                let mut path = Vec::new();
                self.dfs_cycle_detect(*start, &mut state, &mut path, &mut cycles);
            }
        }

        cycles
    }

    fn dfs_cycle_detect(
        &self,
        node: PermissionName,
        state: &mut [VisitState],
        path: &mut Vec<PermissionName>,
        cycles: &mut Vec<Vec<PermissionName>>,
    ) {
        match state[node.index()] {
            VisitState::Visiting => {
                if let Some(cycle_start) = path.iter().position(|n| *n == node) {
                    let mut cycle = path[cycle_start..].to_vec();
                    cycle.push(node);
                    cycles.push(cycle);
                }
                return;
            }
            VisitState::Visited => return,
            VisitState::Unvisited => {}
        }

        state[node.index()] = VisitState::Visiting;
        path.push(node);

        for dep in self.direct(node) {
            self.dfs_cycle_detect(*dep, state, path, cycles);
        }

        path.pop();
        state[node.index()] = VisitState::Visited;
    }
}

impl Default for InclusionGraph {
    fn default() -> Self {
        Self::new()
    }
}
