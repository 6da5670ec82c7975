//! Dependency Resolver: topological ordering and cycle detection.
//!
//! Edges point from a node to the nodes it depends on. Evaluation order is
//! computed with a deterministic Kahn's algorithm: ties among nodes with
//! zero remaining in-edges are broken by lexicographic name order, so the
//! same node set and dependency lists always produce the same order
//! regardless of registration order or platform.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::{EngineError, EngineResult};

/// A directed graph over node names, used only to compute a topological
/// evaluation order and to detect cycles.
///
/// Dependency names that are not themselves node names (i.e. they resolve
/// to parameters) are not represented as edges; [`DependencyGraph::build`]
/// filters those out given a predicate.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    indices: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a complete node set and each node's full
    /// declared dependency list. `is_known_parameter` distinguishes a
    /// dependency name that refers to a parameter from one that refers to
    /// another node (an edge). A dependency name that is neither a known
    /// node nor accepted by `is_known_parameter` causes
    /// [`EngineError::UnresolvedDependency`].
    pub fn build(
        nodes: &BTreeMap<String, Vec<String>>,
        is_known_parameter: impl Fn(&str) -> bool,
    ) -> EngineResult<Self> {
        let resolver = Self::from_edges(nodes);
        for (name, deps) in nodes {
            for dep in deps {
                if !nodes.contains_key(dep) && !is_known_parameter(dep) {
                    return Err(EngineError::UnresolvedDependency {
                        node: name.clone(),
                        missing: dep.clone(),
                    });
                }
            }
        }
        Ok(resolver)
    }

    /// Builds a graph purely from edges between known node names, silently
    /// ignoring any declared dependency that does not name another node
    /// (whether it is a valid parameter or not). Used where only the
    /// node-to-node shape matters, such as computing a downstream closure
    /// for invalidation; unresolved-dependency validation is deferred to
    /// [`DependencyGraph::build`], which callers use when actually
    /// resolving an evaluation order.
    pub fn from_edges(nodes: &BTreeMap<String, Vec<String>>) -> Self {
        let mut resolver = Self::new();
        for name in nodes.keys() {
            resolver.ensure_node(name);
        }
        for (name, deps) in nodes {
            for dep in deps {
                if nodes.contains_key(dep) {
                    resolver.add_edge(name, dep);
                }
            }
        }
        resolver
    }

    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.indices.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.indices.insert(name.to_string(), idx);
        idx
    }

    fn add_edge(&mut self, from: &str, to: &str) {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);
        self.graph.update_edge(from_idx, to_idx, ());
    }

    /// The node names that directly depend on this node (edges into it).
    pub fn dependents_of(&self, name: &str) -> Vec<String> {
        let Some(&idx) = self.indices.get(name) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .map(|n| self.graph[n].clone())
            .collect()
    }

    /// The transitive downstream closure of `name`: every node that
    /// depends on it, directly or indirectly, not including `name` itself.
    pub fn downstream_closure(&self, name: &str) -> BTreeSet<String> {
        let mut closure = BTreeSet::new();
        let mut stack = vec![name.to_string()];
        while let Some(current) = stack.pop() {
            for dependent in self.dependents_of(&current) {
                if closure.insert(dependent.clone()) {
                    stack.push(dependent);
                }
            }
        }
        closure
    }

    /// Computes a deterministic topological evaluation order: nodes that
    /// can run first (no remaining dependencies) are chosen in
    /// lexicographic order. Fails with [`EngineError::CycleDetected`],
    /// naming one witness cycle, if the graph is not a DAG.
    pub fn topological_order(&self) -> EngineResult<Vec<String>> {
        // `remaining` counts *outgoing* edges (dependencies still to
        // resolve before this node can run), since edges point from a
        // node to what it depends on.
        let mut remaining: HashMap<NodeIndex, usize> = HashMap::new();
        for idx in self.graph.node_indices() {
            remaining.insert(idx, self.graph.neighbors(idx).count());
        }

        let mut ready: BTreeSet<(String, NodeIndex)> = remaining
            .iter()
            .filter(|(_, &count)| count == 0)
            .map(|(&idx, _)| (self.graph[idx].clone(), idx))
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some((name, idx)) = ready.iter().next().cloned() {
            ready.remove(&(name.clone(), idx));
            order.push(name);
            for dependent in self
                .graph
                .neighbors_directed(idx, petgraph::Direction::Incoming)
                .collect::<Vec<_>>()
            {
                let count = remaining.get_mut(&dependent).expect("tracked node");
                *count -= 1;
                if *count == 0 {
                    ready.insert((self.graph[dependent].clone(), dependent));
                }
            }
        }

        if order.len() == self.graph.node_count() {
            Ok(order)
        } else {
            Err(EngineError::CycleDetected {
                cycle: self.find_witness_cycle(&remaining),
            })
        }
    }

    /// Finds one cycle among the nodes that never reached zero remaining
    /// dependencies, by walking dependency edges until a node repeats.
    fn find_witness_cycle(&self, remaining: &HashMap<NodeIndex, usize>) -> Vec<String> {
        let Some(&start) = remaining
            .iter()
            .filter(|(_, &count)| count > 0)
            .map(|(idx, _)| idx)
            .min_by_key(|&&idx| &self.graph[idx])
        else {
            return Vec::new();
        };

        let mut path = vec![start];
        let mut visited: HashMap<NodeIndex, usize> = HashMap::new();
        visited.insert(start, 0);
        let mut current = start;
        loop {
            let mut next_candidates: Vec<NodeIndex> = self
                .graph
                .neighbors(current)
                .filter(|n| remaining.get(n).copied().unwrap_or(0) > 0)
                .collect();
            next_candidates.sort_by_key(|&n| self.graph[n].clone());
            let Some(&next) = next_candidates.first() else {
                break;
            };
            if let Some(&start_pos) = visited.get(&next) {
                return path[start_pos..]
                    .iter()
                    .map(|&idx| self.graph[idx].clone())
                    .collect();
            }
            visited.insert(next, path.len());
            path.push(next);
            current = next;
        }
        path.into_iter().map(|idx| self.graph[idx].clone()).collect()
    }
}
