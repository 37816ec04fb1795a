//! Scaffolding algorithms over barcode evidence.
//!
//! The algorithms here consume a scaffold graph that an external constructor
//! has already reduced to unambiguous connections and mutate the path
//! container accordingly. The central invariant is reverse-complement
//! symmetry: every merge performed on a chain of paths is mirrored by the
//! merge of the conjugate chain, so the two strands of the assembly stay
//! consistent.

use crate::graph::ConjugateGraph;
use crate::path::{PathContainer, PathId};
use crate::scaffold::ScaffoldVertex;
use crate::support::Error;

use log::{info, warn};

use std::collections::{HashMap, HashSet};

#[cfg(test)]
mod tests;

//-----------------------------------------------------------------------------

/// A univocal connection of the scaffold graph: `start` is followed by `end`
/// at a distance of `length` nucleotides.
///
/// A connection is univocal when every vertex on its chain has at most one
/// predecessor and at most one successor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaffoldEdge {
    /// The vertex the connection starts from.
    pub start: ScaffoldVertex,
    /// The vertex the connection leads to.
    pub end: ScaffoldVertex,
    /// The estimated distance between the two vertices.
    pub length: usize,
}

impl ScaffoldEdge {
    /// Creates a connection from `start` to `end` with the given length.
    pub fn new(start: ScaffoldVertex, end: ScaffoldVertex, length: usize) -> Self {
        ScaffoldEdge {
            start: start,
            end: end,
            length: length,
        }
    }
}

//-----------------------------------------------------------------------------

/// Merges paths along univocal scaffold connections.
///
/// # Examples
///
/// ```
/// use barcode_index::{PathContainer, PathScaffolder, ScaffoldEdge, ScaffoldVertex, VectorGraph};
///
/// let graph = VectorGraph::from_lengths(&[100, 200]);
/// let mut paths = PathContainer::new();
/// let first = paths.create(&graph, &[0]);
/// let second = paths.create(&graph, &[2]);
///
/// // Connect the two paths and, symmetrically, their conjugates.
/// let edges = vec![
///     ScaffoldEdge::new(ScaffoldVertex::Path(first), ScaffoldVertex::Path(second), 30),
///     ScaffoldEdge::new(
///         ScaffoldVertex::Path(second ^ 1),
///         ScaffoldVertex::Path(first ^ 1),
///         30,
///     ),
/// ];
///
/// let scaffolder = PathScaffolder::new(&graph);
/// scaffolder.merge_univocal_edges(&mut paths, &edges).unwrap();
///
/// assert_eq!(paths.path(first).size(), 2);
/// assert_eq!(paths.path(first).length(), 330);
/// assert!(paths.path(second).is_empty());
/// ```
pub struct PathScaffolder<'a, G> {
    graph: &'a G,
}

impl<'a, G: ConjugateGraph> PathScaffolder<'a, G> {
    /// Creates a scaffolder over the given graph.
    pub fn new(graph: &'a G) -> Self {
        PathScaffolder {
            graph: graph,
        }
    }

    /// Merges the paths connected by the given univocal scaffold edges.
    ///
    /// Each maximal chain of connections is collapsed into the path of its
    /// first vertex: the paths of the later vertices are appended in order,
    /// with the connection length as the gap, and then cleared. The conjugate
    /// chain is collapsed by its own walk, which keeps the container closed
    /// under conjugation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousMerge`] if two connections share a start
    /// vertex and [`Error::BrokenConjugateSymmetry`] if some connection lacks
    /// its conjugate mirror. Both checks run before any path is touched, so a
    /// failed merge leaves the container unchanged.
    pub fn merge_univocal_edges(&self, paths: &mut PathContainer, edges: &[ScaffoldEdge]) -> Result<(), Error> {
        // Connection map: start -> end.
        let mut connections: HashMap<ScaffoldVertex, ScaffoldVertex> = HashMap::new();
        for edge in edges.iter() {
            if connections.insert(edge.start, edge.end).is_some() {
                return Err(Error::AmbiguousMerge);
            }
        }

        // Every connection must have its reverse-complement mirror.
        for (start, end) in connections.iter() {
            let start_conjugate = start.conjugate(self.graph);
            let end_conjugate = end.conjugate(self.graph);
            match connections.get(&end_conjugate) {
                Some(target) if *target == start_conjugate => (),
                _ => return Err(Error::BrokenConjugateSymmetry),
            }
        }

        let starts = self.find_chain_starts(&connections);
        info!("{} chain starts", starts.len());

        let mut start_to_distance: HashMap<ScaffoldVertex, usize> = HashMap::new();
        for edge in edges.iter() {
            start_to_distance.insert(edge.start, edge.length);
        }

        for start in starts {
            self.extend_path_along_connections(paths, start, &connections, &start_to_distance);
        }
        Ok(())
    }

    // A vertex is a chain start if walking backwards through the conjugates
    // leaves the connection map without re-entering a chain that has already
    // been traced. The `used` set is shared across traces, so every chain and
    // its conjugate are discovered exactly once.
    fn find_chain_starts(&self, connections: &HashMap<ScaffoldVertex, ScaffoldVertex>) -> Vec<ScaffoldVertex> {
        let mut used: HashSet<ScaffoldVertex> = HashSet::new();
        let mut starts: Vec<ScaffoldVertex> = Vec::new();
        for (vertex, _) in connections.iter() {
            if used.contains(vertex) {
                continue;
            }
            let mut current = *vertex;
            let mut current_conjugate = current.conjugate(self.graph);
            used.insert(current);
            used.insert(current_conjugate);

            // The predecessor of a vertex is the conjugate of the successor
            // of its conjugate.
            let mut interior = false;
            while let Some(previous_conjugate) = connections.get(&current_conjugate) {
                if used.contains(previous_conjugate) {
                    interior = true;
                    break;
                }
                current = previous_conjugate.conjugate(self.graph);
                current_conjugate = *previous_conjugate;
                used.insert(current);
                used.insert(current_conjugate);
            }
            if !interior {
                starts.push(current);
            }
        }
        starts
    }

    fn extend_path_along_connections(
        &self,
        paths: &mut PathContainer,
        start: ScaffoldVertex,
        connections: &HashMap<ScaffoldVertex, ScaffoldVertex>,
        start_to_distance: &HashMap<ScaffoldVertex, usize>,
    ) {
        let start_path = match self.path_of(paths, start) {
            Some(id) => id,
            None => return,
        };
        if paths.path(start_path).is_empty() {
            warn!("chain start has an empty path");
            return;
        }

        let mut current = start;
        while let Some(next) = connections.get(&current).copied() {
            let gap = start_to_distance[&current];
            match self.path_of(paths, next) {
                Some(next_path) => {
                    paths.push_back(start_path, next_path, gap);
                    paths.clear(next_path);
                },
                None => return,
            }
            current = next;
        }
    }

    // Resolves the path a vertex wraps; merging is only defined for path
    // vertices.
    fn path_of(&self, paths: &PathContainer, vertex: ScaffoldVertex) -> Option<PathId> {
        match vertex {
            ScaffoldVertex::Path(id) if id < paths.len() => Some(id),
            ScaffoldVertex::Path(id) => {
                warn!("scaffold vertex wraps unknown path {}", id);
                None
            },
            ScaffoldVertex::Edge(_) => {
                warn!("scaffold vertex does not wrap a path");
                None
            },
        }
    }
}

//-----------------------------------------------------------------------------
