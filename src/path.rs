//! Bidirectional paths in the assembly graph.
//!
//! A path is an ordered sequence of oriented edges with a gap before each
//! step. Paths come in conjugate pairs: the conjugate path visits the
//! conjugate edges in reverse order and represents the same stretch of DNA
//! read from the other strand. The pair is encoded in the path identifier:
//! paths `2 * i` and `2 * i + 1` of a [`PathContainer`] are conjugates of
//! each other, so the conjugate identifier is obtained by flipping the lowest
//! bit.
//!
//! Mutations through the container touch only the named path. The scaffolder
//! relies on this: when it merges a chain of paths, the conjugate chain is
//! merged by its own symmetric walk rather than through hidden back-pointers.

use crate::graph::ConjugateGraph;
use crate::support::EdgeId;

use std::slice;


//-----------------------------------------------------------------------------

/// An identifier of a path in a [`PathContainer`].
pub type PathId = usize;

/// Returns the identifier of the conjugate path.
#[inline]
pub fn flip_path(id: PathId) -> PathId {
    id ^ 1
}

//-----------------------------------------------------------------------------

/// An ordered sequence of oriented edges with per-step gaps.
///
/// The gap of a step is the number of unknown nucleotides before the edge of
/// that step; the first step of a freshly created path has gap `0`. The
/// length of the path is the total edge length plus the gaps.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct BidirectionalPath {
    edges: Vec<EdgeId>,
    gaps: Vec<usize>,
    length: usize,
}

impl BidirectionalPath {
    /// Returns the number of edges in the path.
    #[inline]
    pub fn size(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the path has no edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns the edge at the given position.
    ///
    /// # Panics
    ///
    /// May panic if `i >= self.size()`.
    #[inline]
    pub fn at(&self, i: usize) -> EdgeId {
        self.edges[i]
    }

    /// Returns the gap before the edge at the given position.
    ///
    /// # Panics
    ///
    /// May panic if `i >= self.size()`.
    #[inline]
    pub fn gap_before(&self, i: usize) -> usize {
        self.gaps[i]
    }

    /// Returns the total length of the path in nucleotides, counting gaps.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns an iterator over the edges of the path.
    pub fn iter(&self) -> slice::Iter<'_, EdgeId> {
        self.edges.iter()
    }
}

//-----------------------------------------------------------------------------

/// A container owning bidirectional paths in conjugate pairs.
///
/// [`PathContainer::create`] builds a path and its conjugate at adjacent
/// identifiers; [`flip_path`] maps between the two. Scaffolding mutates paths
/// in place through [`PathContainer::push_back`] and
/// [`PathContainer::clear`], each of which touches only the path it names.
///
/// # Examples
///
/// ```
/// use barcode_index::{PathContainer, VectorGraph};
/// use barcode_index::path;
///
/// let graph = VectorGraph::from_lengths(&[100, 50]);
/// let mut paths = PathContainer::new();
/// let first = paths.create(&graph, &[0]);
/// let second = paths.create(&graph, &[2]);
/// assert_eq!(paths.len(), 4);
/// assert_eq!(paths.path(first).length(), 100);
/// assert_eq!(paths.path(path::flip_path(first)).at(0), 1);
///
/// paths.push_back(first, second, 25);
/// assert_eq!(paths.path(first).size(), 2);
/// assert_eq!(paths.path(first).length(), 175);
///
/// // The source path is cleared separately.
/// paths.clear(second);
/// assert!(paths.path(second).is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PathContainer {
    paths: Vec<BidirectionalPath>,
}

impl PathContainer {
    /// Creates an empty container.
    pub fn new() -> Self {
        PathContainer {
            paths: Vec::new(),
        }
    }

    /// Returns the number of paths in the container, counting conjugates.
    #[inline]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` if the container has no paths.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Creates a path visiting the given edges and its conjugate path, and
    /// returns the identifier of the forward path.
    ///
    /// The conjugate path visits the conjugate edges in reverse order.
    pub fn create<G: ConjugateGraph>(&mut self, graph: &G, edges: &[EdgeId]) -> PathId {
        let length = edges.iter().map(|edge| graph.length(*edge)).sum();
        let forward = BidirectionalPath {
            edges: edges.to_vec(),
            gaps: vec![0; edges.len()],
            length: length,
        };
        let conjugate = BidirectionalPath {
            edges: edges.iter().rev().map(|edge| graph.conjugate(*edge)).collect(),
            gaps: vec![0; edges.len()],
            length: length,
        };
        let id = self.paths.len();
        self.paths.push(forward);
        self.paths.push(conjugate);
        id
    }

    /// Returns the path with the given identifier.
    ///
    /// # Panics
    ///
    /// May panic if `id >= self.len()`.
    #[inline]
    pub fn path(&self, id: PathId) -> &BidirectionalPath {
        &self.paths[id]
    }

    /// Returns an iterator over the paths in the container.
    pub fn iter(&self) -> slice::Iter<'_, BidirectionalPath> {
        self.paths.iter()
    }

    /// Appends the steps of path `src` to path `dst` with the given gap
    /// before the first appended edge.
    ///
    /// `src` is left unchanged; the conjugates of both paths are left
    /// unchanged. Appending to an empty path drops the joining gap.
    ///
    /// # Panics
    ///
    /// May panic if either identifier is out of range.
    pub fn push_back(&mut self, dst: PathId, src: PathId, gap: usize) {
        let src_path = self.paths[src].clone();
        if src_path.is_empty() {
            return;
        }
        let joining_gap = if self.paths[dst].is_empty() { 0 } else { gap };
        let dst_path = &mut self.paths[dst];
        for (offset, edge) in src_path.edges.iter().enumerate() {
            let before = if offset == 0 { joining_gap } else { src_path.gaps[offset] };
            dst_path.edges.push(*edge);
            dst_path.gaps.push(before);
        }
        dst_path.length += joining_gap + src_path.length;
    }

    /// Removes all steps from the path, leaving its conjugate unchanged.
    ///
    /// # Panics
    ///
    /// May panic if `id >= self.len()`.
    pub fn clear(&mut self, id: PathId) {
        let path = &mut self.paths[id];
        path.edges.clear();
        path.gaps.clear();
        path.length = 0;
    }
}

//-----------------------------------------------------------------------------
