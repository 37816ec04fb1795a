//! The assembly graph collaborator.
//!
//! The barcode index does not own or build the assembly graph. It only needs
//! edge lengths, the reverse-complement involution, stable integer
//! identifiers for serialization, and iteration over all oriented edges. Any
//! graph implementation providing those through [`ConjugateGraph`] can back
//! the index. [`VectorGraph`] is a minimal implementation used by tests and
//! examples.

use crate::support::EdgeId;

#[cfg(test)]
mod tests;

//-----------------------------------------------------------------------------

/// An assembly graph with a reverse-complement involution on oriented edges.
///
/// Both orientations of each undirected edge are distinct oriented edges.
/// The involution must satisfy `conjugate(conjugate(e)) == e` and
/// `conjugate(e) != e` for every edge `e`.
pub trait ConjugateGraph {
    /// Returns the number of oriented edges in the graph.
    fn edge_count(&self) -> usize;

    /// Returns the length of the given edge in nucleotides.
    fn length(&self, edge: EdgeId) -> usize;

    /// Returns the conjugate (reverse-complement) edge.
    fn conjugate(&self, edge: EdgeId) -> EdgeId;

    /// Returns a stable integer identifier for the edge, used only in
    /// serialized entries.
    fn int_id(&self, edge: EdgeId) -> u64;

    /// Returns an iterator over all oriented edges of the graph.
    fn edge_iter(&self) -> Box<dyn Iterator<Item = EdgeId> + '_>;
}

//-----------------------------------------------------------------------------

/// A vector-backed [`ConjugateGraph`] for tests and examples.
///
/// Oriented edges are numbered `0..2 * n`, with the two orientations of
/// undirected edge `i` stored as `2 * i` and `2 * i + 1`. The conjugate of an
/// edge is therefore obtained by flipping the lowest bit of its handle.
///
/// # Examples
///
/// ```
/// use barcode_index::{ConjugateGraph, VectorGraph};
///
/// let graph = VectorGraph::from_lengths(&[100, 250]);
/// assert_eq!(graph.edge_count(), 4);
/// assert_eq!(graph.length(0), 100);
/// assert_eq!(graph.length(1), 100);
/// assert_eq!(graph.length(2), 250);
/// assert_eq!(graph.conjugate(2), 3);
/// assert_eq!(graph.conjugate(3), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VectorGraph {
    lengths: Vec<usize>,
}

impl VectorGraph {
    /// Creates a graph with one pair of oriented edges per length.
    pub fn from_lengths(lengths: &[usize]) -> Self {
        let mut oriented: Vec<usize> = Vec::with_capacity(2 * lengths.len());
        for len in lengths.iter() {
            oriented.push(*len);
            oriented.push(*len);
        }
        VectorGraph {
            lengths: oriented,
        }
    }
}

impl ConjugateGraph for VectorGraph {
    #[inline]
    fn edge_count(&self) -> usize {
        self.lengths.len()
    }

    #[inline]
    fn length(&self, edge: EdgeId) -> usize {
        self.lengths[edge]
    }

    #[inline]
    fn conjugate(&self, edge: EdgeId) -> EdgeId {
        edge ^ 1
    }

    #[inline]
    fn int_id(&self, edge: EdgeId) -> u64 {
        edge as u64
    }

    fn edge_iter(&self) -> Box<dyn Iterator<Item = EdgeId> + '_> {
        Box::new(0..self.lengths.len())
    }
}

//-----------------------------------------------------------------------------
