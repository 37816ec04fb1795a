//! Scaffold vertices and their barcode entries.
//!
//! A scaffold graph connects long stretches of the assembly: each vertex
//! wraps either a single oriented edge or a bidirectional path. For
//! scaffolding decisions, every vertex gets a [`SimpleVertexEntry`]: the set
//! of barcodes observed near the start of the stretch. The entries are
//! computed by [`ScaffoldVertexEntryExtractor`] and stored in a
//! [`ScaffoldVertexIndex`].

use crate::graph::ConjugateGraph;
use crate::index::{FrameBarcodeIndex, FrameBarcodeIndexInfoExtractor};
use crate::path::{self, PathContainer, PathId};
use crate::support::{BarcodeId, EdgeId, Error};

use log::{info, warn};
use rayon::prelude::*;

use std::collections::hash_map::Iter;
use std::collections::{BTreeSet, HashMap};

#[cfg(test)]
mod tests;

//-----------------------------------------------------------------------------

/// Minimum total read support for a barcode accumulated over the edges of a
/// path vertex.
pub const GLOBAL_COUNT_THRESHOLD: u64 = 5;

//-----------------------------------------------------------------------------

/// A vertex of the scaffold graph.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScaffoldVertex {
    /// A vertex wrapping one oriented edge.
    Edge(EdgeId),
    /// A vertex wrapping a path in a [`PathContainer`].
    Path(PathId),
}

impl ScaffoldVertex {
    /// Returns the conjugate vertex: the conjugate edge for an edge vertex,
    /// the conjugate path for a path vertex.
    pub fn conjugate<G: ConjugateGraph>(&self, graph: &G) -> ScaffoldVertex {
        match self {
            ScaffoldVertex::Edge(edge) => ScaffoldVertex::Edge(graph.conjugate(*edge)),
            ScaffoldVertex::Path(id) => ScaffoldVertex::Path(path::flip_path(*id)),
        }
    }
}

/// The set of barcodes attached to a scaffold vertex, ordered by identifier.
pub type SimpleVertexEntry = BTreeSet<BarcodeId>;

//-----------------------------------------------------------------------------

/// Computes the barcode set of a scaffold vertex from the framed index.
///
/// For an edge vertex, the entry is the set of barcodes within the first
/// `tail_threshold` nucleotides of the edge that have at least
/// `count_threshold` reads. For a path vertex, the prefix of the path up to
/// `tail_threshold` nucleotides is swept edge by edge: edges shorter than
/// `length_threshold` are not queried (but still advance the prefix), the
/// window shrinks by the prefix consumed so far, and a barcode makes it into
/// the entry when its reads summed over the queried edges reach
/// [`GLOBAL_COUNT_THRESHOLD`].
///
/// Extraction is a pure function of the vertex, the index, and the paths:
/// repeated calls return equal sets.
pub struct ScaffoldVertexEntryExtractor<'a, G> {
    graph: &'a G,
    extractor: FrameBarcodeIndexInfoExtractor<'a, G>,
    paths: &'a PathContainer,
    tail_threshold: usize,
    count_threshold: u64,
    length_threshold: usize,
}

impl<'a, G: ConjugateGraph> ScaffoldVertexEntryExtractor<'a, G> {
    /// Creates an extractor with the given thresholds.
    pub fn new(
        graph: &'a G,
        extractor: FrameBarcodeIndexInfoExtractor<'a, G>,
        paths: &'a PathContainer,
        tail_threshold: usize,
        count_threshold: u64,
        length_threshold: usize,
    ) -> Self {
        ScaffoldVertexEntryExtractor {
            graph: graph,
            extractor: extractor,
            paths: paths,
            tail_threshold: tail_threshold,
            count_threshold: count_threshold,
            length_threshold: length_threshold,
        }
    }

    /// Returns the barcode set of the given vertex.
    ///
    /// A vertex that cannot be resolved (an edge missing from the index, a
    /// stale path handle) yields a warning and an empty entry.
    pub fn extract_entry(&self, vertex: ScaffoldVertex) -> SimpleVertexEntry {
        match vertex {
            ScaffoldVertex::Edge(edge) => self.extract_edge_entry(edge),
            ScaffoldVertex::Path(id) => self.extract_path_entry(id),
        }
    }

    fn extract_edge_entry(&self, edge: EdgeId) -> SimpleVertexEntry {
        match self.extractor.barcodes_from_head(edge, self.count_threshold, self.tail_threshold) {
            Ok(barcodes) => barcodes.into_iter().collect(),
            Err(_) => {
                warn!("scaffold vertex wraps unindexed edge {}", edge);
                SimpleVertexEntry::new()
            },
        }
    }

    fn extract_path_entry(&self, id: PathId) -> SimpleVertexEntry {
        if id >= self.paths.len() {
            warn!("scaffold vertex wraps unknown path {}", id);
            return SimpleVertexEntry::new();
        }
        let path = self.paths.path(id);

        let mut barcode_to_count: HashMap<BarcodeId, u64> = HashMap::new();
        let mut current_prefix = 0;
        for i in 0..path.size() {
            if current_prefix > self.tail_threshold {
                break;
            }
            let edge = path.at(i);
            let edge_length = self.graph.length(edge);
            if edge_length < self.length_threshold {
                current_prefix += edge_length;
                continue;
            }
            let current_tail = self.tail_threshold - current_prefix;
            match self.extractor.barcodes_and_counts_from_head(edge, self.count_threshold, current_tail) {
                Ok(pairs) => {
                    for (barcode, reads) in pairs {
                        *barcode_to_count.entry(barcode).or_insert(0) += reads;
                    }
                },
                Err(_) => warn!("path vertex {} visits unindexed edge {}", id, edge),
            }
            current_prefix += edge_length;
        }

        barcode_to_count
            .into_iter()
            .filter(|(_, reads)| *reads >= GLOBAL_COUNT_THRESHOLD)
            .map(|(barcode, _)| barcode)
            .collect()
    }
}

//-----------------------------------------------------------------------------

/// A mapping from scaffold vertices to their barcode sets.
#[derive(Clone, Debug, Default)]
pub struct ScaffoldVertexIndex {
    vertex_to_entry: HashMap<ScaffoldVertex, SimpleVertexEntry>,
}

impl ScaffoldVertexIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        ScaffoldVertexIndex {
            vertex_to_entry: HashMap::new(),
        }
    }

    /// Returns the number of indexed vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertex_to_entry.len()
    }

    /// Returns `true` if the index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_to_entry.is_empty()
    }

    /// Returns `true` if the vertex is indexed.
    #[inline]
    pub fn contains(&self, vertex: ScaffoldVertex) -> bool {
        self.vertex_to_entry.contains_key(&vertex)
    }

    /// Inserts an entry for the vertex, replacing any previous entry.
    pub fn insert(&mut self, vertex: ScaffoldVertex, entry: SimpleVertexEntry) {
        self.vertex_to_entry.insert(vertex, entry);
    }

    /// Returns the entry of the given vertex.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VertexNotIndexed`] if the vertex has no entry.
    pub fn get_entry(&self, vertex: ScaffoldVertex) -> Result<&SimpleVertexEntry, Error> {
        self.vertex_to_entry.get(&vertex).ok_or(Error::VertexNotIndexed)
    }

    /// Returns an iterator over `(vertex, entry)` pairs in arbitrary order.
    pub fn iter(&self) -> Iter<'_, ScaffoldVertex, SimpleVertexEntry> {
        self.vertex_to_entry.iter()
    }
}

//-----------------------------------------------------------------------------

/// Builds a [`ScaffoldVertexIndex`] by extracting an entry for every vertex.
///
/// The builder may extract entries in parallel with up to `max_threads`
/// worker threads; extraction only reads the index, the graph, and the
/// paths. The vertex container is borrowed for the duration of
/// [`ScaffoldVertexIndexBuilder::build`] only.
pub struct ScaffoldVertexIndexBuilder<'a, G> {
    extractor: ScaffoldVertexEntryExtractor<'a, G>,
    max_threads: usize,
}

impl<'a, G: ConjugateGraph + Sync> ScaffoldVertexIndexBuilder<'a, G> {
    /// Creates a builder around the given extractor.
    ///
    /// # Panics
    ///
    /// Panics if `max_threads` is zero.
    pub fn new(extractor: ScaffoldVertexEntryExtractor<'a, G>, max_threads: usize) -> Self {
        assert!(max_threads > 0, "ScaffoldVertexIndexBuilder: thread count must be positive");
        ScaffoldVertexIndexBuilder {
            extractor: extractor,
            max_threads: max_threads,
        }
    }

    /// Extracts an entry for every vertex in the container and returns the
    /// constructed index. Later duplicates replace earlier entries.
    pub fn build<I: IntoIterator<Item = ScaffoldVertex>>(&self, vertices: I) -> ScaffoldVertexIndex {
        let vertices: Vec<ScaffoldVertex> = vertices.into_iter().collect();
        info!("Constructing scaffold vertex index in {} threads", self.max_threads);

        let entries: Vec<(ScaffoldVertex, SimpleVertexEntry)> =
            match rayon::ThreadPoolBuilder::new().num_threads(self.max_threads).build() {
                Ok(pool) => pool.install(|| {
                    vertices
                        .par_iter()
                        .map(|vertex| (*vertex, self.extractor.extract_entry(*vertex)))
                        .collect()
                }),
                Err(_) => {
                    warn!("could not build a thread pool; extracting entries serially");
                    vertices
                        .iter()
                        .map(|vertex| (*vertex, self.extractor.extract_entry(*vertex)))
                        .collect()
                },
            };

        let mut index = ScaffoldVertexIndex::new();
        for (vertex, entry) in entries {
            index.insert(vertex, entry);
        }
        info!("Constructed scaffold vertex index with {} entries", index.len());
        index
    }
}

/// Builds a scaffold vertex index over the given vertices.
///
/// Convenience wrapper tying together the extractor and the builder.
pub fn construct_scaffold_vertex_index<'a, G, I>(
    graph: &'a G,
    index: &'a FrameBarcodeIndex,
    paths: &'a PathContainer,
    tail_threshold: usize,
    count_threshold: u64,
    length_threshold: usize,
    max_threads: usize,
    vertices: I,
) -> ScaffoldVertexIndex
where
    G: ConjugateGraph + Sync,
    I: IntoIterator<Item = ScaffoldVertex>,
{
    info!("Building scaffold vertex index");
    info!("Tail threshold: {}", tail_threshold);
    info!("Count threshold: {}", count_threshold);
    info!("Length threshold: {}", length_threshold);
    let extractor = FrameBarcodeIndexInfoExtractor::new(index, graph);
    let entry_extractor =
        ScaffoldVertexEntryExtractor::new(graph, extractor, paths, tail_threshold, count_threshold, length_threshold);
    let builder = ScaffoldVertexIndexBuilder::new(entry_extractor, max_threads);
    builder.build(vertices)
}

//-----------------------------------------------------------------------------
