//! The per-edge barcode index.
//!
//! [`BarcodeIndex`] maps every oriented edge of the graph to a
//! [`BarcodeEntry`] holding the barcode evidence anchored at the head of that
//! edge. Evidence at the tail of an edge is, by definition, the head evidence
//! of the conjugate edge; tail queries therefore resolve the conjugate
//! through the graph and index again instead of storing back-pointers.
//!
//! [`FrameBarcodeIndexInfoExtractor`] is a read-only façade over the framed
//! index answering the window queries the scaffolder needs.

use crate::entry::{read_opt_line, BarcodeEntry, FrameEdgeEntry, SimpleEdgeEntry};
use crate::graph::ConjugateGraph;
use crate::support::{BarcodeDictionary, BarcodeId, EdgeId, Error};

use log::debug;

use std::collections::hash_map::Iter;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::ops::Range;


//-----------------------------------------------------------------------------

/// A barcode index over [`SimpleEdgeEntry`] values.
pub type SimpleBarcodeIndex = BarcodeIndex<SimpleEdgeEntry>;

/// A barcode index over [`FrameEdgeEntry`] values.
pub type FrameBarcodeIndex = BarcodeIndex<FrameEdgeEntry>;

/// A mapping from oriented edges to their barcode entries.
///
/// The index is built in three steps: [`BarcodeIndex::initial_fill`] creates
/// an empty entry for every oriented edge, repeated
/// [`BarcodeIndex::insert_barcode`] calls (or [`BarcodeIndex::ingest`], which
/// also interns the barcode string) record the aligned reads, and
/// [`BarcodeIndex::filter`] drops low-quality evidence. After construction
/// the index is read-only; concurrent queries need no synchronization.
///
/// Insertion order does not matter: updates to distinct `(edge, barcode)`
/// cells commute, and updates to the same cell add counts and take
/// componentwise extremes.
///
/// # Examples
///
/// ```
/// use barcode_index::{FrameBarcodeIndex, VectorGraph};
///
/// let graph = VectorGraph::from_lengths(&[100]);
/// let mut index = FrameBarcodeIndex::with_frame_size(10);
/// index.initial_fill(&graph);
///
/// // Evidence is anchored at the head of the edge it was aligned to.
/// index.insert_barcode(0, 11, 5, 0..30).unwrap();
/// assert_eq!(index.head_barcode_count(0).unwrap(), 1);
/// assert_eq!(index.tail_barcode_count(&graph, 1).unwrap(), 1);
/// assert_eq!(index.tail_barcode_count(&graph, 0).unwrap(), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BarcodeIndex<E> {
    edge_to_entry: HashMap<EdgeId, E>,
    frame_size: usize,
}

impl SimpleBarcodeIndex {
    /// Creates an empty simple index.
    pub fn new() -> Self {
        BarcodeIndex {
            edge_to_entry: HashMap::new(),
            frame_size: 1,
        }
    }
}

impl Default for SimpleBarcodeIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBarcodeIndex {
    /// Creates an empty framed index with the given frame width in
    /// nucleotides.
    ///
    /// # Panics
    ///
    /// Panics if `frame_size` is zero.
    pub fn with_frame_size(frame_size: usize) -> Self {
        assert!(frame_size > 0, "BarcodeIndex: frame size must be positive");
        BarcodeIndex {
            edge_to_entry: HashMap::new(),
            frame_size: frame_size,
        }
    }

    /// Returns the frame width in nucleotides.
    #[inline]
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }
}

impl<E: BarcodeEntry> BarcodeIndex<E> {
    /// Creates an empty entry for every oriented edge of the graph.
    ///
    /// Both orientations of each undirected edge get their own entry.
    pub fn initial_fill<G: ConjugateGraph>(&mut self, graph: &G) {
        for edge in graph.edge_iter() {
            let entry = E::new(edge, graph.length(edge), self.frame_size);
            self.edge_to_entry.insert(edge, entry);
        }
    }

    /// Returns the number of entries in the index.
    #[inline]
    pub fn len(&self) -> usize {
        self.edge_to_entry.len()
    }

    /// Returns `true` if the index has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edge_to_entry.is_empty()
    }

    /// Returns `true` if the given edge has an entry.
    #[inline]
    pub fn contains(&self, edge: EdgeId) -> bool {
        self.edge_to_entry.contains_key(&edge)
    }

    /// Returns an iterator over `(edge, entry)` pairs in arbitrary order.
    pub fn iter(&self) -> Iter<'_, EdgeId, E> {
        self.edge_to_entry.iter()
    }

    /// Records `count` reads carrying `barcode` over `range` on the given
    /// edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EdgeNotIndexed`] if the edge has no entry.
    pub fn insert_barcode(&mut self, edge: EdgeId, barcode: BarcodeId, count: u64, range: Range<usize>) -> Result<(), Error> {
        let entry = self.edge_to_entry.get_mut(&edge).ok_or(Error::EdgeNotIndexed(edge))?;
        entry.insert_barcode(barcode, count, range);
        Ok(())
    }

    /// Interns the barcode string and records the reads, as
    /// [`BarcodeIndex::insert_barcode`].
    pub fn ingest(
        &mut self,
        dictionary: &mut BarcodeDictionary,
        edge: EdgeId,
        barcode: &str,
        count: u64,
        range: Range<usize>,
    ) -> Result<(), Error> {
        let barcode = dictionary.add(barcode);
        self.insert_barcode(edge, barcode, count, range)
    }

    /// Returns the entry anchored at the head of the given edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EdgeNotIndexed`] if the edge has no entry.
    pub fn entry_heads(&self, edge: EdgeId) -> Result<&E, Error> {
        self.edge_to_entry.get(&edge).ok_or(Error::EdgeNotIndexed(edge))
    }

    /// Returns the entry anchored at the tail of the given edge, which is the
    /// head entry of the conjugate edge.
    pub fn entry_tails<G: ConjugateGraph>(&self, graph: &G, edge: EdgeId) -> Result<&E, Error> {
        self.entry_heads(graph.conjugate(edge))
    }

    /// Returns the number of barcodes at the head of the given edge.
    pub fn head_barcode_count(&self, edge: EdgeId) -> Result<usize, Error> {
        Ok(self.entry_heads(edge)?.len())
    }

    /// Returns the number of barcodes at the tail of the given edge.
    pub fn tail_barcode_count<G: ConjugateGraph>(&self, graph: &G, edge: EdgeId) -> Result<usize, Error> {
        Ok(self.entry_tails(graph, edge)?.len())
    }

    /// Removes low-quality evidence from every entry.
    ///
    /// A barcode is dropped from an entry when it has fewer than
    /// `trimming_threshold` reads or when its evidence starts more than
    /// `gap_threshold` nucleotides from the edge head. Entries that end up
    /// empty stay in the index.
    pub fn filter(&mut self, trimming_threshold: u64, gap_threshold: usize) {
        for entry in self.edge_to_entry.values_mut() {
            entry.filter(trimming_threshold, gap_threshold);
        }
    }

    /// Writes the entry of the given edge: the stable edge identifier on its
    /// own line, then the barcode distribution.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EdgeNotIndexed`] if the edge has no entry.
    pub fn write_entry<G: ConjugateGraph, W: Write>(&self, graph: &G, edge: EdgeId, writer: &mut W) -> Result<(), Error> {
        let entry = self.entry_heads(edge)?;
        writeln!(writer, "{}", graph.int_id(edge))?;
        entry.serialize(writer)?;
        Ok(())
    }

    /// Reads a barcode distribution and merges it into the entry of the given
    /// edge. The caller has already consumed the edge identifier line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EdgeNotIndexed`] if the edge has no entry and
    /// [`Error::MalformedSerialization`] if the distribution cannot be
    /// parsed.
    pub fn read_entry<R: BufRead>(&mut self, edge: EdgeId, reader: &mut R) -> Result<(), Error> {
        debug!("reading entry for edge {}", edge);
        let entry = self.edge_to_entry.get_mut(&edge).ok_or(Error::EdgeNotIndexed(edge))?;
        entry.deserialize(reader)
    }

    /// Writes every entry, in the edge order of the graph.
    pub fn serialize<G: ConjugateGraph, W: Write>(&self, graph: &G, writer: &mut W) -> Result<(), Error> {
        for edge in graph.edge_iter() {
            self.write_entry(graph, edge, writer)?;
        }
        Ok(())
    }

    /// Reads entries until the end of the stream, resolving stable edge
    /// identifiers through the graph and merging each distribution into the
    /// matching entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedSerialization`] if an identifier does not
    /// name an edge of the graph or a distribution cannot be parsed.
    pub fn load<G: ConjugateGraph, R: BufRead>(&mut self, graph: &G, reader: &mut R) -> Result<(), Error> {
        let mut by_int_id: HashMap<u64, EdgeId> = HashMap::new();
        for edge in graph.edge_iter() {
            by_int_id.insert(graph.int_id(edge), edge);
        }
        while let Some(line) = read_opt_line(reader)? {
            let int_id: u64 = line
                .trim()
                .parse()
                .map_err(|_| Error::MalformedSerialization(format!("invalid edge identifier: {}", line)))?;
            let edge = *by_int_id
                .get(&int_id)
                .ok_or_else(|| Error::MalformedSerialization(format!("unknown edge identifier: {}", int_id)))?;
            self.read_entry(edge, reader)?;
        }
        Ok(())
    }
}

//-----------------------------------------------------------------------------

/// Read-only window queries over a framed barcode index.
///
/// The extractor borrows the index and the graph for its lifetime and
/// derives everything it returns from them; repeated calls with the same
/// arguments return equal results.
///
/// # Examples
///
/// ```
/// use barcode_index::{FrameBarcodeIndex, FrameBarcodeIndexInfoExtractor, VectorGraph};
///
/// let graph = VectorGraph::from_lengths(&[100]);
/// let mut index = FrameBarcodeIndex::with_frame_size(10);
/// index.initial_fill(&graph);
/// index.insert_barcode(0, 42, 3, 5..25).unwrap();
/// index.insert_barcode(0, 7, 1, 80..95).unwrap();
///
/// let extractor = FrameBarcodeIndexInfoExtractor::new(&index, &graph);
///
/// // Barcode 7 first appears 80 bp from the head, outside the 50 bp window.
/// assert_eq!(extractor.barcodes_from_head(0, 1, 50).unwrap(), vec![42]);
/// assert_eq!(extractor.barcodes_and_counts_from_head(0, 1, 100).unwrap(), vec![(7, 1), (42, 3)]);
/// ```
pub struct FrameBarcodeIndexInfoExtractor<'a, G> {
    index: &'a FrameBarcodeIndex,
    graph: &'a G,
}

impl<'a, G: ConjugateGraph> FrameBarcodeIndexInfoExtractor<'a, G> {
    /// Creates an extractor over the given index and graph.
    pub fn new(index: &'a FrameBarcodeIndex, graph: &'a G) -> Self {
        FrameBarcodeIndexInfoExtractor {
            index: index,
            graph: graph,
        }
    }

    /// Returns the barcodes at the head of the edge with at least
    /// `count_threshold` reads whose leftmost covered frame starts within
    /// `tail_threshold` nucleotides of the head, in identifier order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EdgeNotIndexed`] if the edge has no entry.
    pub fn barcodes_from_head(&self, edge: EdgeId, count_threshold: u64, tail_threshold: usize) -> Result<Vec<BarcodeId>, Error> {
        let entry = self.index.entry_heads(edge)?;
        let frame_size = entry.frame_size();
        let result = entry
            .iter()
            .filter(|(_, info)| info.count() >= count_threshold && info.leftmost() * frame_size < tail_threshold)
            .map(|(barcode, _)| *barcode)
            .collect();
        Ok(result)
    }

    /// As [`Self::barcodes_from_head`], also returning the read count of
    /// each barcode.
    pub fn barcodes_and_counts_from_head(
        &self,
        edge: EdgeId,
        count_threshold: u64,
        tail_threshold: usize,
    ) -> Result<Vec<(BarcodeId, u64)>, Error> {
        let entry = self.index.entry_heads(edge)?;
        let frame_size = entry.frame_size();
        let result = entry
            .iter()
            .filter(|(_, info)| info.count() >= count_threshold && info.leftmost() * frame_size < tail_threshold)
            .map(|(barcode, info)| (*barcode, info.count()))
            .collect();
        Ok(result)
    }

    /// Returns the barcodes at the tail of the edge, which are the head
    /// barcodes of the conjugate edge.
    pub fn barcodes_from_tail(&self, edge: EdgeId, count_threshold: u64, tail_threshold: usize) -> Result<Vec<BarcodeId>, Error> {
        self.barcodes_from_head(self.graph.conjugate(edge), count_threshold, tail_threshold)
    }

    /// Returns the number of barcodes shared by the head entries of the two
    /// edges.
    pub fn head_intersection_size(&self, first: EdgeId, second: EdgeId) -> Result<usize, Error> {
        let first = self.index.entry_heads(first)?;
        let second = self.index.entry_heads(second)?;
        Ok(first.intersection_size(second))
    }
}

//-----------------------------------------------------------------------------
