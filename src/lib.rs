//! # Barcode index: linked-read evidence for assembly graphs
//!
//! Linked-read sequencing chemistries (10x Genomics, TSLR) tag every read with
//! a barcode identifying the long DNA molecule the read came from. This crate
//! records, for every oriented edge of a de Bruijn assembly graph, which
//! barcodes were aligned near the head of the edge and where along the edge
//! they landed. Scaffolding code queries the index to decide whether two long
//! edges or paths belong to the same molecule and to merge the corresponding
//! paths.
//!
//! The crate provides:
//!
//! * [`BarcodeIndex`]: a per-edge store of barcode evidence, either coarse
//!   ([`SimpleEdgeEntry`]: read count and position range) or framed
//!   ([`FrameEdgeEntry`]: read count and a packed coverage bitset over
//!   fixed-width windows).
//! * [`FrameBarcodeIndexInfoExtractor`]: read-only queries over the framed
//!   index, such as the barcodes within a head window of an edge.
//! * [`ScaffoldVertexIndex`]: barcode sets for scaffold vertices, which wrap
//!   either a single edge or a bidirectional path.
//! * [`PathScaffolder`]: merging of paths along univocal scaffold connections
//!   while preserving reverse-complement symmetry.
//!
//! The assembly graph itself is an external collaborator: anything that
//! implements [`ConjugateGraph`] (edge lengths, the reverse-complement
//! involution, and stable integer identifiers) can back the index.

pub mod algorithms;
pub mod entry;
pub mod graph;
pub mod index;
pub mod path;
pub mod scaffold;
pub mod support;

//-----------------------------------------------------------------------------

pub use crate::algorithms::{PathScaffolder, ScaffoldEdge};
pub use crate::entry::{BarcodeEntry, FrameBarcodeInfo, FrameEdgeEntry, SimpleBarcodeInfo, SimpleEdgeEntry};
pub use crate::graph::{ConjugateGraph, VectorGraph};
pub use crate::index::{BarcodeIndex, FrameBarcodeIndex, FrameBarcodeIndexInfoExtractor, SimpleBarcodeIndex};
pub use crate::path::{BidirectionalPath, PathContainer, PathId};
pub use crate::scaffold::{ScaffoldVertex, ScaffoldVertexIndex, ScaffoldVertexIndexBuilder, SimpleVertexEntry};
pub use crate::support::{BarcodeDictionary, BarcodeId, EdgeId, Error};

//-----------------------------------------------------------------------------
