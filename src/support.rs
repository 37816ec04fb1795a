//! Support structures for the barcode index.
//!
//! This module defines the identifier types shared by the rest of the crate,
//! the dictionary that interns barcode strings into dense integer identifiers,
//! and the crate-wide error type.

use std::collections::HashMap;
use std::io;

use thiserror::Error;

#[cfg(test)]
mod tests;

//-----------------------------------------------------------------------------

/// A dense identifier assigned to an interned barcode string.
///
/// Identifiers are assigned in insertion order by [`BarcodeDictionary::add`]
/// and form the contiguous range `0..dictionary.len()`. Two barcode strings
/// receive the same identifier if and only if they are byte-equal.
pub type BarcodeId = u64;

/// An opaque handle for an oriented edge of the assembly graph.
///
/// Edge handles are created and interpreted by the graph collaborator; see
/// [`crate::graph::ConjugateGraph`]. Every edge has a conjugate handle for the
/// reverse-complement edge.
pub type EdgeId = usize;

//-----------------------------------------------------------------------------

/// Errors reported by the barcode index and the scaffolding algorithms.
#[derive(Debug, Error)]
pub enum Error {
    /// A barcode string was queried before it was interned.
    #[error("unknown barcode: {0}")]
    UnknownBarcode(String),

    /// A query named an edge that has no entry in the index.
    #[error("edge {0} is not indexed")]
    EdgeNotIndexed(EdgeId),

    /// A query named a scaffold vertex that has no entry in the vertex index.
    #[error("scaffold vertex is not indexed")]
    VertexNotIndexed,

    /// Two scaffold edges passed to the merge algorithm share a start vertex.
    #[error("ambiguous merge: two scaffold edges share a start vertex")]
    AmbiguousMerge,

    /// The merge connections are not closed under conjugation.
    #[error("merge connections are not closed under conjugation")]
    BrokenConjugateSymmetry,

    /// A serialized entry could not be parsed.
    #[error("malformed serialization: {0}")]
    MalformedSerialization(String),

    /// An I/O error from the underlying reader or writer.
    #[error(transparent)]
    Io(#[from] io::Error),
}

//-----------------------------------------------------------------------------

/// A dictionary interning barcode strings into dense 64-bit identifiers.
///
/// The dictionary is append-only: identifiers are assigned in insertion order
/// and are never reused or removed. It is filled while the barcode index is
/// built and is read-only afterwards. The dictionary itself is not
/// synchronized; if several threads intern barcodes concurrently, the caller
/// must wrap it in a lock.
///
/// # Examples
///
/// ```
/// use barcode_index::BarcodeDictionary;
///
/// let mut dict = BarcodeDictionary::new();
/// let aaca = dict.add("AACA");
/// let ggtt = dict.add("GGTT");
/// assert_eq!(aaca, 0);
/// assert_eq!(ggtt, 1);
///
/// // Interning the same string again returns the existing identifier.
/// assert_eq!(dict.add("AACA"), aaca);
/// assert_eq!(dict.len(), 2);
///
/// assert_eq!(dict.get("GGTT").unwrap(), ggtt);
/// assert!(dict.get("TTTT").is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct BarcodeDictionary {
    codes: HashMap<String, BarcodeId>,
}

impl BarcodeDictionary {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        BarcodeDictionary {
            codes: HashMap::new(),
        }
    }

    /// Returns the number of interned barcodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` if the dictionary is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Interns the given barcode and returns its identifier.
    ///
    /// If the barcode is already present, the existing identifier is
    /// returned. Otherwise the next dense identifier is assigned.
    pub fn add(&mut self, barcode: &str) -> BarcodeId {
        if let Some(id) = self.codes.get(barcode) {
            return *id;
        }
        let id = self.codes.len() as BarcodeId;
        self.codes.insert(barcode.to_string(), id);
        id
    }

    /// Returns the identifier of the given barcode, or [`None`] if the
    /// barcode has not been interned.
    pub fn id(&self, barcode: &str) -> Option<BarcodeId> {
        self.codes.get(barcode).copied()
    }

    /// Returns the identifier of the given barcode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownBarcode`] if the barcode has not been interned.
    pub fn get(&self, barcode: &str) -> Result<BarcodeId, Error> {
        self.id(barcode).ok_or_else(|| Error::UnknownBarcode(barcode.to_string()))
    }
}

//-----------------------------------------------------------------------------
